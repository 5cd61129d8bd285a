pub mod app;
pub mod apply;
pub mod classify;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod output;
pub mod runtime;
pub mod scan;
