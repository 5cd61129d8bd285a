use anyhow::Result;
use perceiver_distraction::PatternDictionary;
use serde::Serialize;

use super::context::CliContext;
use super::output::print_structured;

#[derive(Serialize)]
struct InfoReport {
    version: &'static str,
    build_date: &'static str,
    git_hash: &'static str,
    git_branch: &'static str,
    config_path: Option<String>,
    thresholds: Thresholds,
    categories: Vec<(String, usize)>,
}

#[derive(Serialize)]
struct Thresholds {
    simple: f32,
    focus: f32,
    rescan: f32,
    debounce_ms: u64,
}

pub async fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let report = InfoReport {
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("BUILD_DATE"),
        git_hash: env!("GIT_HASH"),
        git_branch: env!("GIT_BRANCH"),
        config_path: ctx.config_path().map(|path| path.display().to_string()),
        thresholds: Thresholds {
            simple: config.simple_threshold,
            focus: config.focus_threshold,
            rescan: config.rescan_threshold,
            debounce_ms: config.debounce_ms,
        },
        categories: PatternDictionary::global()
            .categories()
            .iter()
            .map(|(category, keywords)| (category.to_string(), keywords.len()))
            .collect(),
    };
    if print_structured(ctx.output(), &report)? {
        return Ok(());
    }

    println!("Focus Shield System Information");
    println!("===============================");
    println!("Version: {}", report.version);
    println!("Build Date: {}", report.build_date);
    println!("Git Commit: {} ({})", report.git_hash, report.git_branch);
    println!();

    println!("Configuration:");
    match &report.config_path {
        Some(path) => println!("- File: {path}"),
        None => println!("- File: (defaults)"),
    }
    let thresholds = &report.thresholds;
    println!(
        "- Thresholds: simple {:.2}, focus {:.2}, rescan {:.2}",
        thresholds.simple, thresholds.focus, thresholds.rescan
    );
    println!("- Debounce: {} ms", thresholds.debounce_ms);
    println!();

    println!("Pattern dictionary:");
    for (category, keywords) in &report.categories {
        println!("- {category}: {keywords} keywords");
    }
    Ok(())
}
