use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use perceiver_distraction::metrics::{self, MetricSnapshot};
use serde::Serialize;
use suppression_center::{
    CommandHandler, CommandRequest, CommandResponse, ShieldMode, SuppressionController,
};
use tracing::info;

use super::context::CliContext;
use super::output::print_structured;
use crate::page::{read_document, write_html};

#[derive(Args, Clone, Debug)]
pub struct ApplyArgs {
    /// HTML file to process
    pub file: PathBuf,

    /// Command action: simpleMode, focusMode or normalMode
    #[arg(short, long)]
    pub action: String,

    /// Write the marked page here
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Serialize)]
struct ApplyReport {
    action: String,
    response: CommandResponse,
    mode: ShieldMode,
    marked: usize,
    highlighted: bool,
    summary: Option<String>,
    written: Option<String>,
    metrics: MetricSnapshot,
}

pub async fn cmd_apply(args: ApplyArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let document = read_document(&args.file).await?.into_shared();
    let controller = SuppressionController::new(document.clone(), config.clone());

    let response = controller
        .handle(CommandRequest::new(args.action.clone()))
        .await;
    let mode = controller.mode().await;
    let highlighted = controller.highlighted().await.is_some();
    let summary_node = controller.summary_node().await;

    let (marked, summary) = {
        let doc = document.read();
        let summary = summary_node.and_then(|node| {
            doc.element_children(node)
                .last()
                .map(|paragraph| doc.text_content(*paragraph))
        });
        (doc.elements_with_class(&config.hidden_class).len(), summary)
    };

    let mut written = None;
    if let Some(out) = &args.out {
        let snapshot = document.read().to_html();
        write_html(out, &snapshot).await?;
        info!(path = %out.display(), "wrote suppressed page");
        written = Some(out.display().to_string());
    }

    let report = ApplyReport {
        action: args.action,
        response,
        mode,
        marked,
        highlighted,
        summary,
        written,
        metrics: metrics::snapshot(),
    };
    if !print_structured(ctx.output(), &report)? {
        println!("Response: {}", serde_json::to_string(&report.response)?);
        println!("Mode: {}", report.mode);
        println!("Marked elements: {}", report.marked);
        if report.highlighted {
            println!("Main content highlighted");
        }
        if let Some(summary) = &report.summary {
            println!("Summary: {summary}");
        }
        if let Some(path) = &report.written {
            println!("Wrote suppressed page to {path}");
        }
    }

    if !report.response.is_success() {
        bail!(
            "command failed: {}",
            report.response.message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}
