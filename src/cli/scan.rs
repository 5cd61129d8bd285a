use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use perceiver_distraction::ScoredElement;
use serde::Serialize;

use super::context::CliContext;
use super::output::print_structured;
use crate::page::read_document;

#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    /// HTML file to scan
    pub file: PathBuf,

    /// Minimum score; defaults to the simple-mode threshold
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Keep only candidates whose class or id contains an ad keyword
    #[arg(long)]
    pub ads_only: bool,

    /// Show at most N candidates
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ScanReport {
    file: String,
    threshold: f32,
    candidates: Vec<ScoredElement>,
}

pub(crate) fn checked_threshold(threshold: Option<f32>, default: f32) -> Result<f32> {
    let threshold = threshold.unwrap_or(default);
    if !(0.0..=1.0).contains(&threshold) {
        bail!("threshold must be within 0..=1, got {threshold}");
    }
    Ok(threshold)
}

pub async fn cmd_scan(args: ScanArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let threshold = checked_threshold(args.threshold, config.simple_threshold)?;
    let doc = read_document(&args.file).await?;
    let scanner = ctx.scanner();

    let mut candidates = if args.ads_only {
        scanner.scan_filtered_by_keyword(&doc, threshold, &config.ad_keywords)
    } else {
        scanner.scan(&doc, threshold)
    };
    if let Some(limit) = args.limit {
        candidates.truncate(limit);
    }

    let report = ScanReport {
        file: args.file.display().to_string(),
        threshold,
        candidates,
    };
    if print_structured(ctx.output(), &report)? {
        return Ok(());
    }

    println!(
        "{} candidate(s) at threshold {:.2} in {}",
        report.candidates.len(),
        report.threshold,
        report.file
    );
    for hit in &report.candidates {
        println!(
            "{:>6.3}  <{}> class=\"{}\" id=\"{}\"",
            hit.score, hit.tag, hit.class_name, hit.id
        );
        for component in hit
            .breakdown
            .components
            .iter()
            .filter(|component| component.contribution > 0.0)
        {
            println!("          {:<15} {:.3}", component.label, component.contribution);
        }
    }
    Ok(())
}
