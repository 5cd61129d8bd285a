use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use focus_shield_dom::NodeId;
use perceiver_distraction::Category;
use serde::Serialize;

use super::context::CliContext;
use super::output::print_structured;
use super::scan::checked_threshold;
use crate::page::read_document;

#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// HTML file to classify
    pub file: PathBuf,

    /// Minimum score; defaults to the simple-mode threshold
    #[arg(short, long)]
    pub threshold: Option<f32>,
}

#[derive(Serialize)]
struct Classified {
    node: NodeId,
    tag: String,
    class_name: String,
    id: String,
    score: f32,
    category: Option<Category>,
}

#[derive(Serialize)]
struct ClassifyReport {
    file: String,
    threshold: f32,
    elements: Vec<Classified>,
    totals: BTreeMap<String, usize>,
}

pub async fn cmd_classify(args: ClassifyArgs, ctx: &CliContext) -> Result<()> {
    let threshold = checked_threshold(args.threshold, ctx.config().simple_threshold)?;
    let doc = read_document(&args.file).await?;
    let scanner = ctx.scanner();

    let mut totals = BTreeMap::new();
    let elements: Vec<Classified> = scanner
        .scan(&doc, threshold)
        .into_iter()
        .map(|hit| {
            let category = scanner.classify(&doc, hit.node);
            let label = category.map_or("unknown", |category| category.as_str());
            *totals.entry(label.to_string()).or_insert(0) += 1;
            Classified {
                node: hit.node,
                tag: hit.tag,
                class_name: hit.class_name,
                id: hit.id,
                score: hit.score,
                category,
            }
        })
        .collect();

    let report = ClassifyReport {
        file: args.file.display().to_string(),
        threshold,
        elements,
        totals,
    };
    if print_structured(ctx.output(), &report)? {
        return Ok(());
    }

    for element in &report.elements {
        let category = element
            .category
            .map_or("unknown", |category| category.as_str());
        println!(
            "{:<14} {:>6.3}  <{}> class=\"{}\" id=\"{}\"",
            category, element.score, element.tag, element.class_name, element.id
        );
    }
    println!();
    for (category, count) in &report.totals {
        println!("{category}: {count}");
    }
    Ok(())
}
