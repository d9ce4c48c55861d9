//! Implementation of `veritas answer`.

use std::process::ExitCode;

use comfy_table::Cell;
use veritas_align::GroundingTier;

use crate::{
    GroundedReport, StaticGenerator,
    cli::{
        args::AnswerCommand,
        context::CommandContext,
        output::{dim, print_json, subheader, success, table, truncate, warning},
    },
    parse_selected_sentences,
};

/// Characters of each sentence shown in the alignment table.
const CELL_CHARS: usize = 60;

/// Runs the full pipeline on a document with a pre-generated answer.
pub fn run(ctx: &CommandContext, cmd: &AnswerCommand) -> ExitCode {
    let document = match ctx.document(&cmd.file) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let generated = match ctx.text_arg(&cmd.generated) {
        Ok(text) => text,
        Err(code) => return code,
    };
    let selected = match &cmd.selected {
        Some(path) => match ctx.read_file(path) {
            Ok(output) => Some(parse_selected_sentences(&output)),
            Err(code) => return code,
        },
        None => None,
    };

    let pipeline = match ctx.pipeline(document) {
        Ok(pipeline) => pipeline,
        Err(code) => return code,
    };

    let generator = StaticGenerator::new(generated);
    let report = match &selected {
        Some(selected) => pipeline.answer_with_selection(&cmd.question, selected, &generator),
        None => pipeline.answer(&cmd.question, &generator),
    };

    if cmd.output.json {
        return print_json(&report);
    }

    print_report(&report);
    ExitCode::SUCCESS
}

/// Prints a report for a terminal.
fn print_report(report: &GroundedReport) {
    println!("{}", subheader("Answer:"));
    println!("   {}", report.answer);
    println!();

    if let Some(tier) = report.tier {
        let label = match tier {
            GroundingTier::Verified => success("verified"),
            GroundingTier::BestEffort => warning("best effort"),
            GroundingTier::Refused => warning("refused"),
        };
        println!("{} {label}", subheader("Grounding:"));
    }

    let pages: Vec<String> = report.source_pages.iter().map(ToString::to_string).collect();
    if !pages.is_empty() {
        println!("{} {}", subheader("Pages:"), pages.join(", "));
    }
    println!(
        "{}",
        dim(&format!("{} source sentences", report.source_sentences.len()))
    );

    if report.alignment_details.is_empty() {
        return;
    }

    println!();
    let mut table = table(&["Generated", "Source", "Similarity"]);
    for record in &report.alignment_details {
        table.add_row(vec![
            Cell::new(truncate(record.generated(), CELL_CHARS)),
            Cell::new(truncate(record.source().unwrap_or("-"), CELL_CHARS)),
            Cell::new(format!("{:.3}", record.similarity())),
        ]);
    }
    println!("{table}");
}
