//! Implementation of `veritas align`.

use std::process::ExitCode;

use comfy_table::Cell;
use veritas_align::{Aligner, AlignmentRecord};

use crate::cli::{
    args::AlignCommand,
    context::CommandContext,
    output::{dim, print_json, success, table, truncate, warning},
};

/// Characters of each sentence shown in the table.
const CELL_CHARS: usize = 60;

/// Aligns a generated answer against source sentences and prints the records.
pub fn run(ctx: &CommandContext, cmd: &AlignCommand) -> ExitCode {
    let sources = match ctx.read_file(&cmd.sources) {
        Ok(contents) => source_lines(&contents),
        Err(code) => return code,
    };
    let generated = match ctx.text_arg(&cmd.generated) {
        Ok(text) => text,
        Err(code) => return code,
    };

    let threshold = cmd
        .threshold
        .unwrap_or(ctx.config.alignment.primary_threshold);
    let aligner = match Aligner::new(threshold) {
        Ok(aligner) => aligner,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let records = aligner.align(&generated, &sources);

    if cmd.output.json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("{}", dim("No sentences to align."));
        return ExitCode::SUCCESS;
    }

    let mut table = table(&["Generated", "Source", "Similarity", "Status"]);
    for record in &records {
        table.add_row(vec![
            Cell::new(truncate(record.generated(), CELL_CHARS)),
            Cell::new(truncate(record.source().unwrap_or("-"), CELL_CHARS)),
            Cell::new(format!("{:.3}", record.similarity())),
            Cell::new(status(record)),
        ]);
    }
    println!("{table}");

    ExitCode::SUCCESS
}

/// One trimmed source sentence per non-blank line.
fn source_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Short label for a record's outcome.
fn status(record: &AlignmentRecord) -> String {
    if record.is_aligned() {
        success("verified")
    } else if record.source().is_some() {
        warning("near")
    } else {
        dim("unmatched")
    }
}
