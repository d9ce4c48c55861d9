//! Implementation of `veritas sentences`.

use std::process::ExitCode;

use serde::Serialize;

use crate::cli::{
    args::SentencesCommand,
    context::CommandContext,
    output::{dim, print_json, subheader},
};

/// JSON output for one page.
#[derive(Serialize)]
struct JsonPage<'a> {
    /// Zero-based page index.
    page: usize,
    /// Unique sentences of the page.
    sentences: &'a [String],
}

/// Prints the sentences of every page.
pub fn run(ctx: &CommandContext, cmd: &SentencesCommand) -> ExitCode {
    let document = match ctx.document(&cmd.file) {
        Ok(document) => document,
        Err(code) => return code,
    };
    let by_page = document.sentences_by_page();

    if cmd.output.json {
        let pages: Vec<JsonPage<'_>> = by_page
            .iter()
            .enumerate()
            .map(|(page, sentences)| JsonPage { page, sentences })
            .collect();
        return print_json(&pages);
    }

    if by_page.is_empty() {
        println!("{}", dim("Document has no pages."));
        return ExitCode::SUCCESS;
    }

    for (page, sentences) in by_page.iter().enumerate() {
        println!("{}", subheader(&format!("Page {page}")));
        if sentences.is_empty() {
            println!("   {}", dim("(no sentences)"));
        }
        for (i, sentence) in sentences.iter().enumerate() {
            println!("   {} {sentence}", dim(&format!("{:>3}.", i + 1)));
        }
        println!();
    }

    ExitCode::SUCCESS
}
