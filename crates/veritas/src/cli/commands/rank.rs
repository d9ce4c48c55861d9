//! Implementation of `veritas rank`.

use std::process::ExitCode;

use comfy_table::Cell;
use serde::Serialize;
use veritas_rank::Bm25Ranker;

use crate::cli::{
    args::RankCommand,
    context::CommandContext,
    output::{dim, print_json, table, truncate},
};

/// Characters of page text shown next to each score.
const PREVIEW_CHARS: usize = 80;

/// JSON output for one ranked page.
#[derive(Serialize)]
struct JsonRankedPage {
    /// Zero-based page index.
    page: usize,
    /// BM25+ score.
    score: f32,
    /// Start of the page text.
    preview: String,
}

/// JSON output for `veritas rank`.
#[derive(Serialize)]
struct JsonRankOutput {
    /// The query as given.
    query: String,
    /// Query terms after normalization and expansion.
    terms: Vec<String>,
    /// Pages in the document.
    total_pages: usize,
    /// Surviving pages, best first.
    results: Vec<JsonRankedPage>,
}

/// Ranks the pages of a document and prints them with their scores.
pub fn run(ctx: &CommandContext, cmd: &RankCommand) -> ExitCode {
    let document = match ctx.document(&cmd.file) {
        Ok(document) => document,
        Err(code) => return code,
    };

    let ranker = match Bm25Ranker::from_config(&ctx.config) {
        Ok(ranker) => ranker,
        Err(e) => {
            eprintln!("error: invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let top_k = cmd.top_k.unwrap_or(ctx.config.ranking.top_k);
    if top_k == 0 {
        eprintln!("error: --top-k must be at least 1");
        return ExitCode::FAILURE;
    }

    let ranked = ranker.rank(document.pages(), &cmd.query, Some(top_k));

    if cmd.output.json {
        let output = JsonRankOutput {
            query: cmd.query.clone(),
            terms: ranker.query_terms(&cmd.query),
            total_pages: document.len(),
            results: ranked
                .iter()
                .map(|r| JsonRankedPage {
                    page: r.page,
                    score: r.score,
                    preview: truncate(&document.pages()[r.page], PREVIEW_CHARS),
                })
                .collect(),
        };
        return print_json(&output);
    }

    if ranked.is_empty() {
        println!("{}", dim("No relevant pages."));
        return ExitCode::SUCCESS;
    }

    let mut table = table(&["Page", "Score", "Text"]);
    for r in &ranked {
        table.add_row(vec![
            Cell::new(r.page),
            Cell::new(format!("{:.3}", r.score)),
            Cell::new(truncate(&document.pages()[r.page], PREVIEW_CHARS)),
        ]);
    }
    println!("{table}");
    println!(
        "{}",
        dim(&format!("{} of {} pages", ranked.len(), document.len()))
    );

    ExitCode::SUCCESS
}
