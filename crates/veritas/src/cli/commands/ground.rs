//! Implementation of `veritas ground`.

use std::process::ExitCode;

use veritas_align::{AlignmentRecord, ground};

use crate::cli::{args::GroundCommand, context::CommandContext, output::print_json};

/// Builds the grounded answer from serialized alignment records.
pub fn run(ctx: &CommandContext, cmd: &GroundCommand) -> ExitCode {
    let contents = match ctx.read_file(&cmd.records) {
        Ok(contents) => contents,
        Err(code) => return code,
    };

    let records: Vec<AlignmentRecord> = match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            eprintln!(
                "error: invalid alignment records in {}: {e}",
                cmd.records.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let grounded = ground(&records);
    if cmd.output.json {
        return print_json(&grounded);
    }

    println!("{}", grounded.text);
    ExitCode::SUCCESS
}
