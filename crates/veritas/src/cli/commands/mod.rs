//! Command implementations and dispatch.

pub mod align;
pub mod answer;
pub mod config;
pub mod ground;
pub mod init;
pub mod rank;
pub mod sentences;
pub mod status;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Rank(cmd) => rank::run(ctx, &cmd),
        Commands::Sentences(cmd) => sentences::run(ctx, &cmd),
        Commands::Align(cmd) => align::run(ctx, &cmd),
        Commands::Ground(cmd) => ground::run(ctx, &cmd),
        Commands::Answer(cmd) => answer::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Status => status::run(ctx),
        Commands::Config => config::run(ctx),
    }
}
