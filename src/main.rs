mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_analyze, run_discover};

fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Analyze {
            project,
            screenshots,
            output_dir,
            no_visuals,
            fuzzy_threshold,
            format,
            output,
        } => run_analyze(
            args.config,
            args.verbose,
            project,
            screenshots,
            output_dir,
            no_visuals,
            fuzzy_threshold,
            format,
            output,
        ),
        Commands::Discover {
            project,
            screenshots,
            fuzzy_threshold,
            format,
            output,
        } => run_discover(
            args.config,
            args.verbose,
            project,
            screenshots,
            fuzzy_threshold,
            format,
            output,
        ),
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
