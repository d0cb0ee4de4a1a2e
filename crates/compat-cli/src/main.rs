//! `compat` entry point: parse arguments, set up logging, dispatch.

use clap::Parser;
use compat_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init(args.no_color, args.quiet);

    let config = args.config.as_deref();
    let result = match args.command {
        cli::Command::Run(run_args) => commands::run_execute(run_args, config).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args, config).await,
        cli::Command::List(list_args) => commands::list_execute(list_args, config).await,
    };

    result.map_err(error::cli_error_to_miette)
}
