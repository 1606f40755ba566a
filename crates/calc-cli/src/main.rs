//! Calculator previewer CLI.

use clap::{ColorChoice, Parser};
use calc_cli::commands::{
    PreviewRequest, StarterKind, run_mortgage, run_preview, run_quote, run_verify, starter_json,
};
use calc_cli::logging::{LogConfig, LogFormat, init_logging};
use calc_cli::summary::{print_check, print_distance, print_mortgage, print_preview};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, StarterArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Preview(args) => {
            let request = PreviewRequest {
                view: args.view.clone(),
                toggles: args.toggles.clone(),
                seed_policy: args.seed_policy.into(),
                show_rear: args.rear_override(),
            };
            run_preview(&args.config, &request).map(|preview| {
                print_preview(&preview);
                0
            })
        }
        Command::Quote(args) => run_quote(
            &args.params,
            args.distance,
            args.vehicle.into(),
            args.round_trip,
        )
        .map(|preview| {
            print_distance(&preview);
            0
        }),
        Command::Verify(args) => run_verify(
            &args.params,
            &args.response,
            args.vehicle.into(),
            args.round_trip,
        )
        .map(|check| {
            print_check(&check);
            if check.is_consistent() { 0 } else { 2 }
        }),
        Command::Mortgage(args) => run_mortgage(args.amount, args.rate, args.years).map(|quote| {
            print_mortgage(&quote);
            0
        }),
        Command::Starter { kind } => {
            let kind = match kind {
                StarterArg::Layered => StarterKind::Layered,
                StarterArg::Distance => StarterKind::Distance,
            };
            starter_json(kind).map(|json| {
                println!("{json}");
                0
            })
        }
    };
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_ansi(with_ansi);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
