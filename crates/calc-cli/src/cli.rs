//! CLI argument definitions for the calculator previewer.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use calc_engine::SeedPolicy;
use calc_model::VehicleClass;

#[derive(Parser)]
#[command(
    name = "calc",
    version,
    about = "Preview and price calculator configurations",
    long_about = "Preview layered configurator products and price distance tariffs.\n\n\
                  Reads the same JSON documents the configuration store keeps and\n\
                  prints what the customer-facing preview would show."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the preview of a configurator product.
    Preview(PreviewArgs),

    /// Price a measured distance with a tariff.
    Quote(QuoteArgs),

    /// Replay a routing service response against a tariff.
    Verify(VerifyArgs),

    /// Compute an annuity mortgage payment plan.
    Mortgage(MortgageArgs),

    /// Print a starter document for a new calculator.
    Starter {
        #[arg(value_enum)]
        kind: StarterArg,
    },
}

#[derive(Parser)]
#[command(group(ArgGroup::new("rear").args(["show_rear", "hide_rear"])))]
pub struct PreviewArgs {
    /// Configurator document (JSON).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// View to show instead of the resolved default.
    #[arg(long = "view", value_name = "KEY")]
    pub view: Option<String>,

    /// Switch an option on or off; repeat for several options.
    #[arg(long = "toggle", value_name = "ID")]
    pub toggles: Vec<String>,

    /// When default options are applied.
    #[arg(long = "seed-policy", value_enum, default_value = "once")]
    pub seed_policy: SeedPolicyArg,

    /// Force the rear view on.
    #[arg(long = "show-rear")]
    pub show_rear: bool,

    /// Force the rear view off.
    #[arg(long = "hide-rear")]
    pub hide_rear: bool,
}

impl PreviewArgs {
    pub fn rear_override(&self) -> Option<bool> {
        match (self.show_rear, self.hide_rear) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Distance tariff document (JSON).
    #[arg(value_name = "PARAMS")]
    pub params: PathBuf,

    /// One-way distance in kilometres.
    #[arg(long = "distance", value_name = "KM")]
    pub distance: f64,

    #[arg(long = "vehicle", value_enum)]
    pub vehicle: VehicleArg,

    /// Charge the way back as well.
    #[arg(long = "round-trip")]
    pub round_trip: bool,
}

#[derive(Parser)]
pub struct VerifyArgs {
    /// Distance tariff document (JSON).
    #[arg(value_name = "PARAMS")]
    pub params: PathBuf,

    /// Routing service response (JSON).
    #[arg(long = "response", value_name = "FILE")]
    pub response: PathBuf,

    #[arg(long = "vehicle", value_enum)]
    pub vehicle: VehicleArg,

    #[arg(long = "round-trip")]
    pub round_trip: bool,
}

#[derive(Parser)]
pub struct MortgageArgs {
    /// Loan amount.
    #[arg(long = "amount")]
    pub amount: f64,

    /// Annual interest rate in percent.
    #[arg(long = "rate")]
    pub rate: f64,

    /// Term in years.
    #[arg(long = "years")]
    pub years: u32,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SeedPolicyArg {
    Once,
    WhenEmpty,
}

impl From<SeedPolicyArg> for SeedPolicy {
    fn from(arg: SeedPolicyArg) -> Self {
        match arg {
            SeedPolicyArg::Once => SeedPolicy::Once,
            SeedPolicyArg::WhenEmpty => SeedPolicy::WhenEmpty,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VehicleArg {
    Small,
    Medium,
    Large,
}

impl From<VehicleArg> for VehicleClass {
    fn from(arg: VehicleArg) -> Self {
        match arg {
            VehicleArg::Small => VehicleClass::Small,
            VehicleArg::Medium => VehicleClass::Medium,
            VehicleArg::Large => VehicleClass::Large,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StarterArg {
    Layered,
    Distance,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
