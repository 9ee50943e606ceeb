//! Clap derive structures for the `tellive` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tellive -- command-line client for Telldus Live
#[derive(Debug, Parser)]
#[command(
    name = "tellive",
    version,
    about = "Control Telldus Live devices and read sensors from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "TELLDUS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "TELLDUS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dump devices, sensors, and data items
    Dump,

    /// List devices
    #[command(alias = "dev")]
    Devices,

    /// List sensors
    #[command(alias = "sen")]
    Sensors,

    /// List every sensor data item
    Data,

    /// Show the account's user profile
    User,

    /// Turn a device on
    On(DeviceArgs),

    /// Turn a device off
    Off(DeviceArgs),

    /// Dim a device to a level
    Dim(DimArgs),

    /// Pull a device up
    Up(DeviceArgs),

    /// Pull a device down
    Down(DeviceArgs),

    /// Stop a device
    Stop(DeviceArgs),

    /// Manage configuration and credentials
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device id
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DimArgs {
    /// Device id
    pub id: String,

    /// Dim level (0-255)
    #[arg(long, short = 'l')]
    pub level: u8,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive credential wizard
    Init,
    /// Print the config file path
    Path,
}
