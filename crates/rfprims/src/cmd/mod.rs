use std::path::PathBuf;

use clap::{Args, Subcommand};
use rfprims_serial::DEFAULT_BAUD_RATE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod listen;
pub mod ports;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List serial devices visible to the host.
    Ports(PortsArgs),
    /// Send one AT command frame, optionally awaiting its response.
    Send(SendArgs),
    /// Listen and print received frames.
    Listen(ListenArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ports(args) => ports::run(args),
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    /// Two-character AT command name (e.g. NI).
    #[arg(long, short = 'n')]
    pub name: String,
    /// Line rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Command data as a raw string.
    #[arg(long, conflicts_with = "hex")]
    pub data: Option<String>,
    /// Command data as hex digits (e.g. 0A1B).
    #[arg(long, conflicts_with = "data")]
    pub hex: Option<String>,
    /// Address a remote module instead of the locally attached one.
    #[arg(long)]
    pub remote: bool,
    /// 64-bit destination address in hex. Defaults to broadcast.
    #[arg(long, requires = "remote")]
    pub dest64: Option<String>,
    /// 16-bit destination network address in hex. Defaults to broadcast.
    #[arg(long, requires = "remote")]
    pub dest16: Option<String>,
    /// Wait for the correlated response frame and print it.
    #[arg(long)]
    pub wait: bool,
    /// Maximum time to wait for the response (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device path (e.g. /dev/ttyUSB0).
    pub device: PathBuf,
    /// Line rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Also report frames dropped by checksum (stderr).
    #[arg(long)]
    pub show_dropped: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
