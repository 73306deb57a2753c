use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

/// Command-line configuration for the swing chart tool.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Input CSV file path containing OHLC(V) data.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input_path: PathBuf,

    /// Half-width of the window, in bars, a swing must dominate on each side.
    #[arg(short = 'r', long, default_value_t = 2)]
    pub radius: usize,

    /// IANA time zone used to interpret timestamps without an offset.
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Write detected swing points to this CSV file.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}
