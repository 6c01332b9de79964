use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The molflow developers",
    version,
    about = "molflow CLI - Lay out line-notation molecules in 3D and render depth-sorted 2D views.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a molecule, compute its 3D layout and write the normalized graph.
    Layout(LayoutArgs),
    /// Render one depth-sorted frame of a molecule to SVG.
    Render(RenderArgs),
    /// Lay out every molecule listed in a file, in parallel.
    Batch(BatchArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xyz,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppliedSource {
    /// Coordinates from an external structure source.
    #[default]
    External,
    /// Coordinates suggested by a generative service.
    Ai,
}

/// Configuration options shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the number of relaxation iterations.
    #[arg(long, value_name = "INT")]
    pub iterations: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S embedding.ideal-bond-length=2.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `layout` subcommand.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Structural notation of the molecule (e.g., "CCO").
    #[arg(required = true, value_name = "NOTATION")]
    pub notation: String,

    /// Display name stored with the output.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Output path. Writes to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output file format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Structural notation of the molecule. Not needed with --coords.
    #[arg(required_unless_present = "coords", value_name = "NOTATION")]
    pub notation: Option<String>,

    /// Path of the SVG file to write.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Render supplied coordinates (JSON graph or XYZ file) instead of computing a layout.
    #[arg(long, value_name = "PATH")]
    pub coords: Option<PathBuf>,

    /// Origin of the supplied coordinates.
    #[arg(long, value_enum, default_value_t = SuppliedSource::External)]
    pub source: SuppliedSource,

    /// Camera pitch in degrees.
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub pitch: Option<f64>,

    /// Camera yaw in degrees.
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub yaw: Option<f64>,

    /// View scale in pixels per normalized unit.
    #[arg(long, value_name = "FLOAT")]
    pub scale: Option<f64>,

    /// Image width in pixels.
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Image height in pixels.
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Also write the depth-ordered render primitives as JSON.
    #[arg(long, value_name = "PATH")]
    pub primitives: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Text file with one `NOTATION [NAME]` entry per line. Blank lines and lines
    /// starting with '#' are skipped.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives one JSON graph per entry.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}
