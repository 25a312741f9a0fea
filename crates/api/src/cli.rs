use clap::{Parser, Subcommand, ValueEnum};
use grokgen_core::generation::{ResponseFormat, DEFAULT_IMAGE_COUNT};

/// Generate images with the Grok 2 image model
#[derive(Parser)]
#[command(name = "grokgen", version)]
#[command(about = "Generate images with the Grok 2 image model", long_about = None)]
pub struct Cli {
    /// Mode to run in. Without one, a menu asks.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API server
    Api,
    /// Generate images for a single prompt and exit
    Generate {
        /// Text prompt for image generation
        prompt: String,
        /// Number of images to generate (1-10)
        #[arg(short = 'n', long, default_value_t = i64::from(DEFAULT_IMAGE_COUNT), allow_negative_numbers = true)]
        count: i64,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = CliFormat::Url)]
        format: CliFormat,
        /// Don't save images automatically
        #[arg(long)]
        no_save: bool,
    },
    /// Menu-driven session with history and session logs
    Interactive,
    /// Pick one of the built-in example prompts
    Demo,
}

/// Output format as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliFormat {
    Url,
    B64,
}

impl From<CliFormat> for ResponseFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Url => ResponseFormat::Url,
            CliFormat::B64 => ResponseFormat::B64Json,
        }
    }
}
