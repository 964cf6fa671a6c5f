use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "raudit")]
#[command(
    version,
    about = "Responsiveness audit - grade how a static site adapts from desktop to mobile",
    long_about = "Responsiveness audit (raudit)\n\nModes:\n- analyze: profile every page's CSS and HTML, compare its desktop/mobile screenshots, and grade the project.\n- discover: list pages, stylesheet sources, screenshot pairs and the page-to-pair matching without scoring.\n\nScreenshots are expected as <page>.desktop.<ext> and <page>.mobile.<ext> (png, jpg, jpeg, webp).\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with [weights], [visual], [matching] and [css] sections; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a project's responsiveness
    Analyze {
        #[arg(help = "Project root containing the site's .html and .css files")]
        project: PathBuf,

        #[arg(
            long,
            short,
            value_name = "DIR",
            help = "Directory containing <page>.desktop.png / <page>.mobile.png captures"
        )]
        screenshots: PathBuf,

        #[arg(
            long,
            value_name = "DIR",
            default_value = "responsive_analysis",
            help = "Directory for comparison and heatmap images; created if missing"
        )]
        output_dir: PathBuf,

        #[arg(long, help = "Skip writing comparison and heatmap images (scores are unchanged)")]
        no_visuals: bool,

        #[arg(
            long,
            value_name = "F",
            help = "Minimum name similarity (exclusive, 0-1) for fuzzy page/screenshot matching"
        )]
        fuzzy_threshold: Option<f64>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// List discovered artifacts and page/screenshot matches without scoring
    Discover {
        #[arg(help = "Project root containing the site's .html and .css files")]
        project: PathBuf,

        #[arg(
            long,
            short,
            value_name = "DIR",
            help = "Directory containing <page>.desktop.png / <page>.mobile.png captures"
        )]
        screenshots: PathBuf,

        #[arg(
            long,
            value_name = "F",
            help = "Minimum name similarity (exclusive, 0-1) for fuzzy page/screenshot matching"
        )]
        fuzzy_threshold: Option<f64>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
