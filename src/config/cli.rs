use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "review-gateway")]
#[command(about = "Aggregate guest reviews from Hostaway and Google with moderation flags")]
pub struct CliConfig {
    /// Path to a TOML configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Only print reviews whose moderation flag is set
    #[arg(long)]
    pub published_only: bool,

    /// Public property view: published reviews of one listing
    #[arg(long)]
    pub listing: Option<String>,

    /// Toggle the published flag of a review id, then print the refreshed list
    #[arg(long)]
    pub toggle: Option<String>,

    /// Print summary statistics instead of the review list
    #[arg(long)]
    pub stats: bool,

    /// Print per-provider outcomes alongside the reviews
    #[arg(long)]
    pub report: bool,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
