use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "appliance-listing")]
#[command(about = "Submit an appliance rental listing to the hosted backend")]
pub struct CliArgs {
    /// Path to the backend configuration file
    #[arg(short, long, default_value = "listing-config.toml")]
    pub config: String,

    /// Path to the listing to submit
    #[arg(short, long)]
    pub listing: String,

    /// Look up the address with the geocoder before submitting
    #[arg(long)]
    pub geocode: bool,

    /// Start from the user's saved location
    #[arg(long)]
    pub prefill: bool,

    /// Validate the listing without uploading anything
    #[arg(long)]
    pub dry_run: bool,

    /// Override submission.navigation_policy (on_success | after_uploads)
    #[arg(long)]
    pub navigation_policy: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
