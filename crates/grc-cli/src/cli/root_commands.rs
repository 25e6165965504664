use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Discover an application's schema (metadata first, then sampling).
    Discover(DiscoverArgs),
    /// List the retrieval paths the instance exposes.
    Endpoints,
    /// Discover a schema and check it against fresh records.
    Validate(ValidateArgs),
}

/// Identity of one application in the target system.
#[derive(Clone, Debug, Args)]
pub struct ApplicationArgs {
    /// Numeric application id.
    pub application_id: i64,
    /// Display name, used in errors and logs.
    pub application_name: String,
    /// Retrieval path under the record API.
    pub retrieval_path: String,
}

#[derive(Clone, Debug, Args)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub application: ApplicationArgs,

    /// Include the discovery phase trace in the output.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub application: ApplicationArgs,

    /// Exit with an error when the report shows drift.
    #[arg(long)]
    pub fail_on_drift: bool,
}
