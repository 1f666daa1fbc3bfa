//! invomail - Russian invoice extraction from email archives.
//!
//! A tool for pulling PDF invoice attachments out of a mail folder,
//! filtering them by language, and reporting per-vendor totals.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging based on verbosity
    let default_filter = if invomail::cli::is_verbose() {
        "invomail=info"
    } else {
        "invomail=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    invomail::cli::run()
}
