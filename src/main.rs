use baseline::presentation::cli::{Cli, CliApp};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so summaries on stdout stay clean)
    init_tracing(cli.verbose);

    // Run the CLI application
    let app = CliApp::new(cli);
    app.run().await
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "baseline=debug"
    } else {
        "baseline=warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
