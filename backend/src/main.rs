use clap::Parser;
use dotenv::dotenv;
use katana_output::cli::Cli;
use katana_output::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    cli.run(settings)
}
