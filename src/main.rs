use clap::Parser;
use switchyard::cli::{run_cli, Cli};
use switchyard::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging(&LogConfig::from_env())?;
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    run_cli(&cli, &mut stdout.lock())
}
