use clap::Parser;
use wboard::cli::{Cli, Commands};
use wboard::config::GeneralConfig;
use wboard::{Config, run_command, serve};

fn runtime(worker_threads: usize) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    builder.build()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = Config::load()?;
            runtime(config.general.worker_threads)?.block_on(serve(config))
        }
        command => {
            runtime(GeneralConfig::default().worker_threads)?.block_on(run_command(command))
        }
    }
}
