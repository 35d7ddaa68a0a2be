use clap::Parser;
use gpumon::cli::{
    clean, gpu, handle_completions, handle_config_init, jobs, logs, watch, Cli, Commands,
    ConfigCommands,
};
use gpumon::cli::context::load_config_with_overrides;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Config(ConfigCommands::Init(args)) => return handle_config_init(args),
        Commands::Completions(args) => {
            handle_completions(args);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config_with_overrides(&cli)?;
    gpumon::logging::init_tracing(&config.logging)?;
    if !cli.config.exists() {
        tracing::debug!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match &cli.command {
        Commands::Watch(args) => watch::run_watch(&config, args).await,
        Commands::Jobs(args) => jobs::run_jobs(&config, args).await,
        Commands::Gpu(args) => gpu::run_gpu(&config, args).await,
        Commands::Logs(args) => logs::run_logs(&config, args).await,
        Commands::CleanLogs(args) => clean::run_clean_logs(&config, args).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}
