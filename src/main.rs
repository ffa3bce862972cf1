use aos::cli::{Args, Commands, load_task_specs};
use aos::{AgentRegistry, AgentSystem, DEPARTMENTS, StaticAgent, SystemConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("aos=info").init();

    let args = Args::parse();

    match args.command {
        Commands::Run {
            config,
            tasks,
            workers,
            no_routines,
        } => run(config, tasks, workers, no_routines).await,
        Commands::CheckConfig { config } => check_config(config),
    }
}

async fn run(
    config_path: PathBuf,
    tasks: Option<PathBuf>,
    workers: Option<usize>,
    no_routines: bool,
) -> Result<()> {
    info!("Starting Agent Orchestration System");

    let mut config = SystemConfig::load(&config_path);
    if let Some(workers) = workers {
        config.max_workers = workers;
    }
    if no_routines {
        config.routines.enabled = false;
    }

    // Register the department agents; real deployments swap these for
    // implementations backed by actual business systems.
    let mut registry = AgentRegistry::new();
    for department in DEPARTMENTS {
        registry.register(Arc::new(StaticAgent::new(department)));
    }

    let system = AgentSystem::new(config, registry);

    if let Some(path) = tasks {
        let specs = load_task_specs(&path)?;
        info!("Submitting {} tasks from {:?}", specs.len(), path);
        for spec in specs {
            system.submit(spec).await;
        }
    }

    system.start();

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    system.stop();

    let status = system.system_status().await;
    info!(
        "Final status: {} pending, {} completed, {} need intervention",
        status.pending_tasks, status.completed_tasks, status.needs_intervention
    );

    Ok(())
}

fn check_config(config_path: PathBuf) -> Result<()> {
    let config = SystemConfig::load_strict(&config_path)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
