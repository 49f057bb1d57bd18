//! `swarm-e2e` command-line entry point.
//!
//! Housekeeping for end-to-end test runs: sweep up leftover test services,
//! inspect the tasks of a service, or block until a service converges.
//! Domain errors are converted to `eyre::Report` at this boundary.
//!
//! Log output goes to stderr and is filtered by `RUST_LOG` (default `warn`).

use bollard::Docker;
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use mockable::DefaultEnv;
use swarm_e2e::config::{Cli, Commands, HarnessConfig, TasksArgs, WaitArgs, load_config};
use swarm_e2e::engine::{EngineConnector, SocketResolver};
use swarm_e2e::error::Result as HarnessResult;
use swarm_e2e::swarm::{
    clean_test_services, running_task_count, service_tasks, wait_for_running_tasks,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> EyreResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).await
}

async fn run(cli: &Cli, config: &HarnessConfig) -> EyreResult<()> {
    let docker = connect(config).await.map_err(Report::from)?;

    match &cli.command {
        Commands::Clean => clean(&docker).await,
        Commands::Tasks(args) => list_tasks(&docker, args).await.map_err(Report::from),
        Commands::Wait(args) => wait(&docker, config, args).await,
    }
}

/// Resolve the endpoint and confirm the engine answers.
async fn connect(config: &HarnessConfig) -> HarnessResult<Docker> {
    let env = DefaultEnv::new();
    let socket = SocketResolver::new(&env).resolve(config.engine_socket.as_deref());
    info!(%socket, "using engine endpoint");
    EngineConnector::connect_and_verify_async(&socket).await
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn clean(docker: &Docker) -> EyreResult<()> {
    let report = clean_test_services(docker).await.map_err(Report::from)?;
    for service_id in report.removed() {
        println!("removed {service_id}");
    }
    report.into_result().map_err(Report::from)?;
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn list_tasks(docker: &Docker, args: &TasksArgs) -> HarnessResult<()> {
    let tasks = service_tasks(docker, &args.service).await?;
    for task in &tasks {
        let id = task.id.as_deref().unwrap_or("<unknown>");
        let node = task.node_id.as_deref().unwrap_or("<unassigned>");
        let state = task
            .status
            .as_ref()
            .and_then(|status| status.state.as_ref())
            .map_or_else(|| String::from("<unknown>"), |state| state.to_string());
        println!("{id}\t{node}\t{state}");
    }
    println!(
        "{} of {} tasks running",
        running_task_count(&tasks),
        tasks.len()
    );
    Ok(())
}

#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn wait(docker: &Docker, config: &HarnessConfig, args: &WaitArgs) -> EyreResult<()> {
    let poller = config.poll.poller().map_err(Report::from)?;
    wait_for_running_tasks(
        docker,
        &args.service,
        args.replicas,
        &poller,
        config.poll.timeout(),
    )
    .await
    .map_err(Report::from)?;
    println!("{} has {} running tasks", args.service, args.replicas);
    Ok(())
}
