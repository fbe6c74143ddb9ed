mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tokio::net::TcpListener;

use jobpoll::config::{JobpollConfig, secs_to_duration};
use jobpoll::simulator::{self, JobSimulator};
use jobpoll::ui::PollProgress;
use jobpoll::{HttpStatusSource, JobStatus, PollingClient, StatusObserver, StatusResponse};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    jobpoll::logging::init_logging(cli.verbose);

    let mut config = JobpollConfig::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }

    cli.command.apply_overrides(&mut config);

    match cli.command {
        Command::Status => status(&config).await,
        Command::Wait { .. } => wait(&config).await,
        Command::Serve {
            host,
            port,
            completion_secs,
        } => {
            let completion_after = secs_to_duration("completion_secs", completion_secs)?;
            let listener = TcpListener::bind((host.as_str(), port))
                .await
                .with_context(|| format!("binding {host}:{port}"))?;
            simulator::serve(listener, JobSimulator::shared(completion_after)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::TriggerError => {
            let source = HttpStatusSource::new(config.base_url.as_str())?;
            simulator::request_error(source.http_client(), source.base_url()).await?;
            println!("Error triggered on {}", source.base_url());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn status(config: &JobpollConfig) -> Result<ExitCode> {
    let client = PollingClient::new(config.base_url.as_str())?;
    let response = client.get_status().await?;
    println!("{}", response.status());
    println!("{}", serde_json::to_string_pretty(response.raw_response())?);
    Ok(ExitCode::SUCCESS)
}

async fn wait(config: &JobpollConfig) -> Result<ExitCode> {
    let retry = config.retry.to_retry_config()?;
    let timeout = config.timeout()?;

    let progress = Arc::new(PollProgress::start(&config.base_url));
    let observer = Arc::clone(&progress);
    let client = PollingClient::new(config.base_url.as_str())?
        .with_retry_config(retry)?
        .with_observer(move |resp: &StatusResponse| observer.on_status(resp));

    match client.wait_for_completion(timeout).await {
        Ok(response) => {
            progress.finish(&response);
            Ok(match response.status() {
                JobStatus::Completed => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Err(e) => {
            progress.fail(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
