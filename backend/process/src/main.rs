use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::{Job, config::Config, log_report, trigger::serve};
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the update once and print the report.
    Run,

    /// Serve the POST trigger and run on a fixed interval.
    Serve,
}

#[tokio::main]
async fn main() {
    common::telemetry::init();

    let args = Args::parse();

    if let Err(err) = dispatch(args).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn dispatch(args: Args) -> Result<()> {
    let config = Config::load()?;
    let job = Job::new(&config)?;

    match args.command {
        Command::Run => {
            let result = job.run().await;
            log_report(&result);

            println!("{}", serde_json::to_string_pretty(&result?)?);
        }
        Command::Serve => {
            serve(Arc::new(job), config.port, config.interval).await?;
        }
    }

    Ok(())
}
