use std::collections::BTreeMap;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod run;

use config::{parse_duration, parse_tags, InfluxArgs, KafkaArgs, WindowArgs};

#[derive(Parser, Debug)]
#[command(name = "downfold")]
#[command(about = "Windowed telemetry downsampling service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Consume records, downsample per tumbling window, republish summaries.
    Downsample {
        /// Topic to consume records from.
        #[arg(long, env = "DOWNFOLD_INPUT_TOPIC")]
        input: String,
        /// Topic to publish summaries to.
        #[arg(long, env = "DOWNFOLD_OUTPUT_TOPIC")]
        output: String,
        #[command(flatten)]
        kafka: KafkaArgs,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Poll the time-series store and publish rows to a topic.
    InfluxSource {
        /// Topic to publish rows to.
        #[arg(long, env = "DOWNFOLD_OUTPUT_TOPIC")]
        output: String,
        /// Measurement to poll.
        #[arg(long, env = "INFLUXDB_MEASUREMENT")]
        measurement: String,
        /// Poll interval, e.g. `5m`.
        #[arg(long, env = "DOWNFOLD_POLL_INTERVAL", default_value = "5m", value_parser = parse_duration)]
        poll_interval: Duration,
        /// Column used as the message key, if any.
        #[arg(long, env = "DOWNFOLD_KEY_FIELD")]
        key_field: Option<String>,
        #[command(flatten)]
        kafka: KafkaArgs,
        #[command(flatten)]
        influx: InfluxArgs,
    },
    /// Consume summaries and persist them as measurement points.
    InfluxSink {
        /// Topic to consume summaries from.
        #[arg(long, env = "DOWNFOLD_INPUT_TOPIC")]
        input: String,
        /// Measurement to write points into.
        #[arg(long, env = "INFLUXDB_MEASUREMENT")]
        measurement: String,
        /// Field of the inbound record holding the value to persist.
        #[arg(long, env = "DOWNFOLD_DATA_FIELD")]
        data_field: String,
        /// Static tags attached to every point, as a JSON object.
        #[arg(long, env = "INFLUXDB_TAGS", default_value = "{}", value_parser = parse_tags)]
        tags: BTreeMap<String, String>,
        #[command(flatten)]
        kafka: KafkaArgs,
        #[command(flatten)]
        influx: InfluxArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tokio::select! {
        result = dispatch(cli.command) => result,
        _ = tokio::signal::ctrl_c() => {
            // In-flight accumulators are discarded; there is no
            // partial-window flush on shutdown.
            info!("interrupt received, shutting down");
            Ok(())
        }
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Downsample {
            input,
            output,
            kafka,
            window,
        } => run::downsample(&input, &output, &kafka, &window).await,
        Commands::InfluxSource {
            output,
            measurement,
            poll_interval,
            key_field,
            kafka,
            influx,
        } => run::influx_source(&output, &measurement, poll_interval, key_field, &kafka, &influx).await,
        Commands::InfluxSink {
            input,
            measurement,
            data_field,
            tags,
            kafka,
            influx,
        } => run::influx_sink(&input, &measurement, &data_field, tags, &kafka, &influx).await,
    }
}
