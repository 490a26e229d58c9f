use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yokai_character_generator::app::{render_report, App, OutputFormat, RunRequest};
use yokai_character_generator::models::{Config, PowerLevel};

#[derive(Debug, Parser)]
#[command(name = "yokai-character-generator")]
#[command(about = "Generate Touhou-style yokai characters")]
struct CliArgs {
    /// Kind of yokai, e.g. kitsune, oni, tengu, kappa, jorogumo.
    #[arg(short, long, default_value = "")]
    yokai_type: String,

    /// Boss tier, e.g. "stage 3 boss" or stage-3-boss.
    #[arg(short, long, default_value = "stage 3 boss", value_parser = parse_power_level_arg)]
    power_level: PowerLevel,

    /// Optional element, e.g. fire, water, ice, lightning, wind.
    #[arg(short, long, default_value = "")]
    element: String,

    /// Write the generated character to EXPORT_DIR as JSON.
    #[arg(long)]
    export: bool,

    /// Output format for the result.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the rendered output to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Override the generation endpoint (YOKAI_API_URL).
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

fn parse_power_level_arg(input: &str) -> std::result::Result<PowerLevel, String> {
    input.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yokai_character_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(endpoint) = args.endpoint {
        config.api_url = endpoint;
    }

    info!("Starting yokai-character-generator");

    let app = match App::new(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let report = app
        .run(RunRequest {
            yokai_type: args.yokai_type,
            power_level: args.power_level,
            element: args.element,
            export: args.export,
        })
        .await?;

    let rendered = render_report(&report, args.format)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!("Wrote output to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if report.succeeded() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
