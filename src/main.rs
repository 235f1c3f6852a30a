use clap::Parser;
use firehose::config::cli::{Cli, Command, OutputFormat};
use firehose::sources::{get_source, source_names, SourceContext};
use firehose::utils::error::{FirehoseError, Result};
use firehose::utils::{logger, text, validation};
use firehose::{Firehose, Item, SourcesConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Update {
            source,
            list_sources,
            data_dir,
        } => update(source, list_sources, data_dir).await,
        Command::Stream { output, limit } => stream(&cli.url, &cli.token, output, limit).await,
    }
}

fn default_app_dir() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("firehose").map_err(|e| {
        FirehoseError::Config {
            message: format!("unable to determine app directory: {}", e),
        }
    })?;
    Ok(dirs.get_data_home())
}

async fn update(
    source: Option<String>,
    list_sources: bool,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    if list_sources {
        for name in source_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let Some(name) = source else {
        return Err(FirehoseError::Config {
            message: "--source is required to update".to_string(),
        });
    };

    // Bail if a passed --data-dir doesn't exist
    if let Some(dir) = &data_dir {
        if !dir.is_dir() {
            return Err(FirehoseError::Config {
                message: format!("{} is not a directory", dir.display()),
            });
        }
    }

    let app_dir = default_app_dir()?;
    let data_path = match data_dir {
        Some(dir) => dir,
        None => {
            let path = app_dir.join("data");
            if !path.is_dir() {
                std::fs::create_dir_all(&path)?;
                println!("Created '{}'", path.display());
            }
            path
        }
    };

    let config = SourcesConfig::load(&data_path)?;
    let ctx = SourceContext::new(data_path, app_dir.join("venv"), config);
    let src = get_source(&name, ctx)?;

    if !src.enabled() {
        println!("❌ Source ({}) is currently disabled.", name);
        return Ok(());
    }

    if !src.is_installed() {
        tracing::info!("Installing {}...", name);
        src.install().await?;
    }

    tracing::info!("Updating {}...", name);
    src.update().await?;

    println!("✅ Source ({}) updated.", name);
    Ok(())
}

async fn stream(url: &str, token: &str, output: OutputFormat, limit: usize) -> Result<()> {
    validation::validate_url("--url", url)?;
    if validation::validate_non_empty_string("--token", token).is_err() {
        return Err(FirehoseError::Config {
            message: "API token required. Set FIREHOSE_TOKEN or --token".to_string(),
        });
    }

    let hose = Firehose::new(url, token)?;
    let items = hose.firehose().await?;

    match output {
        OutputFormat::Json => {
            let limited: Vec<&Item> = items.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&limited)?);
        }
        OutputFormat::Plain => {
            for item in items.iter().take(limit) {
                let description = text::truncate(&item.description, 100);
                let timestamp = item
                    .timestamp
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_else(|| "undated".to_string());
                println!("[{}] {}: {} ({})", item.label, item.title, description, timestamp);
            }
        }
    }
    Ok(())
}
