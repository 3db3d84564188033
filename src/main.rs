use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use svg_icons::{
    LabelPosition,
    cache::CacheBuilder,
    config::Config,
    sources::resolver_from_config,
};

#[derive(Parser)]
#[command(name = "svg-icons")]
#[command(version = "0.1.0")]
#[command(about = "Render icons from SVG directories and JSON icon caches")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (defaults to $SVG_ICONS_CONFIG or icons.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an icon as HTML
    Render {
        name: String,
        /// Size key, e.g. `m` or `xl`
        #[arg(short, long)]
        size: Option<String>,
        /// Label text
        #[arg(short, long)]
        label: Option<String>,
        /// Place the label left of the icon
        #[arg(long)]
        label_left: bool,
        /// Size key for the label
        #[arg(long)]
        label_size: Option<String>,
        /// Extra classes for the icon tag
        #[arg(long)]
        class: Option<String>,
    },
    /// Check whether an icon exists
    Has { name: String },
    /// Build the icon cache from the configured directories
    BuildCache {
        /// Delete the existing cache first
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("svg_icons={},sandboxed_dirs={}", cli.log_level, cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    match cli.command {
        Command::Render {
            name,
            size,
            label,
            label_left,
            label_size,
            class,
        } => {
            let resolver = resolver_from_config(&config).await;
            let mut icon = resolver.get(&name).await?;

            if let Some(size) = size {
                icon = icon.size(&size);
            }
            if let Some(class) = class {
                icon = icon.attr("class", class);
            }
            if let Some(label) = label {
                let position = if label_left {
                    LabelPosition::Left
                } else {
                    LabelPosition::Right
                };
                icon = icon.label_at(&label, position);
            }
            if let Some(label_size) = label_size {
                icon = icon.label_size(&label_size);
            }

            println!("{icon}");
        }
        Command::Has { name } => {
            let resolver = resolver_from_config(&config).await;
            if !resolver.has(&name).await {
                bail!("Icon [{name}] not found");
            }
            println!("{name}");
        }
        Command::BuildCache { clear } => {
            let builder = CacheBuilder::new(config.icons.search_dirs());
            if clear {
                CacheBuilder::prepare(&config.cache.dir, true).await?;
            }

            let report = builder
                .build(&config.cache.dir, config.cache.layout)
                .await
                .with_context(|| {
                    format!("Failed to build cache at {}", config.cache.dir.display())
                })?;

            info!("Cache layout: {}", config.cache.layout);
            println!(
                "{} icons cached, {} skipped",
                report.written, report.skipped
            );
        }
    }

    Ok(())
}
