// src/main.rs
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use maa_server_agent::logging::{self, LoggingConfig};
use maa_server_agent::range::ServerRangeSpec;
use maa_server_agent::regions::{ServerPage, ServerRegionTable};
use maa_server_agent::{AgentConfig, AgentRegistry};

#[derive(Parser, Debug)]
#[command(name = "maa-server-agent", version, about = "Server sweep plugins for the automation host")]
struct Cli {
    /// Agent config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a server range expression, e.g. "978-1012,1015-1020"
    Expand { range: String },
    /// Print the server button regions in effect
    Regions {
        #[arg(long)]
        id: Option<u32>,
    },
    /// List registered recognitions and actions
    Plugins,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = match cli.log_level.as_deref() {
        Some(level) => LoggingConfig::with_level(
            logging::parse_level(level).with_context(|| format!("unknown log level `{}`", level))?,
        ),
        None => LoggingConfig::from_env(),
    };
    logging::init_logging(log_config);

    let config = match &cli.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    debug!(?config, "config loaded");

    match cli.command {
        Command::Expand { range } => {
            let spec: ServerRangeSpec = range.parse()?;
            info!(count = spec.len(), "range expanded");
            let ids: Vec<String> = spec.servers().iter().map(u32::to_string).collect();
            println!("{}", ids.join(","));
        }
        Command::Regions { id } => {
            let table = ServerRegionTable::with_overrides(&config.servers);
            match id {
                Some(id) => {
                    let roi = table
                        .get(id)
                        .with_context(|| format!("no region recorded for server {}", id))?;
                    println!("{}\t{}\t{:?}", id, ServerPage::for_server(id), <[i32; 4]>::from(roi));
                }
                None => {
                    for (id, roi) in table.iter() {
                        println!("{}\t{}\t{:?}", id, ServerPage::for_server(id), <[i32; 4]>::from(roi));
                    }
                }
            }
        }
        Command::Plugins => {
            let registry = AgentRegistry::with_defaults(&config);
            println!("recognitions:");
            for name in registry.recognition_names() {
                println!("  {}", name);
            }
            println!("actions:");
            for name in registry.action_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
