//! lonet-switch - Binary Entry Point
//!
//! Command line front end over the switchboard. `serve` runs the JSON-RPC
//! command server on stdin/stdout instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

use lonet_switch::commands::{messages, register_all_commands};
use lonet_switch::{CommandServer, Mode, ServerInfo, StoreConfig, Switchboard, WILDCARD_GROUP};

#[derive(Parser)]
#[command(name = "lonet-switch", version, about = "Switch groups between local and network mode")]
struct Cli {
    /// Data directory (defaults to $LONET_SWITCH_HOME or ~/.lonet_switch)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Switch a group to lo or net mode
    Switch {
        mode: Mode,
        #[arg(default_value = WILDCARD_GROUP)]
        group: String,
        #[arg(default_value = "")]
        locale: String,
    },
    /// Show the effective state of a group
    Status {
        #[arg(default_value = WILDCARD_GROUP)]
        group: String,
    },
    /// List every group with its effective state
    ListAll,
    /// Print recorded switch events
    History { group: Option<String> },
    /// Keep only the latest event per group
    Compact,
    /// Delete every event of a group
    ClearGroup { group: String },
    /// Manage registered .jinja templates
    Jinjas {
        #[command(subcommand)]
        command: JinjasCommand,
    },
    /// Run the JSON-RPC command server on stdin/stdout
    Serve,
}

#[derive(Subcommand)]
enum JinjasCommand {
    /// List registered templates
    List,
    /// Register a template
    Add {
        path: PathBuf,
        #[arg(long, default_value = WILDCARD_GROUP)]
        group: String,
    },
    /// Unregister a template
    Delete { path: PathBuf },
}

fn init_logging() -> Result<()> {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    // stdout belongs to command output and the JSON-RPC stream
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Registered paths are stored absolute so they render from any directory
fn absolute_template_path(path: &Path) -> Result<String> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("could not resolve the current directory")?
            .join(path)
    };
    Ok(path.to_string_lossy().into_owned())
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::default(),
    };
    let board = Switchboard::open(&config)
        .with_context(|| format!("could not open store in {}", config.data_dir().display()))?;

    match cli.command {
        Command::Switch {
            mode,
            group,
            locale,
        } => {
            let outcome = board.switch(mode, &group, &locale)?;
            for render in outcome.renders.iter().filter(|r| !r.is_ok()) {
                eprintln!("{}: {}", render.template, serde_json::to_string(&render.outcome)?);
            }
            for plugin in outcome.plugins.iter().filter(|p| !p.is_ok()) {
                eprintln!("{}: {}", plugin.script_id, serde_json::to_string(&plugin.outcome)?);
            }
            println!("{}", messages::switched(&outcome));
        }
        Command::Status { group } => {
            let state = board.status(&group)?;
            println!("{}", messages::status(&group, &state));
        }
        Command::ListAll => {
            let groups = board.list_groups()?;
            println!("{}", messages::group_listing(&groups));
        }
        Command::History { group } => {
            for event in board.history(group.as_deref())? {
                println!(
                    "{} | Group: {} | State: {} | Locale: {}",
                    event.created_at.to_rfc3339(),
                    event.group,
                    event.mode,
                    event.locale
                );
            }
        }
        Command::Compact => {
            let report = board.compact().context("Error compacting database")?;
            println!("{}", messages::compacted(&report));
        }
        Command::ClearGroup { group } => {
            board
                .clear_group(&group)
                .with_context(|| format!("Error clearing group '{}'", group))?;
            println!("{}", messages::group_cleared(&group));
        }
        Command::Jinjas { command } => match command {
            JinjasCommand::List => {
                for template in board.list_templates()? {
                    println!("{}", template.path);
                }
            }
            JinjasCommand::Add { path, group } => {
                let path = absolute_template_path(&path)?;
                let added = board
                    .add_template(&path, &group)
                    .with_context(|| format!("Error adding template '{}'", path))?;
                println!("{}", messages::template_added(&added));
            }
            JinjasCommand::Delete { path } => {
                let path = absolute_template_path(&path)?;
                let removed = board
                    .remove_template(&path)
                    .with_context(|| format!("Error deleting template '{}'", path))?;
                println!("{}", messages::template_removed(&path, removed));
            }
        },
        Command::Serve => {
            let mut server = CommandServer::stdio(ServerInfo::default());
            register_all_commands(&mut server, Arc::new(board));
            server
                .run()
                .map_err(|e| anyhow::anyhow!("command server failed: {}", e))?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("could not initialise logging: {}", e);
    }

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
