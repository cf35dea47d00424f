use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use building_wizard::app::App;
use building_wizard::config::Config;
use building_wizard::logging;
use building_wizard::storage::FormStorage;
use building_wizard::ui::install_panic_hook;
use building_wizard::wizard::{read_snapshot, FieldValue, FormDataStore, StepCatalog};

#[derive(Parser)]
#[command(name = "building-wizard")]
#[command(about = "Multi-step add-building setup wizard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Keep form data in memory only; nothing is read from or written to disk
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the steps and sub-steps of the wizard
    Steps,

    /// Show which sub-steps have stored data
    Status,

    /// Print the stored form data as JSON
    Export {
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Delete the stored form data
    Reset {
        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Write the default configuration to .building-wizard/config.toml
    InitConfig {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();

    // File-based for TUI, stderr for CLI
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Steps) => cmd_steps(&config)?,
        Some(Commands::Status) => cmd_status(&config).await?,
        Some(Commands::Export { pretty }) => cmd_export(&config, pretty).await?,
        Some(Commands::Reset { yes }) => cmd_reset(&config, yes).await?,
        Some(Commands::InitConfig { force }) => cmd_init_config(force)?,
        None => run_tui(config, cli.ephemeral, logging_handle.log_file_path).await?,
    }

    Ok(())
}

async fn run_tui(config: Config, ephemeral: bool, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(config, ephemeral)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_steps(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;

    for step in catalog.steps() {
        println!("{}. {}", step.index, step.name);
        for (i, sub) in step.sub_steps.iter().enumerate() {
            println!("   {}.{} {}  [{}]", step.index, i + 1, sub.name, sub.component);
            if !sub.required_fields.is_empty() {
                println!("       required: {}", sub.required_fields.join(", "));
            }
        }
    }
    println!("{}", "─".repeat(60));
    println!(
        "{} steps, {} sub-steps",
        catalog.total_steps(),
        catalog.total_sub_steps()
    );

    Ok(())
}

async fn cmd_status(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;
    let storage = config.file_storage();
    let Some(store) = read_snapshot(&storage, &config.storage.key).await else {
        println!("No stored form data ({})", storage.path_for(&config.storage.key).display());
        return Ok(());
    };

    print_status(&catalog, &store);
    Ok(())
}

fn print_status(catalog: &StepCatalog, store: &FormDataStore) {
    println!("Stored form data ({} of {} sub-steps)", store.len(), catalog.total_sub_steps());
    println!("{}", "─".repeat(60));

    for pointer in catalog.pointers() {
        let Some(sub) = catalog.sub_step(pointer) else {
            continue;
        };
        let key = pointer.key().to_string();
        match store.get(&pointer.key()) {
            Some(fields) => {
                let filled = fields.values().filter(|v| v.is_filled()).count();
                let missing: Vec<&str> = sub
                    .required_fields
                    .iter()
                    .filter(|name| !fields.get(*name).is_some_and(FieldValue::is_filled))
                    .map(String::as_str)
                    .collect();
                let marker = if missing.is_empty() { "✓" } else { "!" };
                println!(
                    "{marker} {key:<10} {:<36} {filled}/{} fields",
                    sub.name,
                    fields.len()
                );
                if !missing.is_empty() {
                    println!("             missing: {}", missing.join(", "));
                }
            }
            None => println!("  {key:<10} {}", sub.name),
        }
    }
}

async fn cmd_export(config: &Config, pretty: bool) -> Result<()> {
    let storage = config.file_storage();
    let store = read_snapshot(&storage, &config.storage.key)
        .await
        .unwrap_or_default();

    let json = if pretty {
        serde_json::to_string_pretty(&store)?
    } else {
        serde_json::to_string(&store)?
    };
    println!("{json}");
    Ok(())
}

async fn cmd_reset(config: &Config, yes: bool) -> Result<()> {
    let storage = config.file_storage();
    let path = storage.path_for(&config.storage.key);

    if !yes {
        bail!(
            "This deletes {}. Re-run with --yes to confirm.",
            path.display()
        );
    }

    storage.remove(&config.storage.key).await?;
    tracing::info!(key = %config.storage.key, "Stored form data removed");
    println!("Removed {}", path.display());
    Ok(())
}

fn cmd_init_config(force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let written = Config::default().save()?;
    println!("Wrote {}", written.display());
    Ok(())
}
