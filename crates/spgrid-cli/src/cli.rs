//! spgrid - terminal front end for stored-procedure backed grids
//!
//! Usage examples:
//!   spgrid --config inventory.toml show
//!   spgrid show --page 2
//!   spgrid add --set item=Bolt --set QtyBag=4
//!   spgrid edit 17 --set Verificada=true
//!   spgrid delete 17 --yes

mod logging;
mod terminal;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use spgrid_client::RemoteProcedureClient;
use spgrid_core::{GridOptions, RecordKey};
use spgrid_grid::{DeleteOutcome, GridController};

use crate::logging::LoggingConfig;
use crate::terminal::{TerminalInteraction, TerminalSurface, render_table};

#[derive(Parser)]
#[command(name = "spgrid", about = "Browse and edit a table through its stored procedure", version)]
struct Cli {
    /// Grid configuration file (.toml or .json)
    #[arg(long, short, env = "SPGRID_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log grid and request details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write JSON logs under the data directory
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the grid
    Show {
        /// Page to print (1-based); the page size comes from `pageLength`
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a record
    Add {
        /// Field assignment, e.g. `--set item=Bolt`; repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Edit the record with the given id
    Edit {
        id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Delete the record with the given id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = if cli.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };
    let _guard = logging::init(logging.with_json_logs(cli.json_logs))?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let options = load_options(&config_path)?;

    run(cli.command, options).await
}

async fn run(command: Command, options: GridOptions) -> Result<()> {
    let assume_yes = matches!(command, Command::Delete { yes: true, .. });
    let surface = TerminalSurface::new();
    let client = RemoteProcedureClient::from_options(&options)
        .context("Failed to create the procedure client")?;

    let mut grid = GridController::new(
        options,
        client,
        Arc::new(TerminalInteraction::new(assume_yes)),
        Box::new(surface.clone()),
    )?;
    grid.initialize()
        .await
        .context("Failed to load the grid")?;

    let mut page = 1;
    match command {
        Command::Show { page: requested } => page = requested,
        Command::Add { assignments } => {
            grid.begin_add()?;
            apply(&mut grid, &assignments)?;
            grid.save().await.context("Record was not added")?;
        }
        Command::Edit { id, assignments } => {
            grid.begin_edit(&RecordKey::from(id))?;
            apply(&mut grid, &assignments)?;
            grid.save().await.context("Record was not updated")?;
        }
        Command::Delete { id, .. } => {
            let outcome = grid
                .delete(&RecordKey::from(id))
                .await
                .context("Record was not deleted")?;
            if outcome == DeleteOutcome::Declined {
                println!("Nothing deleted");
                return Ok(());
            }
        }
    }

    match surface.current() {
        Some(frame) => println!("{}", render_table(&frame, page)),
        None => tracing::warn!("Nothing to display"),
    }
    Ok(())
}

fn apply(grid: &mut GridController, assignments: &[(String, String)]) -> Result<()> {
    for (field, value) in assignments {
        grid.set_field(field, value)
            .with_context(|| format!("Cannot set {}", field))?;
    }
    Ok(())
}

fn load_options(path: &Path) -> Result<GridOptions> {
    let options = GridOptions::load(path)
        .with_context(|| format!("Failed to load grid configuration from {}", path.display()))?;
    options.validate()?;
    Ok(options)
}

fn default_config_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|dir| dir.join("spgrid").join("grid.toml"))
        .context("No configuration directory on this platform; pass --config")?;
    if !path.exists() {
        bail!(
            "No grid configuration at {}; pass --config or set SPGRID_CONFIG",
            path.display()
        );
    }
    Ok(path)
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{}`", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{}`", raw));
    }
    Ok((field.to_string(), value.to_string()))
}
