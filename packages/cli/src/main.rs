#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the canvass map toolchain.
//!
//! Serves the API, imports canvass snapshots into the `SQLite` store, and
//! prints the areas graph of an assignment. Without a subcommand the user
//! picks a tool interactively.

use std::path::{Path, PathBuf};

use canvass_map_database::db::open_db;
use canvass_map_database::queries::{SqliteStore, import_snapshot, read_snapshot};
use canvass_map_graph::AreaVisitAggregator;
use canvass_map_people::RestPersonDirectory;
use canvass_map_server::{ServerConfig, service};
use canvass_map_server_models::ApiAreasGraph;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};

#[derive(Parser)]
#[command(name = "canvass_map_cli", about = "Canvass map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Import a JSON snapshot of areas, assignments and locations
    Import {
        /// Path to the snapshot file
        file: PathBuf,
    },
    /// Print the areas graph of an assignment as JSON
    Graph {
        /// Organization ID
        #[arg(long)]
        org: i64,
        /// Area assignment ID
        #[arg(long)]
        assignment: String,
    },
}

enum Tool {
    Serve,
    Import,
    Graph,
}

impl Tool {
    const ALL: &[Self] = &[Self::Serve, Self::Import, Self::Graph];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Import => "Import snapshot",
            Self::Graph => "Print areas graph",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive().await;
    };

    match command {
        Commands::Serve => serve(ServerConfig::from_env()).await,
        Commands::Import { file } => import(&file).await,
        Commands::Graph { org, assignment } => graph(org, &assignment).await,
    }
}

async fn interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("Canvass Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Serve => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(canvass_map_server::interactive::run())
            })
            .await??;
        }
        Tool::Import => {
            let file: String = Input::new().with_prompt("Snapshot file").interact_text()?;
            import(Path::new(&file)).await?;
        }
        Tool::Graph => {
            let org: i64 = Input::new().with_prompt("Organization ID").interact_text()?;
            let assignment: String = Input::new()
                .with_prompt("Area assignment ID")
                .interact_text()?;
            graph(org, &assignment).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // The server runs on actix-web's own runtime, so it gets a blocking
    // task instead of nesting inside this tokio runtime.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(canvass_map_server::run_server(config))
    })
    .await??;

    Ok(())
}

async fn import(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();

    log::info!("Reading snapshot from {}", file.display());
    let snapshot = read_snapshot(file)?;

    let db = open_db(&config.database_path).await?;
    let summary = import_snapshot(db.as_ref(), &snapshot).await?;

    println!(
        "Imported {} area(s), {} assignment(s), {} location(s) into {}",
        summary.areas,
        summary.assignments,
        summary.locations,
        config.database_path.display()
    );

    Ok(())
}

async fn graph(org_id: i64, assignment_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env();

    let store = SqliteStore::open(&config.database_path).await?;
    let people = RestPersonDirectory::from_env();
    let aggregator = AreaVisitAggregator::new(config.overlap_policy);

    let graph = service::load_areas_graph(
        &store,
        &people,
        &aggregator,
        org_id,
        assignment_id,
        chrono::Utc::now(),
    )
    .await?;

    log::debug!(
        "Visit range {} to {} over {} card(s)",
        graph.range.start,
        graph.range.end,
        graph.buckets.len()
    );

    let body = ApiAreasGraph {
        data: graph.into_cards(),
    };
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}
