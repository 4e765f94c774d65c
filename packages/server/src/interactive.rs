//! Interactive mode for the server.
//!
//! Prompts for bind address, port, store path and overlap policy before
//! starting the server. Values from the environment are offered as
//! defaults.

use canvass_map_graph_models::OverlapPolicy;
use dialoguer::{Confirm, Input, Select};

use crate::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Canvass Map Server");
    println!();

    let defaults = ServerConfig::from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let database_path: String = Input::new()
        .with_prompt("Canvass database")
        .default(defaults.database_path.display().to_string())
        .interact_text()
        .unwrap_or_else(|_| defaults.database_path.display().to_string());

    let policies = [OverlapPolicy::AllMatches, OverlapPolicy::FirstMatch];
    let labels = [
        "Count overlapping areas separately (all)",
        "First area wins (first)",
    ];
    let current = policies
        .iter()
        .position(|p| *p == defaults.overlap_policy)
        .unwrap_or(0);
    let overlap_policy = Select::new()
        .with_prompt("Locations inside overlapping areas")
        .items(&labels)
        .default(current)
        .interact()
        .map_or(defaults.overlap_policy, |idx| policies[idx]);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerConfig {
        bind_addr,
        port,
        database_path: database_path.into(),
        overlap_policy,
    })
    .await
}
