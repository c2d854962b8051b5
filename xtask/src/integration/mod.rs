//! Integration test infrastructure.
//!
//! Runs the `itemsink` integration suite against DynamoDB Local.
//!
//! # Usage
//!
//! ```bash
//! # Start DynamoDB Local, create the table, run the tests, stop the container
//! cargo xtask integration
//!
//! # Reuse an emulator that is already running
//! cargo xtask integration --no-docker --endpoint-url http://localhost:4566
//! ```

mod containers;
pub mod error;
mod table;

pub use error::{IntegrationError, Result};

use std::time::Duration;

use itemsink::client::create_client;
use itemsink::config::Config;

use self::containers::{
    detect_runtime, environment_variables, is_running, start_container, stop_container,
    wait_for_health, ContainerRuntime, DYNAMODB_SPEC,
};
use self::table::{ensure_table, format_plan, TableConfig};
use crate::prelude::*;

/// Integration test command.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Run integration tests against DynamoDB Local.

Starts an in-memory DynamoDB Local container, creates the test table,
runs `cargo test -p itemsink --features integration` with the `local`
profile environment and stops the container afterward.")]
pub struct IntegrationCommand {
    /// Skip container management (assume the emulator is already running).
    #[arg(long)]
    pub no_docker: bool,

    /// Keep the container running after tests complete.
    #[arg(long)]
    pub keep_containers: bool,

    /// Timeout in seconds for the container health check.
    #[arg(long, default_value = "30")]
    pub health_timeout: u64,

    /// Table the tests write to.
    #[arg(long, default_value = "ItemsTest")]
    pub table_name: String,

    /// Emulator endpoint, only honored with --no-docker.
    #[arg(long, requires = "no_docker")]
    pub endpoint_url: Option<String>,
}

/// Main entry point for integration command.
pub async fn run(command: IntegrationCommand, global: crate::Global) -> Result<()> {
    let endpoint = command
        .endpoint_url
        .clone()
        .unwrap_or_else(|| DYNAMODB_SPEC.endpoint());

    if !global.is_silent() {
        aprintln!("{}", p_b("Integration Tests"));
        aprintln!();
        aprintln!(
            "{} {} (table: {})",
            p_b("Target:"),
            endpoint,
            p_y(&command.table_name)
        );
        aprintln!();
    }

    let mut started: Option<ContainerRuntime> = None;
    if !command.no_docker {
        let runtime = detect_runtime().await?;
        if start_dynamodb_container(runtime, command.health_timeout, &global).await? {
            started = Some(runtime);
        }
    } else if !global.is_silent() {
        aprintln!(
            "{} Skipping container management (--no-docker)",
            p_y("⚠️")
        );
    }

    let outcome = setup_and_test(&command.table_name, &endpoint, &global).await;

    match started {
        Some(runtime) if !command.keep_containers => {
            stop_dynamodb_container(runtime, &global).await?;
        }
        Some(_) if !global.is_silent() => {
            aprintln!("{} Container left running (--keep-containers)", p_y("⚠️"));
        }
        _ => {}
    }

    let passed = outcome?;
    for line in summary_lines(passed, global.is_silent()) {
        aprintln!("{}", line);
    }

    if passed {
        Ok(())
    } else {
        Err(IntegrationError::TestFailed(
            "cargo test exited with a failure".to_string(),
        ))
    }
}

/// Closing lines of a run: a blank separator and the verdict. Empty when silent.
fn summary_lines(passed: bool, silent: bool) -> Vec<String> {
    if silent {
        return Vec::new();
    }

    let verdict = if passed {
        format!("{} {}", p_g("✅"), p_g("All integration tests passed!"))
    } else {
        format!("{} {}", p_r("❌"), p_r("Some integration tests failed"))
    };

    vec![String::new(), verdict]
}

/// Creates the test table and runs the suite. Returns whether the tests passed.
async fn setup_and_test(table_name: &str, endpoint: &str, global: &crate::Global) -> Result<bool> {
    if !global.is_silent() {
        aprintln!("{} Setting up test table...", p_b("📦"));
    }

    let client = create_client(&Config::local(table_name, endpoint)).await;
    let plan = ensure_table(&client, &TableConfig::records(table_name)).await?;

    if !global.is_silent() {
        for line in format_plan(&plan) {
            aprintln!("  {}", line);
        }
    }

    run_tests(environment_variables(endpoint, table_name), global).await
}

/// Runs the feature-gated test suite with `env_vars` set.
async fn run_tests(env_vars: Vec<(&'static str, String)>, global: &crate::Global) -> Result<bool> {
    if !global.is_silent() {
        aprintln!(
            "{} Running with features: {}",
            p_b("🔧"),
            p_y("integration")
        );
    }

    let status = tokio::process::Command::new("cargo")
        .args(["test", "-p", "itemsink", "--features", "integration"])
        .envs(env_vars)
        .status()
        .await?;

    Ok(status.success())
}

/// Starts DynamoDB Local. Returns false if it was already running.
async fn start_dynamodb_container(
    runtime: ContainerRuntime,
    timeout_secs: u64,
    global: &crate::Global,
) -> Result<bool> {
    if is_running(runtime, DYNAMODB_SPEC.name).await? {
        if !global.is_silent() {
            aprintln!("{} DynamoDB Local container already running", p_y("⚠️"));
        }
        return Ok(false);
    }

    if !global.is_silent() {
        aprintln!("{} Starting DynamoDB Local container...", p_b("🐳"));
    }

    start_container(runtime, &DYNAMODB_SPEC).await?;

    if !global.is_silent() {
        aprintln!(
            "{} Waiting for container health (max {}s)...",
            p_b("⏳"),
            timeout_secs
        );
    }

    wait_for_health(&DYNAMODB_SPEC, Duration::from_secs(timeout_secs)).await?;

    if !global.is_silent() {
        aprintln!("{} DynamoDB Local is ready", p_g("✅"));
    }

    Ok(true)
}

async fn stop_dynamodb_container(runtime: ContainerRuntime, global: &crate::Global) -> Result<()> {
    if !global.is_silent() {
        aprintln!("{} Stopping DynamoDB Local container...", p_b("🐳"));
    }

    stop_container(runtime, DYNAMODB_SPEC.name).await?;

    if !global.is_silent() {
        aprintln!("{} DynamoDB container stopped", p_g("✅"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines_report_the_verdict() {
        let passed = summary_lines(true, false);
        assert_eq!(passed.len(), 2);
        assert!(passed[0].is_empty());
        assert!(passed[1].contains("All integration tests passed!"));

        let failed = summary_lines(false, false);
        assert!(failed[1].contains("Some integration tests failed"));
    }

    #[test]
    fn test_summary_lines_are_empty_when_silent() {
        assert!(summary_lines(true, true).is_empty());
        assert!(summary_lines(false, true).is_empty());
    }
}
