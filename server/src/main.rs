mod config;
mod directory;
mod graphql;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use platform_authz::{AccessEvaluator, Principal};
use platform_obs::{ObsConfig, init_tracing};
use serde::Serialize;
use tracing::info;

use crate::{
    config::AppConfig,
    directory::PrincipalDirectory,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "suite-access", version, about = "Role and permission checks for the SME suite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server.
    Serve(ServeCommand),
    /// Evaluate permissions for a principal stored as JSON.
    Check(CheckCommand),
    /// Print the compiled-in role table.
    Roles,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Args, Debug)]
struct CheckCommand {
    #[arg(long, value_name = "FILE", help = "Principal JSON file")]
    principal: PathBuf,
    #[arg(long, help = "Require every permission instead of any one")]
    all: bool,
    #[arg(required = true, value_name = "PERMISSION")]
    permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    principal: Option<String>,
    permissions: &'a [String],
    mode: &'static str,
    allowed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::Check(cmd) => run_check(cmd),
        Command::Roles => print_roles(),
    }
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let directory = Arc::new(PrincipalDirectory::load(&config.principals_path)?);
    if directory.is_empty() {
        info!("principal directory is empty; every request will be anonymous");
    }
    let state = AppState {
        schema: graphql::build_schema(),
        config,
        directory,
    };
    http::serve(cmd.into(), state).await
}

fn run_check(cmd: CheckCommand) -> Result<()> {
    let payload = std::fs::read_to_string(&cmd.principal)
        .with_context(|| format!("failed to read {}", cmd.principal.display()))?;
    let report = check_principal(&payload, &cmd.permissions, cmd.all)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.allowed {
        bail!("access denied");
    }
    Ok(())
}

fn check_principal<'a>(payload: &str, permissions: &'a [String], all: bool) -> Result<CheckReport<'a>> {
    let principal = Principal::from_json(payload)?;
    let evaluator = AccessEvaluator;
    let allowed = if all {
        evaluator.has_all_permissions(permissions, Some(&principal))
    } else {
        evaluator.has_permission(permissions, Some(&principal))
    };
    Ok(CheckReport {
        principal: principal.id.as_ref().map(ToString::to_string),
        permissions,
        mode: if all { "all" } else { "any" },
        allowed,
    })
}

fn print_roles() -> Result<()> {
    println!("{}", roles_json()?);
    Ok(())
}

fn roles_json() -> Result<String> {
    Ok(serde_json::to_string_pretty(&graphql::role_table())?)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn check_defaults_to_any_of() {
        let permissions = names(&["employees.manage", "hr.self_service.view"]);
        let report = check_principal(r#"{"id": 3, "role": "employee"}"#, &permissions, false).unwrap();
        assert!(report.allowed);
        assert_eq!(report.mode, "any");
        assert_eq!(report.principal.as_deref(), Some("3"));
    }

    #[test]
    fn check_all_requires_every_permission() {
        let permissions = names(&["employees.manage", "hr.self_service.view"]);
        let payload = r#"{"id": 3, "role": "employee"}"#;
        let report = check_principal(payload, &permissions, true).unwrap();
        assert!(!report.allowed);
        assert_eq!(report.mode, "all");

        let permissions = names(&["hr.leaves.request", "hr.self_service.view"]);
        assert!(check_principal(payload, &permissions, true).unwrap().allowed);
    }

    #[test]
    fn check_rejects_malformed_principal() {
        let permissions = names(&["dashboard.view"]);
        assert!(check_principal("[", &permissions, false).is_err());
    }

    #[test]
    fn roles_json_lists_every_legacy_role() {
        let table: Value = serde_json::from_str(&roles_json().unwrap()).unwrap();
        let rows = table.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], json!({"name": "super_admin", "permissions": ["*"]}));
        assert_eq!(rows[5], json!({"name": "user", "permissions": ["dashboard.view", "hr.profile.view"]}));
    }

    #[test]
    fn check_command_parses_all_flag() {
        let cli = Cli::try_parse_from([
            "suite-access",
            "check",
            "--principal",
            "p.json",
            "--all",
            "hr.view",
            "hr.edit",
        ])
        .unwrap();
        let Command::Check(cmd) = cli.command else {
            panic!("expected check command");
        };
        assert!(cmd.all);
        assert_eq!(cmd.permissions, names(&["hr.view", "hr.edit"]));
    }
}
