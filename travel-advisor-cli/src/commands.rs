//! Subcommand implementations.

use crate::cli::{Cli, Commands, RemoteCommand, RemoteTarget};
use crate::console::run_console;
use adk_core::Agent;
use adk_session::SessionService;
use anyhow::{Context, Result, bail};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use travel_advisor::eval::{default_cases_path, default_criteria, run_evaluation};
use travel_advisor::{
    Advisor, AdvisorConfig, ApiClient, ServerOptions, SessionKey, build_agent, build_model,
    build_router, open_session_store, serve,
};
use travel_advisor_deploy::{
    AgentEngineClient, DeployManifest, DeployPlan, Deployer, StagingClient, token_source_from_env,
};

pub async fn run(cli: Cli) -> Result<()> {
    let user_id = cli.user_id;
    let session_id = cli.session_id;

    match cli.command {
        Commands::Chat => {
            let (config, advisor) = local_advisor().await?;
            let key = session_key(&config.app_name, &user_id, session_id.as_deref())?;
            run_console(&advisor, &key).await
        }
        Commands::Ask { message } => {
            let (config, advisor) = local_advisor().await?;
            let key = session_key(&config.app_name, &user_id, session_id.as_deref())?;
            let reply = advisor.ask(&key, &message).await?;
            for call in &reply.tool_calls {
                eprintln!("[{} {}]", call.name, call.args);
            }
            println!("{}", reply.text);
            eprintln!("(session {})", key.session_id());
            Ok(())
        }
        Commands::Serve { port } => {
            let config = AdvisorConfig::from_env()?;
            let (agent, sessions) = agent_and_sessions(&config).await?;
            tracing::info!(model = %config.model, app_name = %config.app_name, "starting server");
            let router = build_router(agent, sessions, ServerOptions::default());
            serve(router, port.unwrap_or(config.port)).await?;
            Ok(())
        }
        Commands::Client { base_url, message } => {
            client_query(&base_url, &user_id, session_id.as_deref(), &message).await
        }
        Commands::Eval { file } => {
            let config = AdvisorConfig::from_env()?;
            let agent = agent_from_config(&config)?;
            let path = file.unwrap_or_else(default_cases_path);
            let report = run_evaluation(agent, &path, default_criteria())
                .await
                .with_context(|| format!("evaluating {}", path.display()))?;
            println!("{}", report.format_summary());
            if !report.all_passed() {
                bail!("evaluation failed");
            }
            Ok(())
        }
        Commands::Deploy { manifest, dry_run } => deploy(&manifest, dry_run).await,
        Commands::Remote { engine, target, action } => {
            remote(&engine, &target, action, &user_id, session_id.as_deref()).await
        }
        Commands::RemoteList { target } => {
            let client = engine_client(&target)?;
            for engine in client.list().await? {
                println!("{}\t{}", engine.name, engine.display_name);
            }
            Ok(())
        }
    }
}

fn session_key(app_name: &str, user_id: &str, session_id: Option<&str>) -> Result<SessionKey> {
    Ok(match session_id {
        Some(id) => SessionKey::new(app_name, user_id, id)?,
        None => SessionKey::generate(app_name, user_id)?,
    })
}

fn agent_from_config(config: &AdvisorConfig) -> Result<Arc<dyn Agent>> {
    let model = build_model(&config.model, config.api_key()?)?;
    Ok(Arc::new(build_agent(model)?))
}

async fn agent_and_sessions(
    config: &AdvisorConfig,
) -> Result<(Arc<dyn Agent>, Arc<dyn SessionService>)> {
    let agent = agent_from_config(config)?;
    let sessions = open_session_store(&config.database_url)
        .await
        .with_context(|| format!("opening session store {}", config.database_url))?;
    Ok((agent, Arc::new(sessions)))
}

async fn local_advisor() -> Result<(AdvisorConfig, Advisor)> {
    let config = AdvisorConfig::from_env()?;
    let (agent, sessions) = agent_and_sessions(&config).await?;
    let advisor = Advisor::new(agent, sessions, &config.app_name)?;
    Ok((config, advisor))
}

async fn client_query(
    base_url: &str,
    user_id: &str,
    session_id: Option<&str>,
    message: &str,
) -> Result<()> {
    let client = ApiClient::new(base_url);
    let app_name = AdvisorConfig::from_env()?.app_name;
    let key = session_key(&app_name, user_id, session_id)?;
    if session_id.is_none() {
        client.create_session(&key).await.context("creating session")?;
    }

    let mut events = client.run_sse(&key, message).await?;
    while let Some(event) = events.next().await {
        println!("{}", event?);
    }
    Ok(())
}

fn manifest_dir(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn deploy(manifest_path: &Path, dry_run: bool) -> Result<()> {
    dotenvy::dotenv().ok();
    let manifest = DeployManifest::load(manifest_path)?;
    let plan = DeployPlan::prepare(manifest, &manifest_dir(manifest_path), |name| {
        std::env::var(name).ok()
    })?;
    println!(
        "Bundle: {} files, {} bytes, sha256 {}",
        plan.bundle.entries.len(),
        plan.bundle.bytes.len(),
        plan.bundle.digest
    );

    if dry_run {
        tracing::info!("dry run, nothing uploaded");
        println!("{}", serde_json::to_string_pretty(&plan.preview())?);
        return Ok(());
    }

    let tokens = token_source_from_env()?;
    let project = &plan.manifest.project;
    let deployer = Deployer::new(
        AgentEngineClient::new(&project.project_id, &project.location, tokens.clone()),
        StagingClient::new(tokens),
    );
    let deployed = deployer.deploy(&plan).await?;
    if deployed.serving {
        println!("Deployed: {}", deployed.resource_name);
    } else {
        println!("Created engine without a serving app: {}", deployed.resource_name);
        eprintln!("Set agent.pickle_object in the manifest; remote queries fail until then.");
    }
    Ok(())
}

fn engine_client(target: &RemoteTarget) -> Result<AgentEngineClient> {
    let (project, location) = match (&target.project, &target.location) {
        (Some(project), Some(location)) => (project.clone(), location.clone()),
        (project, location) => {
            let manifest = DeployManifest::load(&target.manifest).with_context(|| {
                "pass --project and --location, or provide a deploy manifest".to_string()
            })?;
            (
                project.clone().unwrap_or(manifest.project.project_id),
                location.clone().unwrap_or(manifest.project.location),
            )
        }
    };
    Ok(AgentEngineClient::new(project, location, token_source_from_env()?))
}

async fn remote(
    engine: &str,
    target: &RemoteTarget,
    action: RemoteCommand,
    user_id: &str,
    session_id: Option<&str>,
) -> Result<()> {
    let client = engine_client(target)?;
    tracing::debug!(%engine, ?action, "remote command");

    match action {
        RemoteCommand::CreateSession => {
            println!("{}", client.create_session(engine, user_id).await?);
        }
        RemoteCommand::ListSessions => {
            for session in client.list_sessions(engine, user_id).await? {
                println!("{session}");
            }
        }
        RemoteCommand::Query { message } => {
            let session_id = match session_id {
                Some(id) => id.to_string(),
                None => {
                    let id = client.create_session(engine, user_id).await?;
                    eprintln!("(created session {id})");
                    id
                }
            };
            let mut events = client.stream_query(engine, user_id, &session_id, &message).await?;
            while let Some(event) = events.next().await {
                println!("{}\n{}", event?, "=".repeat(50));
            }
        }
        RemoteCommand::Get => {
            let engine = client.get(engine).await?;
            println!("{}", serde_json::to_string_pretty(&engine)?);
        }
        RemoteCommand::Delete { force } => {
            let operation = client.delete(engine, force).await?;
            println!("Delete requested: {}", operation.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_dir() {
        assert_eq!(manifest_dir(Path::new("deploy.toml")), PathBuf::from("."));
        assert_eq!(manifest_dir(Path::new("conf/deploy.toml")), PathBuf::from("conf"));
    }

    #[test]
    fn test_session_key_reuses_given_id() {
        let key = session_key("app", "u_123", Some("s1")).unwrap();
        assert_eq!(key.session_id(), "s1");
        assert!(session_key("app", "", None).is_err());
    }
}
