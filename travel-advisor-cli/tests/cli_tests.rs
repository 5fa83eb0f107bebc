use clap::Parser;
use std::path::PathBuf;
use travel_advisor_cli::{Cli, Commands, RemoteCommand};

#[test]
fn test_ask_with_global_flags() {
    let cli = Cli::try_parse_from([
        "travel-advisor",
        "--user-id",
        "traveler",
        "ask",
        "What's the weather in Tokyo?",
    ])
    .unwrap();
    assert_eq!(cli.user_id, "traveler");
    assert!(cli.session_id.is_none());
    assert!(matches!(cli.command, Commands::Ask { ref message } if message == "What's the weather in Tokyo?"));
}

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["travel-advisor", "chat"]).unwrap();
    assert_eq!(cli.user_id, "u_123");

    let cli = Cli::try_parse_from(["travel-advisor", "serve"]).unwrap();
    assert!(matches!(cli.command, Commands::Serve { port: None }));

    let cli = Cli::try_parse_from(["travel-advisor", "deploy", "--dry-run"]).unwrap();
    match cli.command {
        Commands::Deploy { manifest, dry_run } => {
            assert_eq!(manifest, PathBuf::from("deploy.toml"));
            assert!(dry_run);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_client_base_url() {
    let cli = Cli::try_parse_from([
        "travel-advisor",
        "client",
        "--base-url",
        "http://127.0.0.1:9000",
        "Tips for Laos?",
    ])
    .unwrap();
    match cli.command {
        Commands::Client { base_url, message } => {
            assert_eq!(base_url, "http://127.0.0.1:9000");
            assert_eq!(message, "Tips for Laos?");
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_remote_subcommands() {
    let cli = Cli::try_parse_from([
        "travel-advisor",
        "--session-id",
        "1595202805658812416",
        "remote",
        "6508739400526987264",
        "--location",
        "asia-northeast1",
        "query",
        "I'm going to Laos, any tips?",
    ])
    .unwrap();
    assert_eq!(cli.session_id.as_deref(), Some("1595202805658812416"));
    match cli.command {
        Commands::Remote { engine, target, action } => {
            assert_eq!(engine, "6508739400526987264");
            assert_eq!(target.location.as_deref(), Some("asia-northeast1"));
            assert!(target.project.is_none());
            assert!(matches!(action, RemoteCommand::Query { .. }));
        }
        other => panic!("unexpected command {other:?}"),
    }

    let cli = Cli::try_parse_from(["travel-advisor", "remote", "42", "delete", "--force"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Remote { action: RemoteCommand::Delete { force: true }, .. }
    ));

    let cli = Cli::try_parse_from(["travel-advisor", "remote-list"]).unwrap();
    assert!(matches!(cli.command, Commands::RemoteList { .. }));
}

#[test]
fn test_missing_message_is_an_error() {
    assert!(Cli::try_parse_from(["travel-advisor", "ask"]).is_err());
    assert!(Cli::try_parse_from(["travel-advisor", "remote", "42"]).is_err());
}
