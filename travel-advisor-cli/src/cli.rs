use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "travel-advisor")]
#[command(about = "Travel advisor agent: chat, serve, evaluate and deploy", long_about = None)]
pub struct Cli {
    /// User ID for the conversation
    #[arg(long, global = true, default_value = "u_123")]
    pub user_id: String,

    /// Resume this session instead of starting a new one
    #[arg(long, global = true)]
    pub session_id: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive console over the in-process runner
    Chat,

    /// Ask a single question and print the answer
    Ask {
        message: String,
    },

    /// Start the SSE API server
    Serve {
        /// Server port (defaults to TRAVEL_ADVISOR_PORT, PORT, then 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Query a running API server over SSE
    Client {
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,

        message: String,
    },

    /// Run the evaluation cases
    Eval {
        /// Case file (defaults to the bundled travel_advisor.test.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Deploy to Vertex AI Agent Engine
    Deploy {
        #[arg(short, long, default_value = "deploy.toml")]
        manifest: PathBuf,

        /// Build the bundle and print the create request without uploading
        #[arg(long)]
        dry_run: bool,
    },

    /// Interact with a deployed agent
    Remote {
        /// Reasoning engine id or full resource name
        engine: String,

        #[command(flatten)]
        target: RemoteTarget,

        #[command(subcommand)]
        action: RemoteCommand,
    },

    /// List deployed agents
    RemoteList {
        #[command(flatten)]
        target: RemoteTarget,
    },
}

#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// Create a session for --user-id
    CreateSession,
    /// List sessions of --user-id
    ListSessions,
    /// Send a message and stream the events
    Query { message: String },
    /// Show the deployment
    Get,
    /// Delete the deployment
    Delete {
        /// Also delete its sessions
        #[arg(long)]
        force: bool,
    },
}

/// Where the deployed agent lives. Missing values come from the manifest.
#[derive(Debug, Clone, Args)]
pub struct RemoteTarget {
    #[arg(long, default_value = "deploy.toml")]
    pub manifest: PathBuf,

    #[arg(long)]
    pub project: Option<String>,

    #[arg(long)]
    pub location: Option<String>,
}
