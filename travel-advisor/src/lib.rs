//! # travel-advisor
//!
//! A conversational travel advisor built on ADK-Rust. The agent answers
//! questions about weather, currency exchange and local attractions using
//! three deterministic tools, keeps conversations in a SQLite session store
//! and can be run in-process ([`Advisor`]) or behind the SSE API
//! ([`server::build_router`], [`ApiClient`]).
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travel_advisor::{Advisor, AdvisorConfig, SessionKey, build_agent, build_model, open_session_store};
//!
//! # async fn run() -> travel_advisor::Result<()> {
//! let config = AdvisorConfig::from_env()?;
//! let model = build_model(&config.model, config.api_key()?)?;
//! let agent = Arc::new(build_agent(model)?);
//! let sessions = Arc::new(open_session_store(&config.database_url).await?);
//!
//! let advisor = Advisor::new(agent, sessions, &config.app_name)?;
//! let key = SessionKey::generate(&config.app_name, "u_123")?;
//! let reply = advisor.ask(&key, "What's the weather in Seoul?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod advisor;
pub mod agent;
pub mod client;
pub mod config;
pub mod error;
pub mod eval;
pub mod event;
pub mod prompt;
pub mod server;
pub mod session;
pub mod tools;

pub use advisor::{Advisor, Reply, ToolCall};
pub use agent::{AGENT_NAME, ModelRef, Provider, build_agent, build_model};
pub use client::{ApiClient, SseDecoder, SseMessage, StreamEventStream};
pub use config::AdvisorConfig;
pub use error::{Result, TravelError};
pub use event::{EventPart, StreamEvent};
pub use server::{ServerOptions, build_router, serve};
pub use session::{SessionKey, ensure_session, new_session, open_session_store};
pub use tools::{ToolOutcome, ToolStatus, travel_tools};
