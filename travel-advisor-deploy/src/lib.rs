//! # travel-advisor-deploy
//!
//! Deploys the travel advisor to Vertex AI Agent Engine and talks to the
//! deployed app.
//!
//! A deployment reads a [`DeployManifest`], bundles the agent's packages into a
//! reproducible tarball, stages it in Cloud Storage and creates a reasoning
//! engine from it. [`AgentEngineClient`] also drives remote sessions and
//! streaming queries against an existing engine.

pub mod auth;
pub mod bundle;
pub mod deployer;
pub mod engine;
pub mod error;
mod http;
pub mod manifest;
pub mod staging;

pub use auth::{AdcTokenSource, StaticToken, TokenSource, token_source_from_env};
pub use bundle::{Bundle, build_bundle};
pub use deployer::{DeployPlan, DeployedAgent, Deployer};
pub use engine::{
    AgentEngineClient, ClassMethod, CreateEngineRequest, Operation, ReasoningEngine,
    RemoteEventStream, adk_class_methods,
};
pub use error::{DeployError, Result};
pub use manifest::{DEFAULT_MANIFEST, DeployManifest, EnvVar};
pub use staging::StagingClient;
