//! The `deploy.toml` deployment manifest.
//!
//! ```toml
//! [project]
//! project_id = "my-project"
//! location = "asia-northeast1"
//! staging_bucket = "gs://my-staging-bucket"
//!
//! [agent]
//! display_name = "Travel Advisor Agent"
//! extra_packages = ["travel-advisor"]
//! forward_env = ["OPENAI_API_KEY"]
//! ```

use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "deploy.toml";
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployManifest {
    pub project: ProjectConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_id: String,
    pub location: String,
    /// `gs://bucket` or `gs://bucket/prefix`.
    pub staging_bucket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub display_name: String,
    pub description: String,
    pub app_name: String,
    pub enable_tracing: bool,
    pub requirements: Vec<String>,
    /// Paths, relative to the manifest, bundled into the deployment.
    pub extra_packages: Vec<String>,
    /// Environment variables copied from the deploying shell into the runtime.
    pub forward_env: Vec<String>,
    pub python_version: String,
    /// `gs://` URI of a serialized Python app serving the ADK class methods.
    /// The Rust bundle alone gives the runtime nothing to execute.
    pub pickle_object: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            display_name: "Travel Advisor Agent".to_string(),
            description: travel_advisor::prompt::DESCRIPTION.to_string(),
            app_name: travel_advisor::AGENT_NAME.to_string(),
            enable_tracing: true,
            requirements: Vec::new(),
            extra_packages: Vec::new(),
            forward_env: Vec::new(),
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
            pickle_object: None,
        }
    }
}

/// A `name=value` pair set in the deployed runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Splits `gs://bucket/prefix` into `("bucket", "prefix")`.
pub fn parse_gcs_uri(uri: &str) -> Result<(String, String)> {
    let rest = uri
        .strip_prefix("gs://")
        .ok_or_else(|| DeployError::Manifest(format!("'{uri}' is not a gs:// URI")))?;
    let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return Err(DeployError::Manifest(format!("'{uri}' has no bucket name")));
    }
    Ok((bucket.to_string(), prefix.trim_matches('/').to_string()))
}

impl DeployManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Manifest(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Checks required fields and that every extra package exists under `base_dir`.
    pub fn validate(&self, base_dir: &Path) -> Result<()> {
        let required = [
            ("project.project_id", &self.project.project_id),
            ("project.location", &self.project.location),
            ("agent.display_name", &self.agent.display_name),
            ("agent.app_name", &self.agent.app_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DeployError::Manifest(format!("{field} must not be empty")));
            }
        }

        parse_gcs_uri(&self.project.staging_bucket)?;
        if let Some(object) = &self.agent.pickle_object {
            parse_gcs_uri(object)?;
        }

        for package in &self.agent.extra_packages {
            let path = base_dir.join(package);
            if !path.exists() {
                return Err(DeployError::Manifest(format!(
                    "extra package '{package}' not found at {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn package_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.agent.extra_packages.iter().map(|package| base_dir.join(package)).collect()
    }

    /// Lowercase, dash-separated form of the display name.
    pub fn slug(&self) -> String {
        let slug: String = self
            .agent
            .display_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        slug.split('-').filter(|part| !part.is_empty()).collect::<Vec<_>>().join("-")
    }

    /// One requirement per line.
    pub fn requirements_txt(&self) -> String {
        self.agent.requirements.iter().map(|req| format!("{}\n", req.trim())).collect()
    }

    /// Resolves `forward_env` against `lookup`. Unset variables are skipped
    /// with a warning.
    pub fn env_vars(&self, lookup: impl Fn(&str) -> Option<String>) -> Vec<EnvVar> {
        let mut vars: Vec<EnvVar> = self
            .agent
            .forward_env
            .iter()
            .filter_map(|name| match lookup(name) {
                Some(value) => Some(EnvVar { name: name.clone(), value }),
                None => {
                    tracing::warn!(variable = %name, "forwarded variable is not set, skipping");
                    None
                }
            })
            .collect();
        if self.agent.enable_tracing {
            vars.push(EnvVar {
                name: "GOOGLE_CLOUD_AGENT_ENGINE_ENABLE_TELEMETRY".to_string(),
                value: "true".to_string(),
            });
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[project]
project_id = "travel-demo"
location = "asia-northeast1"
staging_bucket = "gs://travel-staging/builds"

[agent]
display_name = "Travel Advisor Agent"
requirements = ["google-cloud-aiplatform[adk,agent_engines]", "litellm"]
extra_packages = ["."]
forward_env = ["OPENAI_API_KEY", "MISSING_VAR"]
"#;

    #[test]
    fn test_parse_applies_defaults() {
        let manifest = DeployManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.project.location, "asia-northeast1");
        assert_eq!(manifest.agent.app_name, travel_advisor::AGENT_NAME);
        assert!(manifest.agent.enable_tracing);
        assert_eq!(manifest.agent.python_version, DEFAULT_PYTHON_VERSION);
        assert!(manifest.agent.pickle_object.is_none());
    }

    #[test]
    fn test_validate_pickle_object_uri() {
        let mut manifest = DeployManifest::parse(SAMPLE).unwrap();
        manifest.agent.pickle_object = Some("gs://travel-staging/app/agent_engine.pkl".to_string());
        manifest.validate(Path::new(".")).unwrap();

        manifest.agent.pickle_object = Some("/tmp/agent_engine.pkl".to_string());
        assert!(manifest.validate(Path::new(".")).is_err());
    }

    #[test]
    fn test_validate() {
        let manifest = DeployManifest::parse(SAMPLE).unwrap();
        manifest.validate(Path::new(".")).unwrap();

        let mut bad = manifest.clone();
        bad.project.staging_bucket = "s3://nope".to_string();
        assert!(bad.validate(Path::new(".")).is_err());

        let mut bad = manifest.clone();
        bad.agent.extra_packages = vec!["does-not-exist".to_string()];
        assert!(bad.validate(Path::new(".")).is_err());

        let mut bad = manifest;
        bad.project.project_id = " ".to_string();
        let err = bad.validate(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("project.project_id"));
    }

    #[test]
    fn test_env_vars_skip_unset() {
        let manifest = DeployManifest::parse(SAMPLE).unwrap();
        let vars = manifest.env_vars(|name| (name == "OPENAI_API_KEY").then(|| "sk-test".into()));
        assert_eq!(vars[0], EnvVar { name: "OPENAI_API_KEY".into(), value: "sk-test".into() });
        assert!(vars.iter().all(|var| var.name != "MISSING_VAR"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_slug_and_requirements() {
        let manifest = DeployManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.slug(), "travel-advisor-agent");
        assert_eq!(
            manifest.requirements_txt(),
            "google-cloud-aiplatform[adk,agent_engines]\nlitellm\n"
        );
    }

    #[test]
    fn test_parse_gcs_uri() {
        assert_eq!(parse_gcs_uri("gs://b").unwrap(), ("b".to_string(), String::new()));
        assert_eq!(parse_gcs_uri("gs://b/p/q/").unwrap(), ("b".to_string(), "p/q".to_string()));
        assert!(parse_gcs_uri("gs://").is_err());
        assert!(parse_gcs_uri("b/p").is_err());
    }
}
