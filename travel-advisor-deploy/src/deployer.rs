//! End-to-end deployment: bundle, stage, create, wait.

use crate::bundle::{Bundle, build_bundle};
use crate::engine::{
    AgentEngineClient, CreateEngineRequest, DeploymentSpec, EngineSpec, PackageSpec,
    adk_class_methods,
};
use crate::error::Result;
use crate::manifest::{DeployManifest, EnvVar};
use crate::staging::StagingClient;
use std::path::Path;
use std::time::Duration;

pub const AGENT_FRAMEWORK: &str = "google-adk";

/// Everything needed to deploy, computed without touching the network.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub manifest: DeployManifest,
    pub bundle: Bundle,
    pub requirements: String,
    pub env: Vec<EnvVar>,
}

impl DeployPlan {
    /// Validates the manifest, resolves forwarded variables and builds the bundle.
    pub fn prepare(
        manifest: DeployManifest,
        base_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        manifest.validate(base_dir)?;
        let bundle = build_bundle(&manifest.package_paths(base_dir))?;
        let requirements = manifest.requirements_txt();
        let env = manifest.env_vars(lookup);
        let plan = Self { manifest, bundle, requirements, env };
        if !plan.is_served() {
            tracing::warn!(
                "no agent.pickle_object set: the engine will be created without a serving app \
                 and remote queries will fail"
            );
        }
        Ok(plan)
    }

    /// Whether the engine gets an object that can answer its class methods.
    pub fn is_served(&self) -> bool {
        self.manifest.agent.pickle_object.is_some()
    }

    pub fn bundle_object(&self) -> String {
        self.bundle.object_name(&self.manifest.slug())
    }

    pub fn requirements_object(&self) -> String {
        format!("{}/requirements.txt", self.bundle.object_prefix(&self.manifest.slug()))
    }

    /// The create request for the given staged artifact URIs.
    pub fn request(&self, bundle_uri: &str, requirements_uri: &str) -> CreateEngineRequest {
        CreateEngineRequest {
            display_name: self.manifest.agent.display_name.clone(),
            description: self.manifest.agent.description.clone(),
            spec: EngineSpec {
                package_spec: PackageSpec {
                    pickle_object_gcs_uri: self.manifest.agent.pickle_object.clone(),
                    dependency_files_gcs_uri: bundle_uri.to_string(),
                    requirements_gcs_uri: requirements_uri.to_string(),
                    python_version: self.manifest.agent.python_version.clone(),
                },
                deployment_spec: DeploymentSpec { env: self.env.clone() },
                agent_framework: AGENT_FRAMEWORK.to_string(),
                class_methods: adk_class_methods(),
            },
        }
    }

    /// The request the deployment would send, with the URIs it would upload to.
    /// Forwarded values are masked.
    pub fn preview(&self) -> CreateEngineRequest {
        let staging = self.manifest.project.staging_bucket.trim_end_matches('/');
        let mut request = self.request(
            &format!("{staging}/{}", self.bundle_object()),
            &format!("{staging}/{}", self.requirements_object()),
        );
        for var in &mut request.spec.deployment_spec.env {
            if self.manifest.agent.forward_env.contains(&var.name) {
                var.value = "***".to_string();
            }
        }
        request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedAgent {
    pub resource_name: String,
    /// False when the engine was created without a serving app.
    pub serving: bool,
}

pub struct Deployer {
    engine: AgentEngineClient,
    staging: StagingClient,
    poll_interval: Duration,
    max_wait: Duration,
}

impl Deployer {
    pub fn new(engine: AgentEngineClient, staging: StagingClient) -> Self {
        Self {
            engine,
            staging,
            poll_interval: Duration::from_secs(10),
            max_wait: Duration::from_secs(30 * 60),
        }
    }

    pub fn with_polling(mut self, poll_interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.max_wait = max_wait;
        self
    }

    #[tracing::instrument(skip_all, fields(display_name = %plan.manifest.agent.display_name))]
    pub async fn deploy(&self, plan: &DeployPlan) -> Result<DeployedAgent> {
        let bucket = &plan.manifest.project.staging_bucket;

        let bundle_uri = self
            .staging
            .upload(bucket, &plan.bundle_object(), plan.bundle.bytes.clone(), "application/gzip")
            .await?;
        let requirements_uri = self
            .staging
            .upload(
                bucket,
                &plan.requirements_object(),
                plan.requirements.clone().into_bytes(),
                "text/plain",
            )
            .await?;

        let operation = self.engine.create(&plan.request(&bundle_uri, &requirements_uri)).await?;
        let resource_name = self.engine.wait(operation, self.poll_interval, self.max_wait).await?;

        let serving = plan.is_served();
        if serving {
            tracing::info!(%resource_name, "agent deployed");
        } else {
            tracing::warn!(%resource_name, "engine created without a serving app");
        }
        Ok(DeployedAgent { resource_name, serving })
    }
}
