//! Cluster-facing commands

use crate::controller::{self, managed_cluster, registrar, Context};
use crate::domain::config::{apply_overrides, parse_dynamic_configs, OperatorConfig};
use crate::domain::registrar::{install_artifacts, install_plan, teardown_plan, ClusterRegistrar};
use crate::infrastructure::constants::ENV_CONF_FILE;
use crate::infrastructure::kubernetes::{ClusterStore, KubeClusterStore};
use crate::shared::error::Result;
use crate::cli::display::{ArtifactState, ArtifactStatus, TableRenderer};
use clap::Parser;
use kube::CustomResourceExt;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Path to the operator configuration file (TOML)
    /// Falls back to CLUSTER_REGISTRAR_CONF_FILE, then to built-in defaults
    #[arg(long = "config", value_name = "PATH")]
    pub config_file: Option<String>,

    /// Path to kubeconfig file
    /// If not specified, uses in-cluster config or default kubeconfig resolution
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// Controller: controller.error-requeue-secs, controller.reconcile-timeout-secs, controller.field-manager
    /// Assets: assets.dir
    /// CRDs: crds.wait-attempts, crds.wait-min-delay-ms, crds.wait-max-delay-ms
    /// Watchers: managed-cluster.enabled
    ///
    /// Example: -Dcontroller.reconcile-timeout-secs=60 -Dassets.dir=/etc/registrar/manifests
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    /// Namespace the namespaced artifacts would be installed into
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,
}

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    /// Namespace the controller runs in
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    #[arg(long)]
    pub kubeconfig: Option<String>,

    #[arg(long)]
    pub context: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CrdCommand {}

impl RunCommand {
    pub fn load_config(&self) -> anyhow::Result<OperatorConfig> {
        let path = self
            .config_file
            .clone()
            .or_else(|| std::env::var(ENV_CONF_FILE).ok());

        let mut config = match path {
            Some(path) => OperatorConfig::from_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e))?,
            None => OperatorConfig::default(),
        };

        if !self.properties.is_empty() {
            let overrides = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_overrides(&overrides, &mut config)?;
        }

        Ok(config)
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        let store = KubeClusterStore::new_with_config(self.kubeconfig.clone(), self.context.clone())
            .await?
            .with_field_manager(config.controller.field_manager.clone());
        let client = store.get_client();
        let store: Arc<dyn ClusterStore> = Arc::new(store);

        let reconciler = controller::bootstrap(store, &config)
            .await
            .map_err(|e| anyhow::anyhow!("Setup failed: {}", e))?;
        let ctx = Context::new(reconciler, &config);

        if config.managed_cluster.enabled {
            tokio::join!(
                registrar::run(client.clone(), ctx),
                managed_cluster::run(client, config.error_requeue()),
            );
        } else {
            registrar::run(client, ctx).await;
        }

        info!("controllers stopped");
        Ok(())
    }
}

impl PlanCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let renderer = TableRenderer::new();
        println!(
            "{}",
            renderer.render_install_plan(&self.namespace, &install_plan(&self.namespace))
        );
        println!("{}", renderer.render_teardown_plan(&teardown_plan(&self.namespace)));
        Ok(())
    }
}

impl StatusCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let store = KubeClusterStore::new_with_config(self.kubeconfig.clone(), self.context.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

        let statuses = collect_artifact_statuses(&store, &self.namespace)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get install status: {}", e))?;

        let renderer = TableRenderer::new();
        println!("{}", renderer.render_artifact_status(&self.namespace, &statuses));
        Ok(())
    }
}

impl CrdCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        print!("{}", serde_yaml::to_string(&ClusterRegistrar::crd())?);
        Ok(())
    }
}

/// Looks up every artifact the install plan manages.
pub async fn collect_artifact_statuses(
    store: &dyn ClusterStore,
    namespace: &str,
) -> Result<Vec<ArtifactStatus>> {
    let mut statuses = Vec::new();
    for artifact in install_artifacts(namespace) {
        let state = match store
            .get(artifact.kind, &artifact.name, artifact.namespace())
            .await
        {
            Ok(obj) if obj.metadata.deletion_timestamp.is_some() => ArtifactState::Terminating,
            Ok(_) => ArtifactState::Present,
            Err(e) if e.is_not_found() => ArtifactState::Absent,
            Err(e) => return Err(e),
        };
        statuses.push(ArtifactStatus { artifact, state });
    }
    Ok(statuses)
}
