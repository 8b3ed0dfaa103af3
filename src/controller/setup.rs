// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::config::{ControllerIdentity, CrdConf, OperatorConfig};
use crate::domain::reconcile::{install_crds, RegistrarReconciler};
use crate::domain::registrar::crd_steps;
use crate::infrastructure::assets::{AssetReader, DirectoryAssets, EmbeddedAssets};
use crate::infrastructure::kubernetes::{ArtifactKind, ClusterStore};
use crate::shared::error::{RegistrarError, Result};
use backon::{BackoffBuilder, ExponentialBuilder};
use kube::core::DynamicObject;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Everything that must hold before the controllers start: the pod identity
/// is known, the CRDs are installed and the API server serves them.
pub async fn bootstrap(
    store: Arc<dyn ClusterStore>,
    config: &OperatorConfig,
) -> Result<RegistrarReconciler> {
    let identity = ControllerIdentity::from_env()?;
    bootstrap_with_identity(store, config, identity).await
}

pub async fn bootstrap_with_identity(
    store: Arc<dyn ClusterStore>,
    config: &OperatorConfig,
    identity: ControllerIdentity,
) -> Result<RegistrarReconciler> {
    info!(
        pod = %identity.pod_name,
        namespace = %identity.pod_namespace,
        "bootstrapping"
    );

    let assets = select_assets(config)?;
    let report = install_crds(store.as_ref(), assets.as_ref()).await?;
    info!(
        created = report.created.len(),
        already_present = report.already_present.len(),
        "crds applied"
    );

    wait_for_crds(store.as_ref(), &config.crds).await?;

    Ok(RegistrarReconciler::new(store, assets, identity))
}

pub fn select_assets(config: &OperatorConfig) -> Result<Arc<dyn AssetReader>> {
    match &config.assets.dir {
        Some(dir) => {
            info!(dir = %dir, "using manifests from directory");
            Ok(Arc::new(DirectoryAssets::new(dir)?))
        }
        None => Ok(Arc::new(EmbeddedAssets)),
    }
}

/// Polls each CRD until its `Established` condition is `True`.
pub async fn wait_for_crds(store: &dyn ClusterStore, conf: &CrdConf) -> Result<()> {
    for step in crd_steps() {
        let name = &step.artifact.name;
        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(conf.wait_min_delay_ms))
            .with_max_delay(Duration::from_millis(conf.wait_max_delay_ms))
            .with_max_times(conf.wait_attempts)
            .build();

        loop {
            match store
                .get(ArtifactKind::CustomResourceDefinition, name, None)
                .await
            {
                Ok(crd) if is_established(&crd) => {
                    debug!(crd = %name, "established");
                    break;
                }
                Ok(_) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }

            match backoff.next() {
                Some(delay) => {
                    debug!(crd = %name, delay_ms = delay.as_millis() as u64, "waiting for crd");
                    tokio::time::sleep(delay).await;
                }
                None => {
                    return Err(RegistrarError::Timeout(format!(
                        "CRD {} not established after {} attempts",
                        name, conf.wait_attempts
                    )))
                }
            }
        }
    }
    info!("all crds established");
    Ok(())
}

pub fn is_established(crd: &DynamicObject) -> bool {
    crd.data
        .pointer("/status/conditions")
        .and_then(|c| c.as_array())
        .map(|conditions| {
            conditions.iter().any(|c| {
                c.get("type").and_then(|t| t.as_str()) == Some("Established")
                    && c.get("status").and_then(|s| s.as_str()) == Some("True")
            })
        })
        .unwrap_or(false)
}
