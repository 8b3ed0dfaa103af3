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

use crate::domain::config::ControllerIdentity;
use crate::domain::reconcile::applier::{Applier, ApplyReport};
use crate::domain::reconcile::teardown::{TeardownOrchestrator, TeardownReport};
use crate::domain::registrar::resource::{add_finalizer, is_deleting, remove_finalizer};
use crate::domain::registrar::{crd_steps, install_plan, teardown_plan, RenderValues};
use crate::infrastructure::assets::{AssetReader, ManifestRenderer};
use crate::infrastructure::kubernetes::{ArtifactKind, ClusterStore};
use crate::shared::error::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Namespaced identity of a ClusterRegistrar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    pub name: String,
    pub namespace: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The object is gone; nothing to do.
    Absent,
    Installed(ApplyReport),
    Uninstalled(TeardownReport),
}

/// Drives one ClusterRegistrar toward installed-and-finalized or fully torn down.
///
/// ```text
/// Unseen ──add finalizer──▶ Present-Finalized ──install ok──▶ Installed
///                             ▲      │ install failed                │ deletionTimestamp
///                             └──────┘                               ▼
///                 Gone ◀──teardown ok, finalizer removed── Deleting ◀┘ (retries on failure)
/// ```
///
/// The finalizer is persisted before any install work and removed only after
/// the whole teardown succeeded; each is its own write.
#[derive(Clone)]
pub struct RegistrarReconciler {
    store: Arc<dyn ClusterStore>,
    assets: Arc<dyn AssetReader>,
    identity: ControllerIdentity,
}

impl RegistrarReconciler {
    pub fn new(
        store: Arc<dyn ClusterStore>,
        assets: Arc<dyn AssetReader>,
        identity: ControllerIdentity,
    ) -> Self {
        Self {
            store,
            assets,
            identity,
        }
    }

    pub fn identity(&self) -> &ControllerIdentity {
        &self.identity
    }

    pub fn store(&self) -> &dyn ClusterStore {
        self.store.as_ref()
    }

    #[tracing::instrument(skip(self), fields(registrar = %key))]
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome> {
        let mut registrar = match self
            .store
            .get(ArtifactKind::ClusterRegistrar, &key.name, Some(&key.namespace))
            .await
        {
            Ok(obj) => obj,
            Err(e) if e.is_not_found() => {
                debug!("registrar no longer exists");
                return Ok(ReconcileOutcome::Absent);
            }
            Err(e) => return Err(e),
        };

        if is_deleting(&registrar) {
            if let Some(ts) = &registrar.metadata.deletion_timestamp {
                let pending = chrono::Utc::now().signed_duration_since(ts.0);
                info!(pending_secs = pending.num_seconds(), "uninstalling");
            }

            let report = self.uninstall().await?;

            if remove_finalizer(&mut registrar) {
                self.store
                    .replace(ArtifactKind::ClusterRegistrar, &registrar)
                    .await?;
                info!(
                    deleted = report.deleted.len(),
                    skipped = report.skipped.len(),
                    "teardown complete, finalizer removed"
                );
            }
            return Ok(ReconcileOutcome::Uninstalled(report));
        }

        if add_finalizer(&mut registrar) {
            self.store
                .replace(ArtifactKind::ClusterRegistrar, &registrar)
                .await?;
            info!("finalizer added");
        }

        let report = self.install().await?;
        info!(
            created = report.created.len(),
            already_present = report.already_present.len(),
            "install complete"
        );
        Ok(ReconcileOutcome::Installed(report))
    }

    /// Resolves render values from the controller's own pod, then applies
    /// every install batch in order.
    pub async fn install(&self) -> Result<ApplyReport> {
        let values = self.render_values().await?;
        let plan = install_plan(&values.namespace);
        Applier::new(
            self.store.as_ref(),
            self.assets.as_ref(),
            ManifestRenderer::new(values),
        )
        .apply_plan(&plan)
        .await
    }

    pub async fn uninstall(&self) -> Result<TeardownReport> {
        let plan = teardown_plan(&self.identity.pod_namespace);
        TeardownOrchestrator::new(self.store.as_ref())
            .run(&plan)
            .await
    }

    /// Recomputed on every call; never cached across reconciles.
    pub async fn render_values(&self) -> Result<RenderValues> {
        let pod = self
            .store
            .get(
                ArtifactKind::Pod,
                &self.identity.pod_name,
                Some(&self.identity.pod_namespace),
            )
            .await?;
        RenderValues::from_pod(&pod, &self.identity.pod_namespace)
    }
}

/// Installs the operator's CRDs. Runs once at setup.
pub async fn install_crds(
    store: &dyn ClusterStore,
    assets: &dyn AssetReader,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    Applier::new(store, assets, ManifestRenderer::plain())
        .apply_steps(&crd_steps(), &mut report)
        .await?;
    Ok(report)
}
