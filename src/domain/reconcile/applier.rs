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

//! Idempotent applier: create if absent, tolerate "already exists".

use crate::domain::registrar::{ArtifactRef, InstallBatch, ManifestStep};
use crate::infrastructure::assets::{AssetReader, ManifestRenderer};
use crate::infrastructure::kubernetes::{ArtifactKind, ClusterStore};
use crate::shared::error::{RegistrarError, Result};
use kube::core::DynamicObject;
use kube::ResourceExt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub created: Vec<ArtifactRef>,
    pub already_present: Vec<ArtifactRef>,
}

impl ApplyReport {
    fn record(&mut self, artifact: &ArtifactRef, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Created => self.created.push(artifact.clone()),
            ApplyOutcome::AlreadyPresent => self.already_present.push(artifact.clone()),
        }
    }

    /// Nothing new was written.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

pub struct Applier<'a> {
    store: &'a dyn ClusterStore,
    assets: &'a dyn AssetReader,
    renderer: ManifestRenderer,
}

impl<'a> Applier<'a> {
    pub fn new(
        store: &'a dyn ClusterStore,
        assets: &'a dyn AssetReader,
        renderer: ManifestRenderer,
    ) -> Self {
        Self {
            store,
            assets,
            renderer,
        }
    }

    /// Applies batches in order; the first failure aborts the rest.
    pub async fn apply_plan(&self, batches: &[InstallBatch]) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        for batch in batches {
            debug!(batch = batch.name, "applying batch");
            self.apply_steps(&batch.steps, &mut report).await?;
        }
        Ok(report)
    }

    /// Renders every step before submitting any of them, so a broken
    /// manifest leaves the batch untouched.
    pub async fn apply_steps(&self, steps: &[ManifestStep], report: &mut ApplyReport) -> Result<()> {
        let mut objects = Vec::with_capacity(steps.len());
        for step in steps {
            objects.push(self.prepare(step)?);
        }

        for (step, object) in steps.iter().zip(objects) {
            let outcome = self.submit(&step.artifact, &object).await?;
            report.record(&step.artifact, outcome);
        }
        Ok(())
    }

    fn prepare(&self, step: &ManifestStep) -> Result<DynamicObject> {
        let (kind, object) = self.renderer.load(self.assets, step.path)?;
        conform(step, kind, object)
    }

    async fn submit(&self, artifact: &ArtifactRef, object: &DynamicObject) -> Result<ApplyOutcome> {
        match self.store.create(artifact.kind, object).await {
            Ok(_) => {
                info!(artifact = %artifact, "created");
                Ok(ApplyOutcome::Created)
            }
            Err(e) if e.is_already_exists() => {
                debug!(artifact = %artifact, "already present");
                Ok(ApplyOutcome::AlreadyPresent)
            }
            Err(e) => Err(e),
        }
    }
}

/// Checks the decoded object is the artifact the plan declares, so the
/// teardown list stays the exact inverse of what gets installed.
fn conform(step: &ManifestStep, kind: ArtifactKind, mut object: DynamicObject) -> Result<DynamicObject> {
    let expected = &step.artifact;
    if kind != expected.kind || object.name_any() != expected.name {
        return Err(RegistrarError::decode(
            step.path,
            format!(
                "manifest declares {} '{}', plan expects {}",
                kind,
                object.name_any(),
                expected
            ),
        ));
    }

    match (object.metadata.namespace.as_deref(), expected.namespace()) {
        (_, None) => object.metadata.namespace = None,
        (None, Some(ns)) => object.metadata.namespace = Some(ns.to_string()),
        (Some(actual), Some(ns)) if actual != ns => {
            return Err(RegistrarError::decode(
                step.path,
                format!("manifest targets namespace '{}', plan expects '{}'", actual, ns),
            ));
        }
        _ => {}
    }

    Ok(object)
}
