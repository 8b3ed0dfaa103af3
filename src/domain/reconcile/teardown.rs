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

//! Ordered fetch-then-delete teardown.

use crate::domain::registrar::ArtifactRef;
use crate::infrastructure::kubernetes::ClusterStore;
use crate::shared::error::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Deleted,
    /// Already absent.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub deleted: Vec<ArtifactRef>,
    pub skipped: Vec<ArtifactRef>,
}

impl TeardownReport {
    fn record(&mut self, artifact: &ArtifactRef, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Deleted => self.deleted.push(artifact.clone()),
            StepOutcome::Skipped => self.skipped.push(artifact.clone()),
        }
    }
}

pub struct TeardownOrchestrator<'a> {
    store: &'a dyn ClusterStore,
}

impl<'a> TeardownOrchestrator<'a> {
    pub fn new(store: &'a dyn ClusterStore) -> Self {
        Self { store }
    }

    /// Runs every step in order and stops at the first error. Re-running
    /// after a failure skips what is already gone.
    pub async fn run(&self, plan: &[ArtifactRef]) -> Result<TeardownReport> {
        let mut report = TeardownReport::default();
        for artifact in plan {
            let outcome = self.remove(artifact).await?;
            report.record(artifact, outcome);
        }
        Ok(report)
    }

    pub async fn remove(&self, artifact: &ArtifactRef) -> Result<StepOutcome> {
        match self
            .store
            .get(artifact.kind, &artifact.name, artifact.namespace())
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                debug!(artifact = %artifact, "already absent");
                return Ok(StepOutcome::Skipped);
            }
            Err(e) => return Err(e),
        }

        match self
            .store
            .delete(artifact.kind, &artifact.name, artifact.namespace())
            .await
        {
            Ok(()) => {
                info!(artifact = %artifact, "deleted");
                Ok(StepOutcome::Deleted)
            }
            // removed by someone else between the fetch and the delete
            Err(e) if e.is_not_found() => {
                debug!(artifact = %artifact, "vanished before delete");
                Ok(StepOutcome::Skipped)
            }
            Err(e) => Err(e),
        }
    }
}
