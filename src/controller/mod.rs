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

//! Runtime wiring: setup, the ClusterRegistrar controller and the
//! ManagedCluster watcher.

pub mod managed_cluster;
pub mod registrar;
pub mod setup;

use crate::domain::config::OperatorConfig;
use crate::domain::reconcile::RegistrarReconciler;
use std::sync::Arc;
use std::time::Duration;

/// Shared state handed to every ClusterRegistrar reconcile.
pub struct Context {
    pub reconciler: RegistrarReconciler,
    pub error_requeue: Duration,
    pub reconcile_timeout: Duration,
}

impl Context {
    pub fn new(reconciler: RegistrarReconciler, config: &OperatorConfig) -> Arc<Self> {
        Arc::new(Self {
            reconciler,
            error_requeue: config.error_requeue(),
            reconcile_timeout: config.reconcile_timeout(),
        })
    }
}

pub use setup::{bootstrap, bootstrap_with_identity, is_established, select_assets, wait_for_crds};
