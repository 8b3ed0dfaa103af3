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

//! Watches `ManagedCluster` objects owned by the cluster-management hub.
//! Reconciles are no-ops; the watcher only keeps the cache warm.

use crate::infrastructure::constants::{
    MANAGED_CLUSTER_GROUP, MANAGED_CLUSTER_KIND, MANAGED_CLUSTER_PLURAL, MANAGED_CLUSTER_VERSION,
};
use crate::shared::error::{RegistrarError, Result};
use futures::StreamExt;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::runtime::controller::{Action, Controller};
use kube::runtime::watcher::Config;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub fn managed_cluster_resource() -> ApiResource {
    let gvk = GroupVersionKind::gvk(
        MANAGED_CLUSTER_GROUP,
        MANAGED_CLUSTER_VERSION,
        MANAGED_CLUSTER_KIND,
    );
    ApiResource::from_gvk_with_plural(&gvk, MANAGED_CLUSTER_PLURAL)
}

pub async fn run(client: Client, error_requeue: Duration) {
    let ar = managed_cluster_resource();
    let clusters: Api<DynamicObject> = Api::all_with(client, &ar);

    info!("starting ManagedCluster watcher");
    Controller::new_with(clusters, Config::default(), ar)
        .shutdown_on_signal()
        .run(reconcile, error_policy, Arc::new(error_requeue))
        .for_each(|res| async move {
            if let Err(e) = res {
                warn!(error = %e, "managed cluster watch error");
            }
        })
        .await;
    info!("ManagedCluster watcher stopped");
}

async fn reconcile(cluster: Arc<DynamicObject>, _ctx: Arc<Duration>) -> Result<Action> {
    debug!(cluster = %cluster.name_any(), "observed managed cluster");
    Ok(Action::await_change())
}

fn error_policy(_cluster: Arc<DynamicObject>, error: &RegistrarError, ctx: Arc<Duration>) -> Action {
    warn!(error.class = error.class(), error = %error, "managed cluster reconcile error");
    Action::requeue(*ctx)
}
