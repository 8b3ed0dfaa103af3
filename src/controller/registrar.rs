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

use crate::controller::Context;
use crate::domain::reconcile::{ObjectKey, ReconcileOutcome, RegistrarReconciler};
use crate::domain::registrar::ClusterRegistrar;
use crate::shared::error::{RegistrarError, Result};
use futures::StreamExt;
use kube::runtime::controller::{Action, Controller};
use kube::runtime::watcher::Config;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub async fn run(client: Client, ctx: Arc<Context>) {
    let registrars: Api<ClusterRegistrar> = Api::all(client);

    info!("starting ClusterRegistrar controller");
    Controller::new(registrars, Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!(registrar = %obj, "reconciled"),
                Err(e) => warn!(error = %e, "reconcile failed"),
            }
        })
        .await;
    info!("ClusterRegistrar controller stopped");
}

async fn reconcile(registrar: Arc<ClusterRegistrar>, ctx: Arc<Context>) -> Result<Action> {
    let key = ObjectKey::new(
        registrar.namespace().unwrap_or_default(),
        registrar.name_any(),
    );
    reconcile_with_deadline(&ctx.reconciler, &key, ctx.reconcile_timeout).await?;
    Ok(Action::await_change())
}

/// Bounds one reconcile; an expired deadline is a retryable `Timeout`.
pub async fn reconcile_with_deadline(
    reconciler: &RegistrarReconciler,
    key: &ObjectKey,
    deadline: Duration,
) -> Result<ReconcileOutcome> {
    match tokio::time::timeout(deadline, reconciler.reconcile(key)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(RegistrarError::Timeout(format!(
            "reconcile of {} exceeded {}s",
            key,
            deadline.as_secs()
        ))),
    }
}

fn error_policy(registrar: Arc<ClusterRegistrar>, error: &RegistrarError, ctx: Arc<Context>) -> Action {
    error!(
        registrar = %registrar.name_any(),
        error.class = error.class(),
        error = %error,
        "reconcile error, requeueing"
    );
    Action::requeue(ctx.error_requeue)
}
