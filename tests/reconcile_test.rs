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

mod support {
    use cluster_registrar::domain::registrar::resource::add_finalizer;
    use cluster_registrar::*;
    use kube::core::DynamicObject;
    use serde_json::json;
    use std::sync::Arc;

    pub const NS: &str = "ocm";
    pub const POD: &str = "cluster-registrar-5d8c7";
    pub const IMAGE: &str = "registry/op:v1";
    pub const REGISTRAR: &str = "cluster-registrar";

    pub fn pod(image: Option<&str>) -> DynamicObject {
        let mut pod = DynamicObject::new(POD, &ArtifactKind::Pod.api_resource()).within(NS);
        pod.data = match image {
            Some(image) => json!({"spec": {"containers": [{"name": "manager", "image": image}]}}),
            None => json!({"spec": {"containers": []}}),
        };
        pod
    }

    pub fn registrar(finalized: bool) -> DynamicObject {
        let mut obj =
            DynamicObject::new(REGISTRAR, &ArtifactKind::ClusterRegistrar.api_resource())
                .within(NS);
        obj.data = json!({"spec": {}});
        if finalized {
            add_finalizer(&mut obj);
        }
        obj
    }

    pub fn key() -> ObjectKey {
        ObjectKey::new(NS, REGISTRAR)
    }

    pub fn reconciler(store: &Arc<InMemoryClusterStore>) -> RegistrarReconciler {
        reconciler_with_assets(store, Arc::new(EmbeddedAssets))
    }

    pub fn reconciler_with_assets(
        store: &Arc<InMemoryClusterStore>,
        assets: Arc<dyn AssetReader>,
    ) -> RegistrarReconciler {
        RegistrarReconciler::new(store.clone(), assets, ControllerIdentity::new(POD, NS))
    }

    /// A store holding the controller pod and one live ClusterRegistrar.
    pub fn seeded_store() -> Arc<InMemoryClusterStore> {
        let store = Arc::new(InMemoryClusterStore::new());
        store.insert(ArtifactKind::Pod, pod(Some(IMAGE)));
        store.insert(ArtifactKind::ClusterRegistrar, registrar(false));
        store
    }

    pub fn registrar_object(store: &InMemoryClusterStore) -> Option<DynamicObject> {
        store.object(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
    }

    pub fn artifact_present(store: &InMemoryClusterStore, artifact: &ArtifactRef) -> bool {
        store.contains(artifact.kind, &artifact.name, artifact.namespace())
    }
}

use cluster_registrar::domain::registrar::resource::has_finalizer;
use cluster_registrar::domain::registrar::{install_artifacts, teardown_plan};
use cluster_registrar::infrastructure::constants::{
    MANAGER_CLUSTER_ROLE, MANAGER_CLUSTER_ROLE_BINDING, MANAGER_DEPLOYMENT, WEBHOOK_API_SERVICE,
    WEBHOOK_NAME,
};
use cluster_registrar::infrastructure::kubernetes::StoreOp;
use cluster_registrar::*;
use std::sync::Arc;
use support::*;

#[tokio::test]
async fn test_first_reconcile_adds_finalizer_and_installs_everything() {
    let store = seeded_store();
    let outcome = reconciler(&store).reconcile(&key()).await.unwrap();

    let ReconcileOutcome::Installed(report) = outcome else {
        panic!("expected install, got {:?}", outcome);
    };
    assert_eq!(report.created.len(), 13);
    assert!(report.already_present.is_empty());

    let registrar = registrar_object(&store).unwrap();
    assert!(has_finalizer(&registrar));

    for artifact in install_artifacts(NS) {
        assert!(artifact_present(&store, &artifact), "missing {}", artifact);
    }

    // The finalizer write precedes the first create.
    let calls = store.calls();
    let replace = calls.iter().position(|c| c.op == StoreOp::Replace).unwrap();
    let first_create = calls.iter().position(|c| c.op == StoreOp::Create).unwrap();
    assert!(replace < first_create);
}

#[tokio::test]
async fn test_install_renders_pod_image_and_namespace() {
    let store = seeded_store();
    reconciler(&store).reconcile(&key()).await.unwrap();

    let manager = store
        .object(ArtifactKind::Deployment, MANAGER_DEPLOYMENT, Some(NS))
        .unwrap();
    assert_eq!(
        manager.data.pointer("/spec/template/spec/containers/0/image"),
        Some(&serde_json::json!(IMAGE))
    );
    assert_eq!(manager.metadata.namespace.as_deref(), Some(NS));

    let api_service = store
        .object(ArtifactKind::APIService, WEBHOOK_API_SERVICE, None)
        .unwrap();
    assert_eq!(
        api_service.data.pointer("/spec/service/namespace"),
        Some(&serde_json::json!(NS))
    );
    assert!(api_service.metadata.namespace.is_none());
}

#[tokio::test]
async fn test_second_reconcile_is_a_noop() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    reconciler.reconcile(&key()).await.unwrap();
    let objects = store.len();
    store.clear_calls();

    let outcome = reconciler.reconcile(&key()).await.unwrap();
    let ReconcileOutcome::Installed(report) = outcome else {
        panic!("expected install, got {:?}", outcome);
    };
    assert!(report.is_noop());
    assert_eq!(report.already_present.len(), 13);
    assert_eq!(store.len(), objects);
    assert!(store.calls().iter().all(|c| c.op != StoreOp::Replace));
}

#[tokio::test]
async fn test_missing_pod_fails_after_finalizer_is_persisted() {
    let store = Arc::new(InMemoryClusterStore::new());
    store.insert(ArtifactKind::ClusterRegistrar, registrar(false));

    let err = reconciler(&store).reconcile(&key()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(has_finalizer(&registrar_object(&store).unwrap()));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_pod_without_containers_is_invalid() {
    let store = Arc::new(InMemoryClusterStore::new());
    store.insert(ArtifactKind::Pod, pod(None));
    store.insert(ArtifactKind::ClusterRegistrar, registrar(false));

    let err = reconciler(&store).reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "invalid_resource");
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_failed_finalizer_write_installs_nothing() {
    let store = seeded_store();
    store.inject_failure(StoreOp::Replace, ArtifactKind::ClusterRegistrar, REGISTRAR);

    let err = reconciler(&store).reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "api");
    assert!(store.calls().iter().all(|c| c.op != StoreOp::Create));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_stale_registrar_write_is_a_conflict() {
    let store = seeded_store();
    let mut stale = store.get(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS)).await.unwrap();
    store.touch(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS));

    cluster_registrar::domain::registrar::resource::add_finalizer(&mut stale);
    let err = store
        .replace(ArtifactKind::ClusterRegistrar, &stale)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(!has_finalizer(&registrar_object(&store).unwrap()));
}

#[tokio::test]
async fn test_partial_install_resumes() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    store.inject_failure(StoreOp::Create, ArtifactKind::Deployment, MANAGER_DEPLOYMENT);

    let err = reconciler.reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "api");
    // manager RBAC landed, nothing after the failing batch did
    assert!(store.contains(ArtifactKind::ClusterRole, MANAGER_CLUSTER_ROLE, None));
    assert!(!store.contains(ArtifactKind::Deployment, MANAGER_DEPLOYMENT, Some(NS)));
    assert!(!store.contains(ArtifactKind::ServiceAccount, WEBHOOK_NAME, Some(NS)));

    store.clear_failures();
    let ReconcileOutcome::Installed(report) = reconciler.reconcile(&key()).await.unwrap() else {
        panic!("expected install");
    };
    assert_eq!(report.already_present.len(), 5);
    assert_eq!(report.created.len(), 8);
}

#[tokio::test]
async fn test_deletion_tears_down_and_releases_registrar() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    reconciler.reconcile(&key()).await.unwrap();

    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();
    assert!(registrar_object(&store)
        .unwrap()
        .metadata
        .deletion_timestamp
        .is_some());

    let ReconcileOutcome::Uninstalled(report) = reconciler.reconcile(&key()).await.unwrap() else {
        panic!("expected teardown");
    };
    assert_eq!(report.deleted, teardown_plan(NS));
    assert!(report.skipped.is_empty());

    // only the controller pod survives
    assert!(registrar_object(&store).is_none());
    assert_eq!(store.len(), 1);

    assert_eq!(
        reconciler.reconcile(&key()).await.unwrap(),
        ReconcileOutcome::Absent
    );
}

#[tokio::test]
async fn test_teardown_follows_declared_order() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    reconciler.reconcile(&key()).await.unwrap();
    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();
    store.clear_calls();

    reconciler.reconcile(&key()).await.unwrap();

    let deletes: Vec<_> = store
        .calls()
        .into_iter()
        .filter(|c| c.op == StoreOp::Delete)
        .map(|c| (c.kind, c.name))
        .collect();
    let expected: Vec<_> = teardown_plan(NS)
        .into_iter()
        .map(|a| (a.kind, a.name))
        .collect();
    assert_eq!(deletes, expected);
}

#[tokio::test]
async fn test_deleting_never_installed_registrar_skips_everything() {
    let store = Arc::new(InMemoryClusterStore::new());
    store.insert(ArtifactKind::Pod, pod(Some(IMAGE)));
    store.insert(ArtifactKind::ClusterRegistrar, registrar(true));
    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();

    let ReconcileOutcome::Uninstalled(report) = reconciler(&store).reconcile(&key()).await.unwrap()
    else {
        panic!("expected teardown");
    };
    assert!(report.deleted.is_empty());
    assert_eq!(report.skipped.len(), 13);
    assert!(registrar_object(&store).is_none());
}

#[tokio::test]
async fn test_deletion_without_finalizer_issues_no_write() {
    let store = Arc::new(InMemoryClusterStore::new());
    let mut obj = registrar(false);
    obj.metadata.deletion_timestamp = Some(
        k8s_openapi::apimachinery::pkg::apis::meta::v1::Time(chrono::Utc::now()),
    );
    store.insert(ArtifactKind::ClusterRegistrar, obj);

    let outcome = reconciler(&store).reconcile(&key()).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Uninstalled(_)));
    assert!(store.calls().iter().all(|c| c.op != StoreOp::Replace));
}

#[tokio::test]
async fn test_failed_teardown_keeps_finalizer_and_resumes() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    reconciler.reconcile(&key()).await.unwrap();
    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();

    store.inject_failure(StoreOp::Delete, ArtifactKind::APIService, WEBHOOK_API_SERVICE);
    let err = reconciler.reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "api");

    let registrar = registrar_object(&store).unwrap();
    assert!(has_finalizer(&registrar));
    assert!(!store.contains(ArtifactKind::Deployment, WEBHOOK_NAME, Some(NS)));
    assert!(store.contains(ArtifactKind::Service, WEBHOOK_NAME, Some(NS)));

    store.clear_failures();
    let ReconcileOutcome::Uninstalled(report) = reconciler.reconcile(&key()).await.unwrap() else {
        panic!("expected teardown");
    };
    assert_eq!(report.skipped.len(), 7);
    assert_eq!(report.deleted.len(), 6);
    assert!(registrar_object(&store).is_none());
}

#[tokio::test]
async fn test_teardown_fetch_failure_aborts_and_keeps_finalizer() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    reconciler.reconcile(&key()).await.unwrap();
    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();

    store.inject_failure(
        StoreOp::Get,
        ArtifactKind::ClusterRoleBinding,
        MANAGER_CLUSTER_ROLE_BINDING,
    );
    let err = reconciler.reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "api");

    // a failed fetch is not "already absent": nothing past it is touched
    let plan = teardown_plan(NS);
    for artifact in &plan[..2] {
        assert!(!artifact_present(&store, artifact), "{} survived", artifact);
    }
    for artifact in &plan[2..] {
        assert!(artifact_present(&store, artifact), "{} was removed", artifact);
    }
    assert!(has_finalizer(&registrar_object(&store).unwrap()));
}

#[tokio::test]
async fn test_registrar_fetch_failure_is_not_absent() {
    let store = seeded_store();
    store.inject_failure(StoreOp::Get, ArtifactKind::ClusterRegistrar, REGISTRAR);

    let err = reconciler(&store).reconcile(&key()).await.unwrap_err();
    assert_eq!(err.class(), "api");
    assert!(!err.is_not_found());
    assert!(store.calls().iter().all(|c| c.op == StoreOp::Get));
}

#[tokio::test]
async fn test_absent_registrar_does_nothing() {
    let store = Arc::new(InMemoryClusterStore::new());
    let outcome = reconciler(&store).reconcile(&key()).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::Absent);
    assert_eq!(store.calls().len(), 1);
}

#[tokio::test]
async fn test_install_crds_is_idempotent() {
    let store = InMemoryClusterStore::new();

    let first = install_crds(&store, &EmbeddedAssets).await.unwrap();
    assert_eq!(first.created.len(), 3);

    let second = install_crds(&store, &EmbeddedAssets).await.unwrap();
    assert!(second.is_noop());
    assert_eq!(second.already_present.len(), 3);
    assert!(store.contains(
        ArtifactKind::CustomResourceDefinition,
        "clusterregistrars.singapore.open-cluster-management.io",
        None
    ));
}

#[tokio::test]
async fn test_deleting_after_only_rbac_landed() {
    let store = seeded_store();
    let reconciler = reconciler(&store);
    store.inject_failure(StoreOp::Create, ArtifactKind::Deployment, MANAGER_DEPLOYMENT);
    reconciler.reconcile(&key()).await.unwrap_err();
    store.clear_failures();

    store
        .delete(ArtifactKind::ClusterRegistrar, REGISTRAR, Some(NS))
        .await
        .unwrap();
    let ReconcileOutcome::Uninstalled(report) = reconciler.reconcile(&key()).await.unwrap() else {
        panic!("expected teardown");
    };
    assert_eq!(report.deleted.len(), 5);
    assert_eq!(report.skipped.len(), 8);
    for artifact in install_artifacts(NS) {
        assert!(!artifact_present(&store, &artifact), "left behind {}", artifact);
    }
    assert!(registrar_object(&store).is_none());
}

/// Delegates to the in-memory store after a fixed delay per read.
struct SlowStore {
    inner: Arc<InMemoryClusterStore>,
    delay: std::time::Duration,
}

#[async_trait::async_trait]
impl ClusterStore for SlowStore {
    async fn get(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<kube::core::DynamicObject> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(kind, name, namespace).await
    }

    async fn create(
        &self,
        kind: ArtifactKind,
        object: &kube::core::DynamicObject,
    ) -> Result<kube::core::DynamicObject> {
        self.inner.create(kind, object).await
    }

    async fn replace(
        &self,
        kind: ArtifactKind,
        object: &kube::core::DynamicObject,
    ) -> Result<kube::core::DynamicObject> {
        self.inner.replace(kind, object).await
    }

    async fn delete(&self, kind: ArtifactKind, name: &str, namespace: Option<&str>) -> Result<()> {
        self.inner.delete(kind, name, namespace).await
    }
}

#[tokio::test]
async fn test_reconcile_deadline_expires_as_timeout() {
    use cluster_registrar::controller::registrar::reconcile_with_deadline;
    use std::time::Duration;

    let inner = seeded_store();
    let slow = Arc::new(SlowStore {
        inner: inner.clone(),
        delay: Duration::from_millis(200),
    });
    let reconciler = RegistrarReconciler::new(
        slow,
        Arc::new(EmbeddedAssets),
        ControllerIdentity::new(POD, NS),
    );

    let err = reconcile_with_deadline(&reconciler, &key(), Duration::from_millis(20))
        .await
        .unwrap_err();
    assert_eq!(err.class(), "timeout");
    // the deadline hit before any artifact was created
    assert_eq!(inner.len(), 2);
}
