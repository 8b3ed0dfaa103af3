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

//! The install and teardown sequences, declared as data.
//!
//! Order is fixed by hand: identities and RBAC before the workloads that run
//! under them, the webhook Service and Deployment before the registrations
//! that route to them. Teardown removes the same artifacts, workloads first.

use crate::infrastructure::constants::*;
use crate::infrastructure::kubernetes::ArtifactKind;
use std::fmt;

/// Identity of one managed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactRef {
    pub kind: ArtifactKind,
    pub name: String,
    pub namespace: Option<String>,
}

impl ArtifactRef {
    /// Cluster-scoped kinds drop the namespace.
    pub fn new(kind: ArtifactKind, name: impl Into<String>, namespace: &str) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: kind.is_namespaced().then(|| namespace.to_string()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

/// One manifest and the artifact it must produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestStep {
    pub path: &'static str,
    pub artifact: ArtifactRef,
}

impl ManifestStep {
    fn new(path: &'static str, kind: ArtifactKind, name: &str, namespace: &str) -> Self {
        Self {
            path,
            artifact: ArtifactRef::new(kind, name, namespace),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallBatch {
    pub name: &'static str,
    pub steps: Vec<ManifestStep>,
}

pub fn install_plan(namespace: &str) -> Vec<InstallBatch> {
    use ArtifactKind::*;

    let step = |path, kind, name| ManifestStep::new(path, kind, name, namespace);

    vec![
        InstallBatch {
            name: "manager-rbac",
            steps: vec![
                step(MANIFEST_MANAGER_SERVICE_ACCOUNT, ServiceAccount, MANAGER_SERVICE_ACCOUNT),
                step(MANIFEST_MANAGER_LEADER_ELECTION_ROLE, Role, MANAGER_LEADER_ELECTION_ROLE),
                step(
                    MANIFEST_MANAGER_LEADER_ELECTION_ROLE_BINDING,
                    RoleBinding,
                    MANAGER_LEADER_ELECTION_ROLE_BINDING,
                ),
                step(MANIFEST_MANAGER_CLUSTER_ROLE, ClusterRole, MANAGER_CLUSTER_ROLE),
                step(
                    MANIFEST_MANAGER_CLUSTER_ROLE_BINDING,
                    ClusterRoleBinding,
                    MANAGER_CLUSTER_ROLE_BINDING,
                ),
            ],
        },
        InstallBatch {
            name: "manager-deployment",
            steps: vec![step(MANIFEST_MANAGER_DEPLOYMENT, Deployment, MANAGER_DEPLOYMENT)],
        },
        InstallBatch {
            name: "webhook-rbac",
            steps: vec![
                step(MANIFEST_WEBHOOK_SERVICE_ACCOUNT, ServiceAccount, WEBHOOK_NAME),
                step(MANIFEST_WEBHOOK_CLUSTER_ROLE, ClusterRole, WEBHOOK_NAME),
                step(MANIFEST_WEBHOOK_CLUSTER_ROLE_BINDING, ClusterRoleBinding, WEBHOOK_NAME),
            ],
        },
        InstallBatch {
            name: "webhook-service",
            steps: vec![step(MANIFEST_WEBHOOK_SERVICE, Service, WEBHOOK_NAME)],
        },
        InstallBatch {
            name: "webhook-deployment",
            steps: vec![step(MANIFEST_WEBHOOK_DEPLOYMENT, Deployment, WEBHOOK_NAME)],
        },
        InstallBatch {
            name: "validating-webhook",
            steps: vec![step(
                MANIFEST_WEBHOOK_VALIDATING_CONFIG,
                ValidatingWebhookConfiguration,
                WEBHOOK_NAME,
            )],
        },
        InstallBatch {
            name: "api-service",
            steps: vec![step(MANIFEST_WEBHOOK_API_SERVICE, APIService, WEBHOOK_API_SERVICE)],
        },
    ]
}

pub fn teardown_plan(namespace: &str) -> Vec<ArtifactRef> {
    use ArtifactKind::*;

    let artifact = |kind, name| ArtifactRef::new(kind, name, namespace);

    vec![
        artifact(Deployment, MANAGER_DEPLOYMENT),
        artifact(RoleBinding, MANAGER_LEADER_ELECTION_ROLE_BINDING),
        artifact(ClusterRoleBinding, MANAGER_CLUSTER_ROLE_BINDING),
        artifact(ServiceAccount, MANAGER_SERVICE_ACCOUNT),
        artifact(ClusterRole, MANAGER_CLUSTER_ROLE),
        artifact(Role, MANAGER_LEADER_ELECTION_ROLE),
        artifact(Deployment, WEBHOOK_NAME),
        artifact(APIService, WEBHOOK_API_SERVICE),
        artifact(ClusterRoleBinding, WEBHOOK_NAME),
        artifact(ClusterRole, WEBHOOK_NAME),
        artifact(ServiceAccount, WEBHOOK_NAME),
        artifact(Service, WEBHOOK_NAME),
        artifact(ValidatingWebhookConfiguration, WEBHOOK_NAME),
    ]
}

/// CRDs installed once at controller setup; rendered without values.
pub fn crd_steps() -> Vec<ManifestStep> {
    let crd = |path, name| ManifestStep::new(path, ArtifactKind::CustomResourceDefinition, name, "");

    vec![
        crd(
            MANIFEST_CRD_CLUSTER_REGISTRARS,
            "clusterregistrars.singapore.open-cluster-management.io",
        ),
        crd(
            MANIFEST_CRD_REGISTERED_CLUSTERS,
            "registeredclusters.singapore.open-cluster-management.io",
        ),
        crd(
            MANIFEST_CRD_HUB_CONFIGS,
            "hubconfigs.singapore.open-cluster-management.io",
        ),
    ]
}

pub fn install_artifacts(namespace: &str) -> Vec<ArtifactRef> {
    install_plan(namespace)
        .into_iter()
        .flat_map(|batch| batch.steps)
        .map(|step| step.artifact)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_teardown_is_inverse_of_install() {
        let installed: BTreeSet<_> = install_artifacts("demo").into_iter().collect();
        let removed: BTreeSet<_> = teardown_plan("demo").into_iter().collect();
        assert_eq!(installed.len(), 13);
        assert_eq!(removed.len(), 13);
        assert_eq!(installed, removed);
    }

    #[test]
    fn test_registrations_follow_webhook_workload() {
        let names: Vec<_> = install_plan("demo").iter().map(|b| b.name).collect();
        let pos = |n: &str| names.iter().position(|b| *b == n).unwrap();
        assert!(pos("manager-rbac") < pos("manager-deployment"));
        assert!(pos("webhook-rbac") < pos("webhook-deployment"));
        assert!(pos("webhook-service") < pos("validating-webhook"));
        assert!(pos("webhook-deployment") < pos("validating-webhook"));
        assert!(pos("validating-webhook") < pos("api-service"));
    }

    #[test]
    fn test_cluster_scoped_artifacts_have_no_namespace() {
        for artifact in teardown_plan("demo") {
            assert_eq!(artifact.namespace.is_some(), artifact.kind.is_namespaced());
        }
        assert!(crd_steps().iter().all(|s| s.artifact.namespace.is_none()));
    }

    #[test]
    fn test_teardown_starts_with_workloads() {
        let plan = teardown_plan("demo");
        assert_eq!(plan[0], ArtifactRef::new(ArtifactKind::Deployment, MANAGER_DEPLOYMENT, "demo"));
        assert_eq!(
            plan.last().map(|a| a.kind),
            Some(ArtifactKind::ValidatingWebhookConfiguration)
        );
    }
}
