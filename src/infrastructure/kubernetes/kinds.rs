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

use crate::infrastructure::constants::{REGISTRAR_GROUP, REGISTRAR_VERSION};
use kube::core::{ApiResource, GroupVersionKind};
use std::fmt;

/// Every object kind the installer reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Pod,
    Deployment,
    ServiceAccount,
    ClusterRole,
    ClusterRoleBinding,
    Role,
    RoleBinding,
    Service,
    ValidatingWebhookConfiguration,
    APIService,
    CustomResourceDefinition,
    ClusterRegistrar,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 12] = [
        ArtifactKind::Pod,
        ArtifactKind::Deployment,
        ArtifactKind::ServiceAccount,
        ArtifactKind::ClusterRole,
        ArtifactKind::ClusterRoleBinding,
        ArtifactKind::Role,
        ArtifactKind::RoleBinding,
        ArtifactKind::Service,
        ArtifactKind::ValidatingWebhookConfiguration,
        ArtifactKind::APIService,
        ArtifactKind::CustomResourceDefinition,
        ArtifactKind::ClusterRegistrar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Pod => "Pod",
            ArtifactKind::Deployment => "Deployment",
            ArtifactKind::ServiceAccount => "ServiceAccount",
            ArtifactKind::ClusterRole => "ClusterRole",
            ArtifactKind::ClusterRoleBinding => "ClusterRoleBinding",
            ArtifactKind::Role => "Role",
            ArtifactKind::RoleBinding => "RoleBinding",
            ArtifactKind::Service => "Service",
            ArtifactKind::ValidatingWebhookConfiguration => "ValidatingWebhookConfiguration",
            ArtifactKind::APIService => "APIService",
            ArtifactKind::CustomResourceDefinition => "CustomResourceDefinition",
            ArtifactKind::ClusterRegistrar => "ClusterRegistrar",
        }
    }

    /// (group, version, plural)
    fn coordinates(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            ArtifactKind::Pod => ("", "v1", "pods"),
            ArtifactKind::Deployment => ("apps", "v1", "deployments"),
            ArtifactKind::ServiceAccount => ("", "v1", "serviceaccounts"),
            ArtifactKind::ClusterRole => ("rbac.authorization.k8s.io", "v1", "clusterroles"),
            ArtifactKind::ClusterRoleBinding => {
                ("rbac.authorization.k8s.io", "v1", "clusterrolebindings")
            }
            ArtifactKind::Role => ("rbac.authorization.k8s.io", "v1", "roles"),
            ArtifactKind::RoleBinding => ("rbac.authorization.k8s.io", "v1", "rolebindings"),
            ArtifactKind::Service => ("", "v1", "services"),
            ArtifactKind::ValidatingWebhookConfiguration => (
                "admissionregistration.k8s.io",
                "v1",
                "validatingwebhookconfigurations",
            ),
            ArtifactKind::APIService => ("apiregistration.k8s.io", "v1", "apiservices"),
            ArtifactKind::CustomResourceDefinition => {
                ("apiextensions.k8s.io", "v1", "customresourcedefinitions")
            }
            ArtifactKind::ClusterRegistrar => {
                (REGISTRAR_GROUP, REGISTRAR_VERSION, "clusterregistrars")
            }
        }
    }

    pub fn is_namespaced(&self) -> bool {
        !matches!(
            self,
            ArtifactKind::ClusterRole
                | ArtifactKind::ClusterRoleBinding
                | ArtifactKind::ValidatingWebhookConfiguration
                | ArtifactKind::APIService
                | ArtifactKind::CustomResourceDefinition
        )
    }

    pub fn gvk(&self) -> GroupVersionKind {
        let (group, version, _) = self.coordinates();
        GroupVersionKind::gvk(group, version, self.as_str())
    }

    pub fn api_version(&self) -> String {
        let (group, version, _) = self.coordinates();
        if group.is_empty() {
            version.to_string()
        } else {
            format!("{}/{}", group, version)
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        let (_, _, plural) = self.coordinates();
        ApiResource::from_gvk_with_plural(&self.gvk(), plural)
    }

    /// Resolves the kind a manifest declares through its `apiVersion` and `kind`.
    pub fn from_type_meta(api_version: &str, kind: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == kind && k.api_version() == api_version)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_group_api_version_has_no_prefix() {
        assert_eq!(ArtifactKind::Pod.api_version(), "v1");
        assert_eq!(ArtifactKind::Deployment.api_version(), "apps/v1");
        assert_eq!(
            ArtifactKind::ClusterRegistrar.api_version(),
            "singapore.open-cluster-management.io/v1alpha1"
        );
    }

    #[test]
    fn test_from_type_meta() {
        assert_eq!(
            ArtifactKind::from_type_meta("apiregistration.k8s.io/v1", "APIService"),
            Some(ArtifactKind::APIService)
        );
        assert_eq!(ArtifactKind::from_type_meta("apps/v1beta1", "Deployment"), None);
        assert_eq!(ArtifactKind::from_type_meta("v1", "ConfigMap"), None);
    }

    #[test]
    fn test_api_resource_plural() {
        let ar = ArtifactKind::ValidatingWebhookConfiguration.api_resource();
        assert_eq!(ar.plural, "validatingwebhookconfigurations");
        assert_eq!(ar.group, "admissionregistration.k8s.io");
        assert!(!ArtifactKind::ValidatingWebhookConfiguration.is_namespaced());
        assert!(ArtifactKind::RoleBinding.is_namespaced());
    }
}
