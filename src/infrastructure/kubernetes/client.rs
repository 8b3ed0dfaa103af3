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

use crate::infrastructure::constants::FIELD_MANAGER;
use crate::infrastructure::kubernetes::kinds::ArtifactKind;
use crate::shared::error::RegistrarError;
use kube::api::{DeleteParams, PostParams};
use kube::core::DynamicObject;
use kube::{Api, Client, ResourceExt};

/// The cluster API as the installer consumes it.
///
/// Every failure comes back classified: `NotFound`, `AlreadyExists` and
/// `Conflict` are distinguishable from any other error.
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    async fn get(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<DynamicObject, RegistrarError>;

    async fn create(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError>;

    /// Full update guarded by the object's `resourceVersion`.
    async fn replace(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError>;

    async fn delete(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), RegistrarError>;
}

pub struct KubeClusterStore {
    client: Client,
    field_manager: String,
}

impl KubeClusterStore {
    pub async fn new() -> Result<Self, RegistrarError> {
        let client = Client::try_default().await.map_err(|e| {
            RegistrarError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            field_manager: FIELD_MANAGER.to_string(),
        }
    }

    /// Field manager recorded on every create and replace.
    pub fn with_field_manager(mut self, field_manager: impl Into<String>) -> Self {
        self.field_manager = field_manager.into();
        self
    }

    pub fn get_client(&self) -> Client {
        self.client.clone()
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, RegistrarError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new().await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path).map_err(|e| {
                RegistrarError::KubeError(format!("Failed to load kubeconfig: {}", e))
            })?
        } else {
            Kubeconfig::read().map_err(|e| {
                RegistrarError::KubeError(format!("Failed to load kubeconfig: {}", e))
            })?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                RegistrarError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            RegistrarError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self::from_client(client))
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            dry_run: false,
            field_manager: Some(self.field_manager.clone()),
        }
    }

    fn api(&self, kind: ArtifactKind, namespace: Option<&str>) -> Api<DynamicObject> {
        let ar = kind.api_resource();
        match namespace.filter(|_| kind.is_namespaced()) {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }
}

#[async_trait::async_trait]
impl ClusterStore for KubeClusterStore {
    async fn get(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<DynamicObject, RegistrarError> {
        self.api(kind, namespace)
            .get(name)
            .await
            .map_err(|e| RegistrarError::from_kube(e, "get", kind.as_str(), name, namespace))
    }

    async fn create(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError> {
        let name = object.name_any();
        let namespace = object.namespace();
        let pp = self.post_params();

        self.api(kind, namespace.as_deref())
            .create(&pp, object)
            .await
            .map_err(|e| {
                RegistrarError::from_kube(e, "create", kind.as_str(), &name, namespace.as_deref())
            })
    }

    async fn replace(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError> {
        let name = object.name_any();
        let namespace = object.namespace();
        let pp = self.post_params();

        self.api(kind, namespace.as_deref())
            .replace(&name, &pp, object)
            .await
            .map_err(|e| {
                RegistrarError::from_kube(e, "update", kind.as_str(), &name, namespace.as_deref())
            })
    }

    async fn delete(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), RegistrarError> {
        let dp = DeleteParams::default();

        self.api(kind, namespace)
            .delete(name, &dp)
            .await
            .map_err(|e| RegistrarError::from_kube(e, "delete", kind.as_str(), name, namespace))?;
        Ok(())
    }
}
