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

use crate::shared::error::{RegistrarError, Result};
use kube::core::DynamicObject;
use kube::ResourceExt;
use serde::Serialize;

/// Values substituted into manifest templates for one reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderValues {
    pub image: String,
    pub namespace: String,
}

impl RenderValues {
    pub fn new(image: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            namespace: namespace.into(),
        }
    }

    /// Borrows the image of the first container of the controller's own pod.
    pub fn from_pod(pod: &DynamicObject, namespace: &str) -> Result<Self> {
        let image = pod
            .data
            .pointer("/spec/containers/0/image")
            .and_then(|v| v.as_str())
            .filter(|image| !image.is_empty())
            .ok_or_else(|| {
                RegistrarError::InvalidResource(format!(
                    "Pod '{}' has no container image to borrow",
                    pod.name_any()
                ))
            })?;

        Ok(Self::new(image, namespace))
    }

    /// Template key lookup (`Image`, `Namespace`).
    pub fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "Image" => Some(&self.image),
            "Namespace" => Some(&self.namespace),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kubernetes::ArtifactKind;
    use serde_json::json;

    #[test]
    fn test_from_pod_uses_first_container() {
        let pod = DynamicObject::new("op-0", &ArtifactKind::Pod.api_resource())
            .within("demo")
            .data(json!({
                "spec": {"containers": [
                    {"name": "manager", "image": "registry/op:v1"},
                    {"name": "sidecar", "image": "registry/proxy:v9"}
                ]}
            }));

        let values = RenderValues::from_pod(&pod, "demo").unwrap();
        assert_eq!(values, RenderValues::new("registry/op:v1", "demo"));
    }

    #[test]
    fn test_from_pod_without_containers() {
        let pod = DynamicObject::new("op-0", &ArtifactKind::Pod.api_resource())
            .within("demo")
            .data(json!({"spec": {"containers": []}}));

        let err = RenderValues::from_pod(&pod, "demo").unwrap_err();
        assert!(matches!(err, RegistrarError::InvalidResource(_)));
    }
}
