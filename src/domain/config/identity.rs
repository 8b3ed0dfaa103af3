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

use crate::infrastructure::constants::{ENV_POD_NAME, ENV_POD_NAMESPACE};
use crate::shared::error::{RegistrarError, Result};

/// Where the controller itself runs.
///
/// Resolved once at setup and handed to the reconciler; every install
/// reconcile reads the image of this pod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerIdentity {
    pub pod_name: String,
    pub pod_namespace: String,
}

impl ControllerIdentity {
    pub fn new(pod_name: impl Into<String>, pod_namespace: impl Into<String>) -> Self {
        Self {
            pod_name: pod_name.into(),
            pod_namespace: pod_namespace.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| RegistrarError::MissingEnv(key.to_string()))
        };

        Ok(Self {
            pod_name: required(ENV_POD_NAME)?,
            pod_namespace: required(ENV_POD_NAMESPACE)?,
        })
    }
}
