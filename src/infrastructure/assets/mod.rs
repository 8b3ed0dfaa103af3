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

//! Read-only manifest storage addressed by logical path.

pub mod render;

pub use render::ManifestRenderer;

use crate::shared::error::{RegistrarError, Result};
use std::path::{Component, Path, PathBuf};

pub trait AssetReader: Send + Sync {
    /// Raw manifest bytes for `path`; a missing path is `AssetNotFound`.
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

macro_rules! embedded {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/manifests/", $path)) as &[u8])),*]
    };
}

static EMBEDDED: &[(&str, &[u8])] = embedded![
    "cluster-registration-operator/service_account.yaml",
    "cluster-registration-operator/leader_election_role.yaml",
    "cluster-registration-operator/leader_election_role_binding.yaml",
    "cluster-registration-operator/clusterrole.yaml",
    "cluster-registration-operator/clusterrole_binding.yaml",
    "cluster-registration-operator/manager.yaml",
    "webhook/service_account.yaml",
    "webhook/webhook_clusterrole.yaml",
    "webhook/webhook_clusterrolebinding.yaml",
    "webhook/webhook_service.yaml",
    "webhook/webhook.yaml",
    "webhook/webhook_validating_config.yaml",
    "webhook/webhook_apiservice.yaml",
    "crd/singapore.open-cluster-management.io_clusterregistrars.yaml",
    "crd/singapore.open-cluster-management.io_registeredclusters.yaml",
    "crd/singapore.open-cluster-management.io_hubconfigs.yaml",
];

/// Manifests compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    pub fn paths(&self) -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(path, _)| *path)
    }
}

impl AssetReader for EmbeddedAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        EMBEDDED
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| RegistrarError::AssetNotFound(path.to_string()))
    }
}

/// Manifests read from a directory laid out like the embedded tree.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RegistrarError::ConfigError(format!(
                "Asset directory does not exist: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }
}

impl AssetReader for DirectoryAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(RegistrarError::AssetNotFound(path.to_string()));
        }

        let full = self.root.join(relative);
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RegistrarError::AssetNotFound(path.to_string()))
            }
            Err(e) => Err(RegistrarError::Io(e)),
        }
    }
}
