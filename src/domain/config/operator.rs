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

use crate::infrastructure::constants::*;
use crate::shared::error::{RegistrarError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Operator settings, read from an optional TOML file.
///
/// ```toml
/// [controller]
/// error_requeue_secs = 30
/// reconcile_timeout_secs = 120
///
/// [assets]
/// dir = "/etc/cluster-registrar/manifests"
///
/// [crds]
/// wait_attempts = 10
///
/// [managed_cluster]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OperatorConfig {
    pub controller: ControllerConf,
    pub assets: AssetsConf,
    pub crds: CrdConf,
    pub managed_cluster: ManagedClusterConf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConf {
    pub error_requeue_secs: u64,
    pub reconcile_timeout_secs: u64,
    pub field_manager: String,
}

impl Default for ControllerConf {
    fn default() -> Self {
        Self {
            error_requeue_secs: DEFAULT_ERROR_REQUEUE_SECS,
            reconcile_timeout_secs: DEFAULT_RECONCILE_TIMEOUT_SECS,
            field_manager: FIELD_MANAGER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConf {
    /// Overrides the embedded manifests when set.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrdConf {
    pub wait_attempts: usize,
    pub wait_min_delay_ms: u64,
    pub wait_max_delay_ms: u64,
}

impl Default for CrdConf {
    fn default() -> Self {
        Self {
            wait_attempts: DEFAULT_CRD_WAIT_ATTEMPTS,
            wait_min_delay_ms: DEFAULT_CRD_WAIT_MIN_DELAY_MS,
            wait_max_delay_ms: DEFAULT_CRD_WAIT_MAX_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagedClusterConf {
    pub enabled: bool,
}

impl OperatorConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RegistrarError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let conf: Self = toml::from_str(content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        if self.controller.error_requeue_secs == 0 {
            return Err(RegistrarError::config_error(
                "controller.error_requeue_secs must be > 0",
            ));
        }
        if self.controller.reconcile_timeout_secs == 0 {
            return Err(RegistrarError::config_error(
                "controller.reconcile_timeout_secs must be > 0",
            ));
        }
        if self.controller.field_manager.trim().is_empty() {
            return Err(RegistrarError::config_error(
                "controller.field_manager must not be empty",
            ));
        }
        if self.crds.wait_attempts == 0 {
            return Err(RegistrarError::config_error("crds.wait_attempts must be > 0"));
        }
        if self.crds.wait_min_delay_ms > self.crds.wait_max_delay_ms {
            return Err(RegistrarError::config_error(format!(
                "crds.wait_min_delay_ms ({}) exceeds crds.wait_max_delay_ms ({})",
                self.crds.wait_min_delay_ms, self.crds.wait_max_delay_ms
            )));
        }
        Ok(())
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.controller.error_requeue_secs)
    }

    pub fn reconcile_timeout(&self) -> Duration {
        Duration::from_secs(self.controller.reconcile_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let conf = OperatorConfig::default();
        assert!(conf.validate().is_ok());
        assert_eq!(conf.error_requeue(), Duration::from_secs(30));
        assert!(!conf.managed_cluster.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let conf = OperatorConfig::from_toml(
            "[controller]\nerror_requeue_secs = 5\n\n[managed_cluster]\nenabled = true\n",
        )
        .unwrap();
        assert_eq!(conf.controller.error_requeue_secs, 5);
        assert_eq!(conf.controller.reconcile_timeout_secs, 120);
        assert_eq!(conf.crds, CrdConf::default());
        assert!(conf.managed_cluster.enabled);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(OperatorConfig::from_toml("[controller]\nreconcile_timeout_secs = 0\n").is_err());
        assert!(OperatorConfig::from_toml(
            "[crds]\nwait_min_delay_ms = 20000\nwait_max_delay_ms = 10\n"
        )
        .is_err());
        assert!(matches!(
            OperatorConfig::from_toml("controller = 3").unwrap_err(),
            RegistrarError::TomlParse(_)
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("operator.toml");
        std::fs::write(&path, "[assets]\ndir = \"/srv/manifests\"\n").unwrap();

        let conf = OperatorConfig::from_file(&path).unwrap();
        assert_eq!(conf.assets.dir.as_deref(), Some("/srv/manifests"));
        assert!(OperatorConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
