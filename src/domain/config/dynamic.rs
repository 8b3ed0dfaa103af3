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

//! `-D key=value` overrides layered over the config file.

use crate::domain::config::operator::OperatorConfig;
use crate::shared::error::{RegistrarError, Result};
use std::collections::HashMap;
use std::str::FromStr;

pub const SUPPORTED_KEYS: &[&str] = &[
    "controller.error-requeue-secs",
    "controller.reconcile-timeout-secs",
    "controller.field-manager",
    "assets.dir",
    "crds.wait-attempts",
    "crds.wait-min-delay-ms",
    "crds.wait-max-delay-ms",
    "managed-cluster.enabled",
];

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        RegistrarError::ConfigError(format!("Invalid value for {}: '{}'", key, value))
    })
}

pub fn apply_overrides(configs: &HashMap<String, String>, conf: &mut OperatorConfig) -> Result<()> {
    for (key, value) in configs {
        match key.as_str() {
            "controller.error-requeue-secs" => {
                conf.controller.error_requeue_secs = parse(key, value)?;
            }
            "controller.reconcile-timeout-secs" => {
                conf.controller.reconcile_timeout_secs = parse(key, value)?;
            }
            "controller.field-manager" => {
                conf.controller.field_manager = value.clone();
            }
            "assets.dir" => {
                conf.assets.dir = (!value.is_empty()).then(|| value.clone());
            }
            "crds.wait-attempts" => {
                conf.crds.wait_attempts = parse(key, value)?;
            }
            "crds.wait-min-delay-ms" => {
                conf.crds.wait_min_delay_ms = parse(key, value)?;
            }
            "crds.wait-max-delay-ms" => {
                conf.crds.wait_max_delay_ms = parse(key, value)?;
            }
            "managed-cluster.enabled" => {
                conf.managed_cluster.enabled = parse(key, value)?;
            }
            other => {
                return Err(RegistrarError::ConfigError(format!(
                    "Unknown configuration key '{}' (supported: {})",
                    other,
                    SUPPORTED_KEYS.join(", ")
                )));
            }
        }
    }

    conf.validate()
}

/// Parses `key=value` pairs.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for config in configs {
        let (key, value) = config.split_once('=').ok_or_else(|| {
            RegistrarError::ConfigError(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(RegistrarError::ConfigError(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[&str]) -> HashMap<String, String> {
        let owned: Vec<String> = pairs.iter().map(|s| s.to_string()).collect();
        parse_dynamic_configs(&owned).unwrap()
    }

    #[test]
    fn test_apply_overrides() {
        let mut conf = OperatorConfig::default();
        apply_overrides(
            &overrides(&[
                "controller.error-requeue-secs=7",
                "assets.dir=/srv/manifests",
                "managed-cluster.enabled=true",
            ]),
            &mut conf,
        )
        .unwrap();

        assert_eq!(conf.controller.error_requeue_secs, 7);
        assert_eq!(conf.assets.dir.as_deref(), Some("/srv/manifests"));
        assert!(conf.managed_cluster.enabled);
    }

    #[test]
    fn test_bad_overrides_are_rejected() {
        let mut conf = OperatorConfig::default();
        assert!(apply_overrides(&overrides(&["crds.wait-attempts=many"]), &mut conf).is_err());
        assert!(apply_overrides(&overrides(&["controller.colour=blue"]), &mut conf).is_err());
        assert!(apply_overrides(&overrides(&["crds.wait-attempts=0"]), &mut conf).is_err());
    }

    #[test]
    fn test_parse_dynamic_configs() {
        let map = overrides(&["a.b = c=d"]);
        assert_eq!(map.get("a.b").map(String::as_str), Some("c=d"));
        assert!(parse_dynamic_configs(&["novalue".to_string()]).is_err());
        assert!(parse_dynamic_configs(&["=x".to_string()]).is_err());
    }
}
