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

use crate::domain::registrar::RenderValues;
use crate::infrastructure::assets::AssetReader;
use crate::infrastructure::kubernetes::ArtifactKind;
use crate::shared::error::{RegistrarError, Result};
use kube::core::DynamicObject;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern")
    })
}

/// Turns raw manifest templates into concrete objects.
///
/// Templates reference values as `{{ .Image }}` and `{{ .Namespace }}`.
/// Rendering is all-or-nothing: a reference that cannot be resolved fails
/// the whole manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestRenderer {
    values: Option<RenderValues>,
}

impl ManifestRenderer {
    pub fn new(values: RenderValues) -> Self {
        Self {
            values: Some(values),
        }
    }

    /// A renderer for manifests that take no values.
    pub fn plain() -> Self {
        Self { values: None }
    }

    pub fn render(&self, path: &str, raw: &[u8]) -> Result<String> {
        let template = std::str::from_utf8(raw)
            .map_err(|e| RegistrarError::render(path, format!("manifest is not UTF-8: {}", e)))?;

        let mut unresolved: Vec<&str> = placeholder()
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|key| self.lookup(key).is_none())
            .collect();
        if !unresolved.is_empty() {
            unresolved.sort_unstable();
            unresolved.dedup();
            return Err(RegistrarError::render(
                path,
                format!("unresolved values: {}", unresolved.join(", ")),
            ));
        }

        if placeholder().replace_all(template, "").contains("{{") {
            return Err(RegistrarError::render(
                path,
                "unsupported template expression",
            ));
        }

        let rendered = placeholder().replace_all(template, |caps: &Captures| {
            self.lookup(&caps[1]).unwrap_or_default().to_string()
        });

        Ok(rendered.into_owned())
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.values.as_ref().and_then(|v| v.lookup(key))
    }

    pub fn decode(&self, path: &str, rendered: &str) -> Result<(ArtifactKind, DynamicObject)> {
        let object: DynamicObject = serde_yaml::from_str(rendered)
            .map_err(|e| RegistrarError::decode(path, e.to_string()))?;

        let types = object
            .types
            .as_ref()
            .ok_or_else(|| RegistrarError::decode(path, "missing apiVersion or kind"))?;
        let kind = ArtifactKind::from_type_meta(&types.api_version, &types.kind).ok_or_else(|| {
            RegistrarError::decode(
                path,
                format!("unsupported kind {} ({})", types.kind, types.api_version),
            )
        })?;

        if object.metadata.name.as_deref().unwrap_or_default().is_empty() {
            return Err(RegistrarError::decode(path, "metadata.name is required"));
        }

        Ok((kind, object))
    }

    /// Reads, renders and decodes one manifest.
    pub fn load(
        &self,
        assets: &dyn AssetReader,
        path: &str,
    ) -> Result<(ArtifactKind, DynamicObject)> {
        let raw = assets.read(path)?;
        let rendered = self.render(path, &raw)?;
        self.decode(path, &rendered)
    }
}
