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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, RegistrarError>;

fn scope(namespace: &Option<String>) -> String {
    match namespace {
        Some(ns) => format!(" in namespace '{}'", ns),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Kubernetes API error during {operation} of {resource_type} '{name}'{}: {message}", scope(.namespace))]
    Api {
        operation: &'static str,
        resource_type: String,
        name: String,
        namespace: Option<String>,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Required environment variable {0} is not set")]
    MissingEnv(String),

    #[error("Resource not found: {resource_type} '{name}'{}", scope(.namespace))]
    NotFound {
        resource_type: String,
        name: String,
        namespace: Option<String>,
    },

    #[error("Resource already exists: {resource_type} '{name}'{}", scope(.namespace))]
    AlreadyExists {
        resource_type: String,
        name: String,
        namespace: Option<String>,
    },

    #[error("Conflicting write to {resource_type} '{name}'{}: {message}", scope(.namespace))]
    Conflict {
        resource_type: String,
        name: String,
        namespace: Option<String>,
        message: String,
    },

    #[error("Manifest not found in artifact store: {0}")]
    AssetNotFound(String),

    #[error("Failed to render manifest {path}: {message}")]
    Render { path: String, message: String },

    #[error("Failed to decode manifest {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl RegistrarError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn already_exists(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
    ) -> Self {
        Self::AlreadyExists {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }
    }

    pub fn conflict(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn api(
        operation: &'static str,
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            operation,
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn render(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classifies a client error for one operation on one object.
    ///
    /// The API server answers both a duplicate create and a stale update with
    /// 409; the `reason` field tells them apart.
    pub fn from_kube(
        err: kube::Error,
        operation: &'static str,
        resource_type: &str,
        name: &str,
        namespace: Option<&str>,
    ) -> Self {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => {
                Self::not_found(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 409 && ae.reason == "AlreadyExists" => {
                Self::already_exists(resource_type, name, namespace)
            }
            kube::Error::Api(ae) if ae.code == 409 => {
                Self::conflict(resource_type, name, namespace, ae.message)
            }
            other => Self::api(operation, resource_type, name, namespace, other.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Short stable label for log fields.
    pub fn class(&self) -> &'static str {
        match self {
            Self::KubeError(_) | Self::Api { .. } => "api",
            Self::ConfigError(_) | Self::MissingEnv(_) => "config",
            Self::NotFound { .. } => "not_found",
            Self::AlreadyExists { .. } => "already_exists",
            Self::Conflict { .. } => "conflict",
            Self::AssetNotFound(_) => "asset",
            Self::Render { .. } => "render",
            Self::Decode { .. } => "decode",
            Self::Timeout(_) => "timeout",
            Self::InvalidResource(_) => "invalid_resource",
            Self::Io(_) => "io",
            Self::TomlParse(_) => "config",
        }
    }
}
