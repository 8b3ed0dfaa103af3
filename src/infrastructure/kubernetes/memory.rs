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

//! In-memory cluster store with API-server semantics for the parts the
//! installer depends on.

use crate::infrastructure::kubernetes::client::ClusterStore;
use crate::infrastructure::kubernetes::kinds::ArtifactKind;
use crate::shared::error::RegistrarError;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::core::DynamicObject;
use kube::ResourceExt;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Create,
    Replace,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub kind: ArtifactKind,
    pub name: String,
}

type ObjectKey = (ArtifactKind, String, String);

#[derive(Default)]
struct State {
    objects: BTreeMap<ObjectKey, DynamicObject>,
    calls: Vec<StoreCall>,
    failures: HashSet<(StoreOp, ArtifactKind, String)>,
    next_version: u64,
}

/// Objects are keyed by (kind, namespace, name); cluster-scoped kinds ignore
/// any namespace they are addressed with.
#[derive(Default)]
pub struct InMemoryClusterStore {
    state: Mutex<State>,
}

impl InMemoryClusterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key(kind: ArtifactKind, name: &str, namespace: Option<&str>) -> ObjectKey {
        let ns = if kind.is_namespaced() {
            namespace.unwrap_or_default().to_string()
        } else {
            String::new()
        };
        (kind, ns, name.to_string())
    }

    /// Seeds an object without recording a call.
    pub fn insert(&self, kind: ArtifactKind, mut object: DynamicObject) {
        let mut state = self.lock();
        state.next_version += 1;
        object.metadata.resource_version = Some(state.next_version.to_string());
        let key = Self::key(kind, &object.name_any(), object.namespace().as_deref());
        state.objects.insert(key, object);
    }

    pub fn contains(&self, kind: ArtifactKind, name: &str, namespace: Option<&str>) -> bool {
        self.lock()
            .objects
            .contains_key(&Self::key(kind, name, namespace))
    }

    pub fn object(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Option<DynamicObject> {
        self.lock()
            .objects
            .get(&Self::key(kind, name, namespace))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every `op` on (kind, name) fail with a transport-style error until cleared.
    pub fn inject_failure(&self, op: StoreOp, kind: ArtifactKind, name: &str) {
        self.lock().failures.insert((op, kind, name.to_string()));
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Bumps `resourceVersion` outside the caller's view, as a concurrent writer would.
    pub fn touch(&self, kind: ArtifactKind, name: &str, namespace: Option<&str>) {
        let mut state = self.lock();
        state.next_version += 1;
        let version = state.next_version.to_string();
        if let Some(obj) = state.objects.get_mut(&Self::key(kind, name, namespace)) {
            obj.metadata.resource_version = Some(version);
        }
    }

    fn record(
        state: &mut State,
        op: StoreOp,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), RegistrarError> {
        state.calls.push(StoreCall {
            op,
            kind,
            name: name.to_string(),
        });
        if state.failures.contains(&(op, kind, name.to_string())) {
            let operation = match op {
                StoreOp::Get => "get",
                StoreOp::Create => "create",
                StoreOp::Replace => "update",
                StoreOp::Delete => "delete",
            };
            return Err(RegistrarError::api(
                operation,
                kind.as_str(),
                name,
                namespace.filter(|_| kind.is_namespaced()),
                "injected failure",
            ));
        }
        Ok(())
    }
}

fn scoped(kind: ArtifactKind, namespace: Option<&str>) -> Option<&str> {
    namespace.filter(|_| kind.is_namespaced())
}

#[async_trait::async_trait]
impl ClusterStore for InMemoryClusterStore {
    async fn get(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<DynamicObject, RegistrarError> {
        let mut state = self.lock();
        Self::record(&mut state, StoreOp::Get, kind, name, namespace)?;
        state
            .objects
            .get(&Self::key(kind, name, namespace))
            .cloned()
            .ok_or_else(|| RegistrarError::not_found(kind.as_str(), name, scoped(kind, namespace)))
    }

    async fn create(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError> {
        let name = object.name_any();
        let namespace = object.namespace();
        let mut state = self.lock();
        Self::record(&mut state, StoreOp::Create, kind, &name, namespace.as_deref())?;

        if kind.is_namespaced() && namespace.is_none() {
            return Err(RegistrarError::api(
                "create",
                kind.as_str(),
                &name,
                None,
                "namespace is required for a namespaced kind",
            ));
        }

        let key = Self::key(kind, &name, namespace.as_deref());
        if state.objects.contains_key(&key) {
            return Err(RegistrarError::already_exists(
                kind.as_str(),
                &name,
                scoped(kind, namespace.as_deref()),
            ));
        }

        state.next_version += 1;
        let mut stored = object.clone();
        stored.metadata.resource_version = Some(state.next_version.to_string());
        stored.metadata.deletion_timestamp = None;
        state.objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn replace(
        &self,
        kind: ArtifactKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, RegistrarError> {
        let name = object.name_any();
        let namespace = object.namespace();
        let mut state = self.lock();
        Self::record(&mut state, StoreOp::Replace, kind, &name, namespace.as_deref())?;

        let key = Self::key(kind, &name, namespace.as_deref());
        let ns = scoped(kind, namespace.as_deref());
        let current = state
            .objects
            .get(&key)
            .ok_or_else(|| RegistrarError::not_found(kind.as_str(), &name, ns))?;

        if current.metadata.resource_version != object.metadata.resource_version {
            return Err(RegistrarError::conflict(
                kind.as_str(),
                &name,
                ns,
                "the object has been modified; please apply your changes to the latest version",
            ));
        }

        // deletionTimestamp is owned by the server
        let deletion_timestamp = current.metadata.deletion_timestamp.clone();
        let mut stored = object.clone();
        stored.metadata.deletion_timestamp = deletion_timestamp;

        if stored.metadata.deletion_timestamp.is_some() && stored.finalizers().is_empty() {
            state.objects.remove(&key);
            return Ok(stored);
        }

        state.next_version += 1;
        stored.metadata.resource_version = Some(state.next_version.to_string());
        state.objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete(
        &self,
        kind: ArtifactKind,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<(), RegistrarError> {
        let mut state = self.lock();
        Self::record(&mut state, StoreOp::Delete, kind, name, namespace)?;

        let key = Self::key(kind, name, namespace);
        let has_finalizers = match state.objects.get(&key) {
            Some(obj) => !obj.finalizers().is_empty(),
            None => {
                return Err(RegistrarError::not_found(
                    kind.as_str(),
                    name,
                    scoped(kind, namespace),
                ))
            }
        };

        if has_finalizers {
            state.next_version += 1;
            let version = state.next_version.to_string();
            if let Some(obj) = state.objects.get_mut(&key) {
                if obj.metadata.deletion_timestamp.is_none() {
                    obj.metadata.deletion_timestamp = Some(Time(chrono::Utc::now()));
                }
                obj.metadata.resource_version = Some(version);
            }
        } else {
            state.objects.remove(&key);
        }
        Ok(())
    }
}
