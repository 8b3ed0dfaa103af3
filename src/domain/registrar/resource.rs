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

use crate::infrastructure::constants::REGISTRAR_FINALIZER;
use kube::{CustomResource, Resource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired installation of the cluster-registration stack.
///
/// `spec` carries no fields: the presence of the object requests the
/// install, its deletion requests the teardown.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "singapore.open-cluster-management.io",
    version = "v1alpha1",
    kind = "ClusterRegistrar",
    plural = "clusterregistrars",
    namespaced
)]
pub struct ClusterRegistrarSpec {}

pub fn has_finalizer<K: Resource>(obj: &K) -> bool {
    obj.finalizers().iter().any(|f| f == REGISTRAR_FINALIZER)
}

/// Returns true if the token was added.
pub fn add_finalizer<K: Resource>(obj: &mut K) -> bool {
    if has_finalizer(obj) {
        return false;
    }
    obj.finalizers_mut().push(REGISTRAR_FINALIZER.to_string());
    true
}

/// Returns true if the token was present.
pub fn remove_finalizer<K: Resource>(obj: &mut K) -> bool {
    let finalizers = obj.finalizers_mut();
    let before = finalizers.len();
    finalizers.retain(|f| f != REGISTRAR_FINALIZER);
    finalizers.len() != before
}

pub fn is_deleting<K: Resource>(obj: &K) -> bool {
    obj.meta().deletion_timestamp.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    #[test]
    fn test_crd_identity() {
        let crd = ClusterRegistrar::crd();
        assert_eq!(
            crd.metadata.name.as_deref(),
            Some("clusterregistrars.singapore.open-cluster-management.io")
        );
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn test_finalizer_add_remove_keeps_foreign_tokens() {
        let mut reg = ClusterRegistrar::new("reg1", ClusterRegistrarSpec::default());
        reg.finalizers_mut().push("other.io/keep".to_string());

        assert!(add_finalizer(&mut reg));
        assert!(!add_finalizer(&mut reg));
        assert_eq!(reg.finalizers().len(), 2);

        assert!(remove_finalizer(&mut reg));
        assert!(!remove_finalizer(&mut reg));
        assert_eq!(reg.finalizers(), &["other.io/keep".to_string()]);
    }
}
