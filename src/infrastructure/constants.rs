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

/// Finalizer token guarding teardown of a ClusterRegistrar
pub const REGISTRAR_FINALIZER: &str =
    "singapore.open-cluster-management.io/clusterregistrar-cleanup";

/// ClusterRegistrar API group
pub const REGISTRAR_GROUP: &str = "singapore.open-cluster-management.io";
pub const REGISTRAR_VERSION: &str = "v1alpha1";

/// Controller identity environment
pub const ENV_POD_NAME: &str = "POD_NAME";
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";

/// Server-side field manager
pub const FIELD_MANAGER: &str = "cluster-registrar";

/// Fallback config file location when `--config` is not given.
pub const ENV_CONF_FILE: &str = "CLUSTER_REGISTRAR_CONF_FILE";

/// Controller timings
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 30;
pub const DEFAULT_RECONCILE_TIMEOUT_SECS: u64 = 120;

/// CRD establishment polling
pub const DEFAULT_CRD_WAIT_ATTEMPTS: usize = 10;
pub const DEFAULT_CRD_WAIT_MIN_DELAY_MS: u64 = 500;
pub const DEFAULT_CRD_WAIT_MAX_DELAY_MS: u64 = 10_000;

/// Manager artifacts
pub const MANAGER_DEPLOYMENT: &str = "cluster-registration-operator-manager";
pub const MANAGER_SERVICE_ACCOUNT: &str = "cluster-registration-operator-manager";
pub const MANAGER_LEADER_ELECTION_ROLE: &str = "leader-election-operator-role";
pub const MANAGER_LEADER_ELECTION_ROLE_BINDING: &str =
    "cluster-registration-operator-leader-election-rolebinding";
pub const MANAGER_CLUSTER_ROLE: &str = "cluster-registration-operator-manager-role";
pub const MANAGER_CLUSTER_ROLE_BINDING: &str = "cluster-registration-operator-manager-rolebinding";

/// Webhook artifacts share one name across kinds
pub const WEBHOOK_NAME: &str = "cluster-registration-webhook-service";
pub const WEBHOOK_API_SERVICE: &str = "v1alpha1.admission.singapore.open-cluster-management.io";

/// Manifest paths in the artifact store
pub const MANIFEST_MANAGER_SERVICE_ACCOUNT: &str =
    "cluster-registration-operator/service_account.yaml";
pub const MANIFEST_MANAGER_LEADER_ELECTION_ROLE: &str =
    "cluster-registration-operator/leader_election_role.yaml";
pub const MANIFEST_MANAGER_LEADER_ELECTION_ROLE_BINDING: &str =
    "cluster-registration-operator/leader_election_role_binding.yaml";
pub const MANIFEST_MANAGER_CLUSTER_ROLE: &str = "cluster-registration-operator/clusterrole.yaml";
pub const MANIFEST_MANAGER_CLUSTER_ROLE_BINDING: &str =
    "cluster-registration-operator/clusterrole_binding.yaml";
pub const MANIFEST_MANAGER_DEPLOYMENT: &str = "cluster-registration-operator/manager.yaml";

pub const MANIFEST_WEBHOOK_SERVICE_ACCOUNT: &str = "webhook/service_account.yaml";
pub const MANIFEST_WEBHOOK_CLUSTER_ROLE: &str = "webhook/webhook_clusterrole.yaml";
pub const MANIFEST_WEBHOOK_CLUSTER_ROLE_BINDING: &str = "webhook/webhook_clusterrolebinding.yaml";
pub const MANIFEST_WEBHOOK_SERVICE: &str = "webhook/webhook_service.yaml";
pub const MANIFEST_WEBHOOK_DEPLOYMENT: &str = "webhook/webhook.yaml";
pub const MANIFEST_WEBHOOK_VALIDATING_CONFIG: &str = "webhook/webhook_validating_config.yaml";
pub const MANIFEST_WEBHOOK_API_SERVICE: &str = "webhook/webhook_apiservice.yaml";

pub const MANIFEST_CRD_CLUSTER_REGISTRARS: &str =
    "crd/singapore.open-cluster-management.io_clusterregistrars.yaml";
pub const MANIFEST_CRD_REGISTERED_CLUSTERS: &str =
    "crd/singapore.open-cluster-management.io_registeredclusters.yaml";
pub const MANIFEST_CRD_HUB_CONFIGS: &str =
    "crd/singapore.open-cluster-management.io_hubconfigs.yaml";

/// Externally managed cluster objects watched by the stub controller
pub const MANAGED_CLUSTER_GROUP: &str = "cluster.open-cluster-management.io";
pub const MANAGED_CLUSTER_VERSION: &str = "v1";
pub const MANAGED_CLUSTER_KIND: &str = "ManagedCluster";
pub const MANAGED_CLUSTER_PLURAL: &str = "managedclusters";
