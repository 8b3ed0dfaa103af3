// CLI command definitions

use super::k8s::{CrdCommand, PlanCommand, RunCommand, StatusCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "cluster-registrar",
    version,
    about = "Installer operator for the cluster-registration stack",
    long_about = "Watches ClusterRegistrar resources and installs or tears down the cluster-registration operator and its webhook"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Install CRDs and run the controllers until shutdown
    Run(RunCommand),

    /// Print the install batches and teardown order
    Plan(PlanCommand),

    /// Show which managed artifacts exist in the cluster
    Status(StatusCommand),

    /// Print the ClusterRegistrar CRD as YAML
    Crd(CrdCommand),
}
