use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kube-image-inventory")]
#[command(about = "Collects running container images and forwards them to an inventory endpoint")]
#[command(version)]
pub struct Cli {
    /// Platform to collect container images from
    #[arg(short, long, value_enum)]
    pub platform: Platform,

    /// YAML config file with endpoint, TLS and account settings
    #[arg(short, long, env = "KUBE_IMAGE_INVENTORY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    /// Kubernetes, using the local kubeconfig or in-cluster service account
    K8s,
}
