use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use kontext_config::AppConfig;
use kontext_core::{ContextConfig, ContextManager, KubeClusterApi, KubeconfigStore, ScanType};

use crate::render;

/// Manage Kubernetes contexts in a kubeconfig file
#[derive(Parser, Debug)]
#[command(name = "kontext", version, about, long_about = None)]
pub struct Cli {
    /// Kubeconfig to edit (default: $KUBECONFIG, then ~/.kube/config)
    #[arg(long, global = true, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Configuration file (default: <config dir>/kontext/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verify cluster TLS certificates when probing and in created clusters
    #[arg(long, global = true)]
    pub verify_tls: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a context from a server URL and bearer token
    Add(AddArgs),
    /// List contexts and unreferenced clusters and users
    List,
    /// Import the token-based contexts of another kubeconfig
    Merge(MergeArgs),
    /// Delete contexts by name or `prefix*`
    Delete(DeleteArgs),
    /// Remove broken or unreachable contexts and unreferenced entries
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name used for the context, cluster and user
    #[arg(long)]
    pub name: String,
    /// API server URL
    #[arg(long, visible_alias = "host")]
    pub server: String,
    /// Bearer token
    #[arg(long)]
    pub token: String,
    /// Also add the sub-clusters managed by this server (supported: alauda)
    #[arg(long, value_name = "TYPE")]
    pub scan: Option<String>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Kubeconfig file to import
    #[arg(long)]
    pub path: PathBuf,
    /// Prefix for imported names (default: the file name without extension)
    #[arg(long)]
    pub name: Option<String>,
    /// Also add the sub-clusters managed by each imported server
    #[arg(long, value_name = "TYPE")]
    pub scan: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Context name, or a prefix followed by `*`
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Only check references; do not contact clusters
    #[arg(long)]
    pub offline: bool,
}

impl Cli {
    /// Filter directive used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    fn load_config(&self) -> anyhow::Result<AppConfig> {
        match &self.config {
            Some(path) => {
                AppConfig::load_from(path).with_context(|| format!("failed to load config from {}", path.display()))
            }
            None => Ok(AppConfig::load()),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let insecure = config.cluster.insecure_skip_tls_verify && !self.verify_tls;

        let explicit = self.kubeconfig.as_deref().or(config.general.kubeconfig.as_deref());
        let store = KubeconfigStore::discover(explicit)?.with_backup_retention(config.backup_retention());
        tracing::debug!("Using kubeconfig {}", store.path().display());

        let api = KubeClusterApi::new(config.cluster.timeout(), insecure);
        let manager = ContextManager::new(store, api).insecure_skip_tls_verify(insecure);

        match self.command {
            Commands::Add(args) => {
                let scan = args.scan.as_deref().map(ScanType::from);
                let context = ContextConfig::new(args.name, args.server, args.token);
                let report = manager.add(context, scan.as_ref()).await.context("failed to add context")?;
                print!("{}", render::batch(&report));
            }
            Commands::List => {
                let listing = manager.list().context("failed to list contexts")?;
                print!("{}", render::listing(&listing));
            }
            Commands::Merge(args) => {
                let scan = args.scan.as_deref().map(ScanType::from);
                let report = manager
                    .merge(&args.path, args.name.as_deref(), scan.as_ref())
                    .await
                    .context("failed to merge kubeconfig")?;
                print!("{}", render::merge(&report));
            }
            Commands::Delete(args) => {
                let report =
                    manager.delete(&args.name).with_context(|| format!("failed to delete context {:?}", args.name))?;
                print!("{}", render::cleanup("Delete", &report));
            }
            Commands::Clean(args) => {
                let report = manager.clean(!args.offline).await.context("failed to clean contexts")?;
                print!("{}", render::clean(&report));
            }
        }
        Ok(())
    }
}
