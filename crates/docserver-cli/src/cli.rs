use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use docserver_server::{ServerConfig, ServerResult};
use docserver_types::BundleId;

#[derive(Parser)]
#[command(
    name = "docserver",
    about = "Documentation server for DocC archives",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the documentation server
    Run(RunArgs),
    /// Use the documentation repository
    Repo(RepoArgs),
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[arg(long)]
    pub hostname: Option<String>,
    #[arg(short, long)]
    pub port: Option<u16>,
    /// TOML file with `hostname`, `port` and `log_level`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// The config file (or defaults) with command-line overrides applied.
    pub fn server_config(&self) -> ServerResult<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(hostname) = &self.hostname {
            config.hostname = hostname.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        Ok(config)
    }
}

#[derive(Args)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub action: RepoAction,

    #[command(flatten)]
    pub server: ServerArgs,
}

/// Where the repository server lives, and whether to start it.
#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Run a server before executing the command
    #[arg(long, global = true)]
    pub run: bool,
    #[arg(long, global = true, default_value = "127.0.0.1")]
    pub hostname: String,
    #[arg(long, global = true, default_value_t = 1234)]
    pub port: u16,
}

impl ServerArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.hostname.clone(), self.port)
    }
}

#[derive(Subcommand)]
pub enum RepoAction {
    /// Add a bundle, and a revision when an archive is given
    Add {
        /// Path to a .doccarchive directory
        archive: Option<PathBuf>,
        /// Overrides the display name read from the archive
        #[arg(long)]
        display_name: Option<String>,
        /// Overrides the bundle identifier read from the archive
        #[arg(long)]
        identifier: Option<String>,
        #[arg(long, default_value = "latest")]
        tag: String,
    },
    /// Add every .doccarchive found under a directory
    Import {
        dir: PathBuf,
        #[arg(long, default_value = "latest")]
        tag: String,
    },
    /// List bundles
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show a bundle and its revisions
    Show { id: BundleId },
    /// Remove a bundle and all of its revisions
    Remove { id: BundleId },
    /// Attach a revision to a bundle, replacing any with the same tag
    Tag {
        id: BundleId,
        tag: String,
        /// URL or local path of the revision's content
        source: String,
    },
    /// Remove a revision
    Untag { id: BundleId, tag: String },
}
