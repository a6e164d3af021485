use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use semver::Version;

use crate::config::Config;

mod update;
mod version;
mod wallet;

pub use update::{UpdateGate, UpdatePromptSource};
pub use version::{GitHubVersionSource, VersionSource};
pub use wallet::{ensure_destination_dir, parse_private_key};

/// The version of the running binary
pub static CURRENT_VERSION: LazyLock<Version> =
    LazyLock::new(|| Version::parse(env!("CARGO_PKG_VERSION")).expect("valid crate version"));

/// Service backing the wallet and update processes
#[derive(Clone)]
pub struct EthwService {
    keystore_dir: PathBuf,
    releases: GitHubVersionSource,
}

impl EthwService {
    /// Creates a new instance of `EthwService`
    pub fn new(keystore_dir: impl Into<PathBuf>, releases: GitHubVersionSource) -> Self {
        Self {
            keystore_dir: keystore_dir.into(),
            releases,
        }
    }

    /// Creates a new instance of `EthwService` from the application configuration
    pub fn from_config(config: &Config) -> color_eyre::Result<Self> {
        Ok(Self::new(
            config.wallet.keystore_dir.clone(),
            GitHubVersionSource::new(&config.update)?,
        ))
    }

    /// Default directory where wallet files are created
    pub fn keystore_dir(&self) -> &Path {
        &self.keystore_dir
    }

    /// Source of the published releases
    pub fn releases(&self) -> &GitHubVersionSource {
        &self.releases
    }
}
