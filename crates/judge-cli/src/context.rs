//! Repository root, configuration and judge connection for a run

use std::path::Path;

use judge_client::{Credentials, OmegaUpClient};
use judge_core::SyncConfig;
use judge_fs::NormalizedPath;

use crate::cli::RemoteArgs;
use crate::error::Result;

/// Where a command runs and with which settings
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: NormalizedPath,
    pub config: SyncConfig,
}

impl Workspace {
    /// Use `repo` as the root when given, otherwise the enclosing git
    /// working tree of `cwd`.
    pub fn open(repo: Option<&Path>, cwd: &Path) -> Result<Self> {
        let root = match repo {
            Some(repo) => NormalizedPath::canonicalize(repo)?,
            None => judge_git::repository_root(cwd)?,
        };
        let config = SyncConfig::load(&root)?;
        tracing::debug!(root = %root.as_str(), "Opened workspace");
        Ok(Self { root, config })
    }

    /// Judge URL: flag or environment, else the config file value.
    pub fn remote_url<'a>(&'a self, remote: &'a RemoteArgs) -> &'a str {
        remote
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.config.remote.url)
    }

    /// Authenticate against the judge.
    pub fn connect(&self, remote: &RemoteArgs) -> Result<OmegaUpClient> {
        let credentials = Credentials::resolve(
            remote.api_token.as_deref(),
            remote.username.as_deref(),
            remote.password.as_deref(),
        )?;
        let url = self.remote_url(remote);
        tracing::info!(url = %url, "Connecting to judge");
        Ok(OmegaUpClient::connect(url, credentials)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_repo_skips_git_discovery() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::open(Some(dir.path()), Path::new("/")).unwrap();
        assert_eq!(workspace.config, SyncConfig::default());
    }

    #[test]
    fn url_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("judge-sync.toml"),
            "[remote]\nurl = \"https://judge.example\"\n",
        )
        .unwrap();
        let workspace = Workspace::open(Some(dir.path()), dir.path()).unwrap();

        assert_eq!(
            workspace.remote_url(&RemoteArgs::default()),
            "https://judge.example"
        );
        let flag = RemoteArgs {
            url: Some("http://localhost:8001".into()),
            ..Default::default()
        };
        assert_eq!(workspace.remote_url(&flag), "http://localhost:8001");
    }

    #[test]
    fn missing_credentials_are_reported() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::open(Some(dir.path()), dir.path()).unwrap();
        assert!(workspace.connect(&RemoteArgs::default()).is_err());
    }
}
