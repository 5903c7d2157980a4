use anyhow::Context;
use log::debug;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use super::XdgProvider;
use crate::config::AppConfig;
use crate::env::Environment;
use crate::provider::{BasePathProvider, Lookup, PathStyle, PersonalFolderProvider};

const DEFAULT_PREFIX: &str = "/data/data/com.termux/files/usr";

/// Termux on Android.
///
/// Per-user directories follow XDG under the Termux home; system-wide ones
/// live under `$PREFIX`. Personal folders come from the `~/storage` links
/// created by `termux-setup-storage`.
pub struct TermuxProvider {
    env: Arc<dyn Environment>,
    xdg: XdgProvider,
}

impl TermuxProvider {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            xdg: XdgProvider::new(env.clone()).without_helper(),
            env,
        }
    }

    fn prefix(&self) -> PathBuf {
        self.env
            .var_path("PREFIX")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFIX))
    }

    /// Resolves `~/storage/<name>`; absent when storage access was never set up.
    fn storage_link(&self, name: &str) -> Lookup<Option<PathBuf>> {
        let link = self.xdg.home()?.join("storage").join(name);
        match std::fs::read_link(&link) {
            Ok(target) if target.is_relative() => Ok(link.parent().map(|dir| dir.join(&target))),
            Ok(target) => Ok(Some(target)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} does not exist, storage not set up", link);
                Ok(None)
            }
            // A plain directory instead of a link
            Err(e) if e.kind() == ErrorKind::InvalidInput => Ok(Some(link)),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read storage link {:?}", link))
                .into()),
        }
    }
}

impl PathStyle for TermuxProvider {
    fn separator(&self) -> char {
        '/'
    }
}

impl BasePathProvider for TermuxProvider {
    fn config_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.prefix().join("etc"))
    }

    fn config_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf> {
        self.xdg.config_dir_local(config)
    }

    fn state_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.prefix().join("var/lib"))
    }

    fn state_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf> {
        self.xdg.state_dir_local(config)
    }

    fn cache_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.prefix().join("var/cache"))
    }

    fn cache_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf> {
        self.xdg.cache_dir_local(config)
    }

    fn subdir_override<'a>(&self, config: &'a AppConfig) -> &'a str {
        &config.subdir_unix
    }
}

impl PersonalFolderProvider for TermuxProvider {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>> {
        Ok(None)
    }

    fn downloads_dir(&self) -> Lookup<Option<PathBuf>> {
        self.storage_link("downloads")
    }

    fn documents_dir(&self) -> Lookup<Option<PathBuf>> {
        let shared = self
            .storage_link("shared")
            .context("Failed to locate shared storage")?;
        Ok(shared.map(|dir| dir.join("Documents")))
    }

    fn pictures_dir(&self) -> Lookup<Option<PathBuf>> {
        self.storage_link("pictures")
    }

    fn videos_dir(&self) -> Lookup<Option<PathBuf>> {
        self.storage_link("movies")
    }

    fn music_dir(&self) -> Lookup<Option<PathBuf>> {
        self.storage_link("music")
    }

    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>> {
        Ok(vec![
            self.prefix().join("share/fonts"),
            self.xdg.home()?.join(".local/share/fonts"),
        ])
    }

    fn templates_dir(&self) -> Lookup<Option<PathBuf>> {
        Ok(None)
    }

    fn public_share_dir(&self) -> Lookup<Option<PathBuf>> {
        Ok(None)
    }
}
