use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::env::{self, Environment};
use crate::provider::{BasePathProvider, Lookup, PathStyle, PersonalFolderProvider};

const USER_DIR_HELPER: &str = "xdg-user-dir";
const USER_DIRS_FILE: &str = "user-dirs.dirs";

/// Unix desktops following the XDG Base Directory and user-dirs conventions.
pub struct XdgProvider {
    env: Arc<dyn Environment>,
    user_dir_helper: Option<PathBuf>,
}

impl XdgProvider {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            user_dir_helper: Some(PathBuf::from(USER_DIR_HELPER)),
        }
    }

    /// Read `user-dirs.dirs` directly instead of asking `xdg-user-dir`.
    pub fn without_helper(mut self) -> Self {
        self.user_dir_helper = None;
        self
    }

    pub(crate) fn home(&self) -> Lookup<PathBuf> {
        env::home_dir(self.env.as_ref(), "HOME")
    }

    fn home_or(&self, var: &str, default: &str) -> Lookup<PathBuf> {
        match self.env.var_path(var) {
            Some(dir) => Ok(dir),
            None => Ok(self.home()?.join(default)),
        }
    }

    /// Returns $XDG_CONFIG_HOME or $HOME/.config
    pub(crate) fn config_home(&self) -> Lookup<PathBuf> {
        self.home_or("XDG_CONFIG_HOME", ".config")
    }

    /// Returns $XDG_STATE_HOME or $HOME/.local/state
    pub(crate) fn state_home(&self) -> Lookup<PathBuf> {
        self.home_or("XDG_STATE_HOME", ".local/state")
    }

    /// Returns $XDG_CACHE_HOME or $HOME/.cache
    pub(crate) fn cache_home(&self) -> Lookup<PathBuf> {
        self.home_or("XDG_CACHE_HOME", ".cache")
    }

    /// Looks up one of the user-dirs.dirs entries, e.g. `DESKTOP`.
    ///
    /// Unset entries and entries pointing at the home directory itself are
    /// reported as absent.
    fn user_dir(&self, key: &str) -> Lookup<Option<PathBuf>> {
        let home = self.home()?;

        let dir = match self.query_helper(key, &home) {
            Some(dir) => Some(dir),
            None => self.read_user_dirs_file(key, &home)?,
        };

        Ok(dir.filter(|dir| !dir.as_os_str().is_empty() && dir != &home))
    }

    /// `xdg-user-dir <key>`, run with the same `HOME` and `XDG_CONFIG_HOME`
    /// the file fallback would use.
    fn helper_command(&self, helper: &Path, key: &str, home: &Path) -> Command {
        let mut command = Command::new(helper);
        command.arg(key).env("HOME", home);
        match self.env.var_path("XDG_CONFIG_HOME") {
            Some(config_home) => command.env("XDG_CONFIG_HOME", config_home),
            None => command.env_remove("XDG_CONFIG_HOME"),
        };
        command
    }

    fn query_helper(&self, key: &str, home: &Path) -> Option<PathBuf> {
        let helper = self.user_dir_helper.as_ref()?;
        let output = match self.helper_command(helper, key, home).output() {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to run {:?}: {}", helper, e);
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                "{:?} {} failed: {}",
                helper,
                key,
                String::from_utf8_lossy(&output.stderr)
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Some(PathBuf::from(stdout.trim_end_matches('\n')))
    }

    fn read_user_dirs_file(&self, key: &str, home: &Path) -> Lookup<Option<PathBuf>> {
        let path = self.config_home()?.join(USER_DIRS_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} does not exist", path);
                return Ok(None);
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read {:?}", path))
                    .into())
            }
        };

        Ok(parse_user_dirs(&content, key, home))
    }
}

/// Extracts `XDG_<key>_DIR` from the contents of a user-dirs.dirs file.
///
/// Values are either absolute or start with `$HOME/`; the last assignment
/// wins, as when the file is sourced by a shell.
fn parse_user_dirs(content: &str, key: &str, home: &Path) -> Option<PathBuf> {
    let name = format!("XDG_{}_DIR", key);
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(var, _)| var.trim() == name)
        .last()
        .map(|(_, value)| {
            let value = value.trim().trim_matches('"');
            match value.strip_prefix("$HOME") {
                Some(rest) => crate::path::join(home, rest),
                None => PathBuf::from(value),
            }
        })
}

impl PathStyle for XdgProvider {
    fn separator(&self) -> char {
        '/'
    }
}

impl BasePathProvider for XdgProvider {
    fn config_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/etc"))
    }

    fn config_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.config_home()
    }

    fn state_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/var/lib"))
    }

    fn state_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.state_home()
    }

    fn cache_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/var/cache"))
    }

    fn cache_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.cache_home()
    }

    fn subdir_override<'a>(&self, config: &'a AppConfig) -> &'a str {
        &config.subdir_unix
    }
}

impl PersonalFolderProvider for XdgProvider {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("DESKTOP")
    }

    fn downloads_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("DOWNLOAD")
    }

    fn documents_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("DOCUMENTS")
    }

    fn pictures_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("PICTURES")
    }

    fn videos_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("VIDEOS")
    }

    fn music_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("MUSIC")
    }

    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>> {
        let home = self.home()?;
        let home_fonts = home.join(".local/share/fonts");

        let mut dirs = Vec::new();
        if let Some(data_home) = self.env.var_path("XDG_DATA_HOME") {
            let data_fonts = data_home.join("fonts");
            // Avoid listing ~/.local/share/fonts twice
            if data_fonts != home_fonts {
                dirs.push(data_fonts);
            }
        }
        dirs.extend([
            home_fonts,
            home.join(".fonts"),
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ]);
        Ok(dirs)
    }

    fn templates_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("TEMPLATES")
    }

    fn public_share_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_dir("PUBLICSHARE")
    }
}
