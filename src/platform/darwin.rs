use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::env::{self, Environment};
use crate::error::{LookupError, IOS_SYSTEM_DIRS_UNSUPPORTED};
use crate::provider::{BasePathProvider, Lookup, PathStyle, PersonalFolderProvider};

const APPLICATION_SUPPORT: &str = "Library/Application Support";
const CACHES: &str = "Library/Caches";

/// macOS, and iOS where apps are sandboxed and have no system-wide storage.
pub struct DarwinProvider {
    env: Arc<dyn Environment>,
    ios: bool,
}

impl DarwinProvider {
    pub fn macos(env: Arc<dyn Environment>) -> Self {
        Self { env, ios: false }
    }

    pub fn ios(env: Arc<dyn Environment>) -> Self {
        Self { env, ios: true }
    }

    fn home(&self) -> Lookup<PathBuf> {
        env::home_dir(self.env.as_ref(), "HOME")
    }

    fn in_home(&self, dir: &str) -> Lookup<Option<PathBuf>> {
        Ok(Some(self.home()?.join(dir)))
    }

    fn system(&self, dir: &str) -> Lookup<PathBuf> {
        if self.ios {
            return Err(LookupError::Unsupported(IOS_SYSTEM_DIRS_UNSUPPORTED));
        }
        Ok(PathBuf::from("/").join(dir))
    }
}

impl PathStyle for DarwinProvider {
    fn separator(&self) -> char {
        '/'
    }
}

impl BasePathProvider for DarwinProvider {
    fn config_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.system(APPLICATION_SUPPORT)
    }

    fn config_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.home()?.join(APPLICATION_SUPPORT))
    }

    fn state_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.system(APPLICATION_SUPPORT)
    }

    fn state_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.home()?.join(APPLICATION_SUPPORT))
    }

    fn cache_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.system(CACHES)
    }

    fn cache_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(self.home()?.join(CACHES))
    }

    fn subdir_override<'a>(&self, config: &'a AppConfig) -> &'a str {
        &config.subdir_darwin_ios
    }
}

impl PersonalFolderProvider for DarwinProvider {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Desktop")
    }

    fn downloads_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Downloads")
    }

    fn documents_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Documents")
    }

    fn pictures_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Pictures")
    }

    fn videos_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Movies")
    }

    fn music_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Music")
    }

    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>> {
        Ok(vec![
            self.home()?.join("Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Network/Library/Fonts"),
        ])
    }

    fn templates_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Templates")
    }

    fn public_share_dir(&self) -> Lookup<Option<PathBuf>> {
        self.in_home("Public")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::MapEnv;
    use crate::resolver::resolve_app_dirs;

    fn env() -> Arc<dyn Environment> {
        MapEnv::new().var("HOME", "/Users/alice").shared()
    }

    fn config() -> AppConfig {
        AppConfig::new("foo/bar")
            .with_state_suffix("state")
            .with_cache_suffix("cache")
    }

    #[test]
    fn macos_system_dirs() {
        let d = resolve_app_dirs(&DarwinProvider::macos(env()), true, &config()).unwrap();

        assert_eq!(d.config_dir, PathBuf::from("/Library/Application Support/foo/bar"));
        assert_eq!(
            d.state_dir,
            PathBuf::from("/Library/Application Support/foo/bar/state")
        );
        assert_eq!(d.cache_dir, PathBuf::from("/Library/Caches/foo/bar"));
    }

    #[test]
    fn macos_local_dirs() {
        let d = resolve_app_dirs(&DarwinProvider::macos(env()), false, &config()).unwrap();

        assert_eq!(
            d.config_dir,
            PathBuf::from("/Users/alice/Library/Application Support/foo/bar")
        );
        assert_eq!(
            d.state_dir,
            PathBuf::from("/Users/alice/Library/Application Support/foo/bar/state")
        );
        assert_eq!(d.cache_dir, PathBuf::from("/Users/alice/Library/Caches/foo/bar"));
    }

    #[test]
    fn ios_has_no_system_dirs() {
        let err = resolve_app_dirs(&DarwinProvider::ios(env()), true, &config()).unwrap_err();
        assert!(err.is_unsupported());
        assert!(err
            .to_string()
            .starts_with("finddirs: cannot get system-wide app directories"));

        assert!(resolve_app_dirs(&DarwinProvider::ios(env()), false, &config()).is_ok());
    }

    #[test]
    fn personal_folders() {
        let p = DarwinProvider::macos(env());

        assert_eq!(p.desktop_dir().unwrap(), Some(PathBuf::from("/Users/alice/Desktop")));
        assert_eq!(p.videos_dir().unwrap(), Some(PathBuf::from("/Users/alice/Movies")));
        assert_eq!(p.public_share_dir().unwrap(), Some(PathBuf::from("/Users/alice/Public")));
        assert_eq!(
            p.fonts_dirs().unwrap(),
            vec![
                PathBuf::from("/Users/alice/Library/Fonts"),
                PathBuf::from("/Library/Fonts"),
                PathBuf::from("/System/Library/Fonts"),
                PathBuf::from("/Network/Library/Fonts"),
            ]
        );
    }
}
