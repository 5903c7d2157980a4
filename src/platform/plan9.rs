use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::env::{self, Environment};
use crate::error::{LookupError, USER_DIRS_UNSUPPORTED};
use crate::provider::{BasePathProvider, Lookup, PathStyle, PersonalFolderProvider};

/// Plan 9 keeps everything under `lib`, both in `/` and in `$home`.
/// It has no notion of personal folders.
pub struct Plan9Provider {
    env: Arc<dyn Environment>,
}

impl Plan9Provider {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env }
    }

    fn home_lib(&self, dir: &str) -> Lookup<PathBuf> {
        Ok(env::home_dir(self.env.as_ref(), "home")?.join(dir))
    }
}

fn unsupported<T>() -> Lookup<T> {
    Err(LookupError::Unsupported(USER_DIRS_UNSUPPORTED))
}

impl PathStyle for Plan9Provider {
    fn separator(&self) -> char {
        '/'
    }
}

impl BasePathProvider for Plan9Provider {
    fn config_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/lib"))
    }

    fn config_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.home_lib("lib")
    }

    fn state_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/lib"))
    }

    fn state_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.home_lib("lib")
    }

    fn cache_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        Ok(PathBuf::from("/lib/cache"))
    }

    fn cache_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.home_lib("lib/cache")
    }

    fn subdir_override<'a>(&self, config: &'a AppConfig) -> &'a str {
        &config.subdir_plan9
    }
}

impl PersonalFolderProvider for Plan9Provider {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn downloads_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn documents_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn pictures_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn videos_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn music_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>> {
        unsupported()
    }

    fn templates_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }

    fn public_share_dir(&self) -> Lookup<Option<PathBuf>> {
        unsupported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::MapEnv;
    use crate::resolver::resolve_app_dirs;
    use crate::user::resolve_user_dirs;

    fn provider() -> Plan9Provider {
        Plan9Provider::new(MapEnv::new().var("home", "/usr/glenda").shared())
    }

    fn config() -> AppConfig {
        AppConfig::new("foo/bar")
            .with_state_suffix("state")
            .with_cache_suffix("cache")
    }

    #[test]
    fn app_dirs() {
        let d = resolve_app_dirs(&provider(), true, &config()).unwrap();
        assert_eq!(d.config_dir, PathBuf::from("/lib/foo/bar"));
        assert_eq!(d.state_dir, PathBuf::from("/lib/foo/bar/state"));
        assert_eq!(d.cache_dir, PathBuf::from("/lib/cache/foo/bar"));

        let d = resolve_app_dirs(&provider(), false, &config()).unwrap();
        assert_eq!(d.config_dir, PathBuf::from("/usr/glenda/lib/foo/bar"));
        assert_eq!(d.state_dir, PathBuf::from("/usr/glenda/lib/foo/bar/state"));
        assert_eq!(d.cache_dir, PathBuf::from("/usr/glenda/lib/cache/foo/bar"));
    }

    #[test]
    fn subdir_plan9_overrides() {
        let mut config = config();
        config.subdir_plan9 = "zoo/zar".into();

        let d = resolve_app_dirs(&provider(), true, &config).unwrap();
        assert_eq!(d.config_dir, PathBuf::from("/lib/zoo/zar"));
        assert_eq!(d.state_dir, PathBuf::from("/lib/zoo/zar/state"));
        assert_eq!(d.cache_dir, PathBuf::from("/lib/cache/zoo/zar"));

        let d = resolve_app_dirs(&provider(), false, &config).unwrap();
        assert_eq!(d.config_dir, PathBuf::from("/usr/glenda/lib/zoo/zar"));
        assert_eq!(d.cache_dir, PathBuf::from("/usr/glenda/lib/cache/zoo/zar"));
    }

    #[test]
    fn uppercase_home_is_not_used() {
        let p = Plan9Provider::new(MapEnv::new().var("HOME", "/usr/glenda").shared());
        assert!(resolve_app_dirs(&p, false, &config()).is_err());
    }

    #[test]
    fn no_user_dirs() {
        let err = resolve_user_dirs(&provider()).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "finddirs: RetrieveUserDirs doesn't support this operating system"
        );
    }
}
