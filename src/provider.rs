//! Contracts between the resolvers and the per-platform lookups.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::LookupError;

pub type Lookup<T> = std::result::Result<T, LookupError>;

/// How a provider spells its paths.
pub trait PathStyle {
    /// Separator used in the paths the provider returns; rewritten to `/`
    /// before results reach the caller.
    fn separator(&self) -> char {
        std::path::MAIN_SEPARATOR
    }
}

/// Base directories for application data on one platform.
///
/// Every primitive returns the directory *before* the application subdirectory
/// is appended. The config is passed so a platform can honour its own options
/// (e.g. `use_roaming` on Windows).
pub trait BasePathProvider: PathStyle + Send + Sync {
    fn config_dir_system(&self, config: &AppConfig) -> Lookup<PathBuf>;
    fn config_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf>;
    fn state_dir_system(&self, config: &AppConfig) -> Lookup<PathBuf>;
    fn state_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf>;
    fn cache_dir_system(&self, config: &AppConfig) -> Lookup<PathBuf>;
    fn cache_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf>;

    /// Platform-specific replacement for `config.subdir`. An empty override
    /// leaves `config.subdir` in effect.
    fn subdir_override<'a>(&self, _config: &'a AppConfig) -> &'a str {
        ""
    }
}

/// Standard personal folders of the current user.
///
/// `None` means the platform or the user's setup has no such folder.
pub trait PersonalFolderProvider: PathStyle + Send + Sync {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>>;
    fn downloads_dir(&self) -> Lookup<Option<PathBuf>>;
    fn documents_dir(&self) -> Lookup<Option<PathBuf>>;
    fn pictures_dir(&self) -> Lookup<Option<PathBuf>>;
    fn videos_dir(&self) -> Lookup<Option<PathBuf>>;
    fn music_dir(&self) -> Lookup<Option<PathBuf>>;
    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>>;
    fn templates_dir(&self) -> Lookup<Option<PathBuf>>;
    fn public_share_dir(&self) -> Lookup<Option<PathBuf>>;
}

/// Everything one platform provides.
pub trait PlatformDirs: BasePathProvider + PersonalFolderProvider {
    fn as_base_paths(&self) -> &dyn BasePathProvider;
    fn as_personal_folders(&self) -> &dyn PersonalFolderProvider;
}

impl<T: BasePathProvider + PersonalFolderProvider> PlatformDirs for T {
    fn as_base_paths(&self) -> &dyn BasePathProvider {
        self
    }

    fn as_personal_folders(&self) -> &dyn PersonalFolderProvider {
        self
    }
}
