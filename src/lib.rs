//! Platform-appropriate locations for application config, state and cache
//! data, and for the user's personal folders.
//!
//! ```no_run
//! use finddirs::{AppConfig, Finder};
//!
//! let finder = Finder::detect();
//! let config = AppConfig::new("acme/app")
//!     .with_state_suffix("state")
//!     .with_cache_suffix("cache");
//! let dirs = finder.app_dirs(false, &config)?;
//! println!("config files go to {}", dirs.config_dir.display());
//! # Ok::<(), finddirs::Error>(())
//! ```

use std::sync::Arc;

pub mod config;
pub mod env;
pub mod error;
mod path;
pub mod platform;
pub mod provider;
pub mod resolver;
pub mod user;

pub use config::AppConfig;
pub use env::{Environment, ProcessEnv};
pub use error::{Error, LookupError, Result};
pub use platform::Platform;
pub use provider::{BasePathProvider, PathStyle, PersonalFolderProvider, PlatformDirs};
pub use resolver::{resolve_app_dirs, AppDirs};
pub use user::{resolve_user_dirs, UserDirs};

/// A platform's provider, chosen once and reused for every lookup.
pub struct Finder {
    platform: Platform,
    provider: Box<dyn PlatformDirs>,
}

impl Finder {
    pub fn new(platform: Platform, env: Arc<dyn Environment>) -> Self {
        Self {
            platform,
            provider: platform.provider(env),
        }
    }

    /// Detects the running platform from the build target and process
    /// environment.
    pub fn detect() -> Self {
        let env: Arc<dyn Environment> = Arc::new(ProcessEnv);
        let platform = Platform::detect(env.as_ref());
        log::debug!("Detected platform: {}", platform);
        Self::new(platform, env)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// See [`resolve_app_dirs`].
    pub fn app_dirs(&self, system_wide: bool, config: &AppConfig) -> Result<AppDirs> {
        resolve_app_dirs(self.provider.as_base_paths(), system_wide, config)
    }

    /// See [`resolve_user_dirs`].
    pub fn user_dirs(&self) -> Result<UserDirs> {
        resolve_user_dirs(self.provider.as_personal_folders())
    }
}
