//! Composition of config, state and cache directories.
//!
//! Each category is resolved on its own: base path from the provider, then the
//! application subdirectory, then the category's suffix if its composed path
//! equals the plain composition of either other category. Disambiguation is
//! not repeated, so a suffixed path is never compared again.

use log::{debug, trace};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::error::Result;
use crate::path;
use crate::provider::{BasePathProvider, Lookup, PathStyle};

/// Directories for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDirs {
    /// Files the user configures.
    pub config_dir: PathBuf,
    /// Files the application needs to continue where it left off, e.g. a
    /// SQLite database. Typically not edited by the user.
    pub state_dir: PathBuf,
    /// Files that speed things up but can be re-created or re-downloaded.
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Config,
    State,
    Cache,
}

impl Category {
    fn base(
        self,
        provider: &dyn BasePathProvider,
        system_wide: bool,
        config: &AppConfig,
    ) -> Lookup<PathBuf> {
        match (self, system_wide) {
            (Category::Config, true) => provider.config_dir_system(config),
            (Category::Config, false) => provider.config_dir_local(config),
            (Category::State, true) => provider.state_dir_system(config),
            (Category::State, false) => provider.state_dir_local(config),
            (Category::Cache, true) => provider.cache_dir_system(config),
            (Category::Cache, false) => provider.cache_dir_local(config),
        }
    }

    fn suffix(self, config: &AppConfig) -> &str {
        match self {
            Category::Config => &config.subdir_config,
            Category::State => &config.subdir_state,
            Category::Cache => &config.subdir_cache,
        }
    }

    fn others(self) -> [Category; 2] {
        match self {
            Category::Config => [Category::State, Category::Cache],
            Category::State => [Category::Config, Category::Cache],
            Category::Cache => [Category::Config, Category::State],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Config => "config",
            Category::State => "state",
            Category::Cache => "cache",
        })
    }
}

/// Resolves the config, state and cache directories of an application.
///
/// `system_wide` selects shared storage instead of the current user's
/// profile. The first failing category aborts the whole call; the order is
/// config, state, cache.
pub fn resolve_app_dirs(
    provider: &dyn BasePathProvider,
    system_wide: bool,
    config: &AppConfig,
) -> Result<AppDirs> {
    Ok(AppDirs {
        config_dir: resolve_category(provider, Category::Config, system_wide, config)?,
        state_dir: resolve_category(provider, Category::State, system_wide, config)?,
        cache_dir: resolve_category(provider, Category::Cache, system_wide, config)?,
    })
}

fn effective_subdir<'a>(provider: &dyn BasePathProvider, config: &'a AppConfig) -> &'a str {
    let platform_subdir = provider.subdir_override(config);
    if path::is_empty_subdir(platform_subdir) {
        &config.subdir
    } else {
        platform_subdir
    }
}

fn resolve_category(
    provider: &dyn BasePathProvider,
    category: Category,
    system_wide: bool,
    config: &AppConfig,
) -> Lookup<PathBuf> {
    let base = category.base(provider, system_wide, config)?;
    trace!("{} base directory: {:?}", category, base);

    let subdir = effective_subdir(provider, config);
    if path::is_empty_subdir(subdir) {
        return Ok(path::to_slash(&base, provider.separator()));
    }

    let composed = path::join(&base, subdir);
    let suffix = category.suffix(config);
    if path::is_empty_subdir(suffix) {
        return Ok(path::to_slash(&composed, provider.separator()));
    }

    let [first, second] = category.others();
    let first_composed = path::join(&first.base(provider, system_wide, config)?, subdir);
    let second_composed = path::join(&second.base(provider, system_wide, config)?, subdir);

    let resolved = if composed == first_composed || composed == second_composed {
        let other = if composed == first_composed { first } else { second };
        debug!(
            "{} directory {:?} collides with {} directory, appending {:?}",
            category, composed, other, suffix
        );
        path::join(&composed, suffix)
    } else {
        composed
    };

    Ok(path::to_slash(&resolved, provider.separator()))
}
