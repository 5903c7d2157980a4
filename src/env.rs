//! Access to the process environment.
//!
//! Providers read environment variables and the account database only through
//! [`Environment`], so tests can swap in a fixed environment instead of
//! mutating the real one.

use anyhow::anyhow;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::LookupError;

pub trait Environment: Send + Sync {
    fn var_os(&self, key: &str) -> Option<OsString>;

    /// Home directory recorded for the current account, if the OS keeps one.
    fn account_home(&self) -> Option<PathBuf>;

    /// Value of `key` as a path; unset and empty count the same.
    fn var_path(&self, key: &str) -> Option<PathBuf> {
        self.var_os(key)
            .filter(|os_str| !os_str.is_empty())
            .map(PathBuf::from)
    }
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    #[cfg(unix)]
    fn account_home(&self) -> Option<PathBuf> {
        use users::os::unix::UserExt;

        users::get_user_by_uid(users::get_current_uid()).map(|user| user.home_dir().to_path_buf())
    }

    #[cfg(windows)]
    fn account_home(&self) -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    #[cfg(not(any(unix, windows)))]
    fn account_home(&self) -> Option<PathBuf> {
        None
    }
}

/// Home directory from `var`, falling back to the account database.
pub(crate) fn home_dir(env: &dyn Environment, var: &str) -> Result<PathBuf, LookupError> {
    env.var_path(var)
        .or_else(|| env.account_home())
        .ok_or_else(|| anyhow!("cannot determine home directory: ${} is not set", var).into())
}
