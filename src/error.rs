use thiserror::Error;

pub const USER_DIRS_UNSUPPORTED: &str = "RetrieveUserDirs doesn't support this operating system";

pub const IOS_SYSTEM_DIRS_UNSUPPORTED: &str = "cannot get system-wide app directories: iOS apps \
     are inside a sandbox, therefore iOS apps cannot have system-wide app directories";

/// Failure reported by a platform provider primitive.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The platform has no such location at all.
    #[error("{0}")]
    Unsupported(&'static str),

    /// The platform has the location but querying it failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Error returned by [`crate::resolve_app_dirs`] and [`crate::resolve_user_dirs`].
///
/// The message always starts with `finddirs: ` so it can be told apart from
/// other failures in a larger application.
#[derive(Debug, Error)]
#[error("finddirs: {0}")]
pub struct Error(#[from] LookupError);

impl Error {
    pub fn is_unsupported(&self) -> bool {
        matches!(self.0, LookupError::Unsupported(_))
    }

    pub fn lookup(&self) -> &LookupError {
        &self.0
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn display_carries_prefix() {
        let err = Error::from(LookupError::Unsupported(USER_DIRS_UNSUPPORTED));
        assert_eq!(
            err.to_string(),
            "finddirs: RetrieveUserDirs doesn't support this operating system"
        );
        assert!(err.is_unsupported());
    }

    #[test]
    fn failed_lookup_keeps_source() {
        let err = Error::from(LookupError::from(anyhow!("no home directory")));
        assert_eq!(err.to_string(), "finddirs: no home directory");
        assert!(!err.is_unsupported());
        assert!(std::error::Error::source(&err).is_some());
    }
}
