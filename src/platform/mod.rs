//! Per-platform providers and platform detection.

use anyhow::bail;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::env::Environment;
use crate::provider::PlatformDirs;

mod darwin;
mod plan9;
mod termux;
mod windows;
mod xdg;

pub use darwin::DarwinProvider;
pub use plan9::Plan9Provider;
pub use termux::TermuxProvider;
pub use windows::WindowsProvider;
pub use xdg::XdgProvider;

const TERMUX_PACKAGE: &str = "com.termux";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Termux,
    MacOs,
    Ios,
    Windows,
    Plan9,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Unix,
        Platform::Termux,
        Platform::MacOs,
        Platform::Ios,
        Platform::Windows,
        Platform::Plan9,
    ];

    /// Platform of the running process.
    ///
    /// Plan 9 is never detected since Rust has no Plan 9 target; select it
    /// explicitly when needed.
    pub fn detect(env: &dyn Environment) -> Platform {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if is_termux(env) {
            Platform::Termux
        } else {
            Platform::Unix
        }
    }

    pub fn provider(self, env: Arc<dyn Environment>) -> Box<dyn PlatformDirs> {
        match self {
            Platform::Unix => Box::new(XdgProvider::new(env)),
            Platform::Termux => Box::new(TermuxProvider::new(env)),
            Platform::MacOs => Box::new(DarwinProvider::macos(env)),
            Platform::Ios => Box::new(DarwinProvider::ios(env)),
            Platform::Windows => Box::new(WindowsProvider::new(env)),
            Platform::Plan9 => Box::new(Plan9Provider::new(env)),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Termux => "termux",
            Platform::MacOs => "macos",
            Platform::Ios => "ios",
            Platform::Windows => "windows",
            Platform::Plan9 => "plan9",
        }
    }
}

fn is_termux(env: &dyn Environment) -> bool {
    if env.var_path("TERMUX_VERSION").is_some() {
        return true;
    }
    env.var_path("PREFIX")
        .map(|prefix| prefix.components().any(|c| c.as_os_str() == TERMUX_PACKAGE))
        .unwrap_or(false)
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match Platform::ALL
            .into_iter()
            .find(|platform| platform.name().eq_ignore_ascii_case(s))
        {
            Some(platform) => Ok(platform),
            None => bail!("Unknown platform {:?}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::MapEnv;

    #[test]
    #[cfg(target_os = "linux")]
    fn detects_termux() {
        let env = MapEnv::new().var("TERMUX_VERSION", "0.118.0");
        assert_eq!(Platform::detect(&env), Platform::Termux);

        let env = MapEnv::new().var("PREFIX", "/data/data/com.termux/files/usr");
        assert_eq!(Platform::detect(&env), Platform::Termux);

        let env = MapEnv::new().var("PREFIX", "/usr/local");
        assert_eq!(Platform::detect(&env), Platform::Unix);
    }

    #[test]
    fn parses_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
        assert_eq!("MacOS".parse::<Platform>().unwrap(), Platform::MacOs);
        assert!("beos".parse::<Platform>().is_err());
    }
}
