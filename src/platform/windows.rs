use anyhow::anyhow;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::env::Environment;
use crate::provider::{BasePathProvider, Lookup, PathStyle, PersonalFolderProvider};

#[derive(Debug, Clone, Copy)]
enum KnownFolder {
    ProgramData,
    RoamingAppData,
    LocalAppData,
    Profile,
    Public,
    Windows,
}

impl KnownFolder {
    /// Environment variable Windows sets to the folder's location, used when
    /// the shell cannot be asked.
    fn env_var(self) -> &'static str {
        match self {
            KnownFolder::ProgramData => "ProgramData",
            KnownFolder::RoamingAppData => "APPDATA",
            KnownFolder::LocalAppData => "LOCALAPPDATA",
            KnownFolder::Profile => "USERPROFILE",
            KnownFolder::Public => "PUBLIC",
            KnownFolder::Windows => "SystemRoot",
        }
    }

    /// Asks the shell for the folder's current location, then for its
    /// default one. Neither has to exist yet.
    #[cfg(windows)]
    fn query(self) -> Option<PathBuf> {
        use windows_sys::Win32::UI::Shell::{
            FOLDERID_LocalAppData, FOLDERID_Profile, FOLDERID_ProgramData, FOLDERID_Public,
            FOLDERID_RoamingAppData, FOLDERID_Windows, KF_FLAG_DEFAULT, KF_FLAG_DEFAULT_PATH,
        };

        let id = match self {
            KnownFolder::ProgramData => &FOLDERID_ProgramData,
            KnownFolder::RoamingAppData => &FOLDERID_RoamingAppData,
            KnownFolder::LocalAppData => &FOLDERID_LocalAppData,
            KnownFolder::Profile => &FOLDERID_Profile,
            KnownFolder::Public => &FOLDERID_Public,
            KnownFolder::Windows => &FOLDERID_Windows,
        };
        [KF_FLAG_DEFAULT, KF_FLAG_DEFAULT_PATH]
            .into_iter()
            .find_map(|flags| known_folder_path(id, flags))
    }

    #[cfg(not(windows))]
    fn query(self) -> Option<PathBuf> {
        None
    }
}

#[cfg(windows)]
fn known_folder_path(
    id: &windows_sys::core::GUID,
    flags: windows_sys::Win32::UI::Shell::KNOWN_FOLDER_FLAG,
) -> Option<PathBuf> {
    use std::ffi::{c_void, OsString};
    use std::os::windows::ffi::OsStringExt;
    use windows_sys::Win32::System::Com::CoTaskMemFree;
    use windows_sys::Win32::UI::Shell::{SHGetKnownFolderPath, KF_FLAG_DONT_VERIFY};

    let mut raw: windows_sys::core::PWSTR = std::ptr::null_mut();
    // SAFETY: on return `raw` is null or a NUL-terminated string allocated by
    // the shell, which must be released with CoTaskMemFree even on failure.
    unsafe {
        let hr = SHGetKnownFolderPath(id, flags | KF_FLAG_DONT_VERIFY, 0, &mut raw);
        let path = if hr >= 0 && !raw.is_null() {
            let len = (0..).take_while(|&i| *raw.add(i) != 0).count();
            let wide = std::slice::from_raw_parts(raw, len);
            Some(PathBuf::from(OsString::from_wide(wide)))
        } else {
            log::debug!("SHGetKnownFolderPath failed with {:#x}", hr);
            None
        };
        CoTaskMemFree(raw as *const c_void);
        path
    }
}

/// Windows known folders. Config, state and cache share one base; use the
/// state and cache suffixes to keep them apart.
pub struct WindowsProvider {
    env: Arc<dyn Environment>,
}

impl WindowsProvider {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env }
    }

    fn known_folder(&self, folder: KnownFolder) -> Lookup<PathBuf> {
        if let Some(path) = folder.query() {
            return Ok(path);
        }
        if cfg!(windows) {
            warn!(
                "Known folder {:?} unavailable, falling back to %{}%",
                folder,
                folder.env_var()
            );
        }
        self.env.var_path(folder.env_var()).ok_or_else(|| {
            anyhow!(
                "cannot locate known folder {:?}: %{}% is not set",
                folder,
                folder.env_var()
            )
            .into()
        })
    }

    fn windir(&self) -> Lookup<PathBuf> {
        match self.env.var_path("WINDIR") {
            Some(dir) => Ok(dir),
            None => self.known_folder(KnownFolder::Windows),
        }
    }

    /// A personal folder from the shell, or `fallback` under the profile.
    #[cfg_attr(not(windows), allow(unused_variables))]
    fn user_folder(
        &self,
        pick: fn(&directories::UserDirs) -> Option<&std::path::Path>,
        fallback: &str,
    ) -> Lookup<Option<PathBuf>> {
        #[cfg(windows)]
        if let Some(dir) = directories::UserDirs::new().and_then(|d| pick(&d).map(|p| p.to_path_buf()))
        {
            return Ok(Some(dir));
        }
        Ok(Some(self.known_folder(KnownFolder::Profile)?.join(fallback)))
    }
}

impl PathStyle for WindowsProvider {
    fn separator(&self) -> char {
        '\\'
    }
}

impl BasePathProvider for WindowsProvider {
    fn config_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.known_folder(KnownFolder::ProgramData)
    }

    fn config_dir_local(&self, config: &AppConfig) -> Lookup<PathBuf> {
        if config.use_roaming {
            self.known_folder(KnownFolder::RoamingAppData)
        } else {
            self.known_folder(KnownFolder::LocalAppData)
        }
    }

    fn state_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.known_folder(KnownFolder::ProgramData)
    }

    fn state_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.known_folder(KnownFolder::LocalAppData)
    }

    fn cache_dir_system(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.known_folder(KnownFolder::ProgramData)
    }

    fn cache_dir_local(&self, _config: &AppConfig) -> Lookup<PathBuf> {
        self.known_folder(KnownFolder::LocalAppData)
    }

    fn subdir_override<'a>(&self, config: &'a AppConfig) -> &'a str {
        &config.subdir_windows
    }
}

impl PersonalFolderProvider for WindowsProvider {
    fn desktop_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.desktop_dir(), "Desktop")
    }

    fn downloads_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.download_dir(), "Downloads")
    }

    fn documents_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.document_dir(), "Documents")
    }

    fn pictures_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.picture_dir(), "Pictures")
    }

    fn videos_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.video_dir(), "Videos")
    }

    fn music_dir(&self) -> Lookup<Option<PathBuf>> {
        self.user_folder(|d| d.audio_dir(), "Music")
    }

    fn fonts_dirs(&self) -> Lookup<Vec<PathBuf>> {
        Ok(vec![
            self.windir()?.join("Fonts"),
            self.known_folder(KnownFolder::LocalAppData)?
                .join("Microsoft")
                .join("Windows")
                .join("Fonts"),
        ])
    }

    fn templates_dir(&self) -> Lookup<Option<PathBuf>> {
        #[cfg(windows)]
        if let Some(dir) =
            directories::UserDirs::new().and_then(|d| d.template_dir().map(|p| p.to_path_buf()))
        {
            return Ok(Some(dir));
        }
        Ok(Some(
            self.known_folder(KnownFolder::RoamingAppData)?
                .join("Microsoft")
                .join("Windows")
                .join("Templates"),
        ))
    }

    fn public_share_dir(&self) -> Lookup<Option<PathBuf>> {
        Ok(Some(self.known_folder(KnownFolder::Public)?))
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::env::testing::MapEnv;
    use crate::resolver::resolve_app_dirs;
    use crate::user::resolve_user_dirs;

    fn env() -> MapEnv {
        MapEnv::new()
            .var("ProgramData", r"C:\ProgramData")
            .var("USERPROFILE", r"C:\Users\alice")
            .var("APPDATA", r"C:\Users\alice\AppData\Roaming")
            .var("LOCALAPPDATA", r"C:\Users\alice\AppData\Local")
            .var("PUBLIC", r"C:\Users\Public")
            .var("SystemRoot", r"C:\WINDOWS")
    }

    fn config() -> AppConfig {
        AppConfig::new("foo/bar")
            .with_state_suffix("state")
            .with_cache_suffix("cache")
    }

    #[test]
    fn system_dirs() {
        let p = WindowsProvider::new(env().shared());
        let d = resolve_app_dirs(&p, true, &config()).unwrap();

        assert_eq!(d.config_dir, PathBuf::from("C:/ProgramData/foo/bar"));
        assert_eq!(d.state_dir, PathBuf::from("C:/ProgramData/foo/bar/state"));
        assert_eq!(d.cache_dir, PathBuf::from("C:/ProgramData/foo/bar/cache"));
    }

    #[test]
    fn local_dirs() {
        let p = WindowsProvider::new(env().shared());
        let d = resolve_app_dirs(&p, false, &config()).unwrap();

        assert_eq!(d.config_dir, PathBuf::from("C:/Users/alice/AppData/Local/foo/bar"));
        assert_eq!(
            d.state_dir,
            PathBuf::from("C:/Users/alice/AppData/Local/foo/bar/state")
        );
        assert_eq!(
            d.cache_dir,
            PathBuf::from("C:/Users/alice/AppData/Local/foo/bar/cache")
        );
    }

    #[test]
    fn roaming_only_moves_config() {
        let p = WindowsProvider::new(env().shared());
        let d = resolve_app_dirs(&p, false, &config().with_roaming(true)).unwrap();

        assert_eq!(
            d.config_dir,
            PathBuf::from("C:/Users/alice/AppData/Roaming/foo/bar")
        );
        // State still collides with cache, not with config.
        assert_eq!(
            d.state_dir,
            PathBuf::from("C:/Users/alice/AppData/Local/foo/bar/state")
        );
        assert_eq!(
            d.cache_dir,
            PathBuf::from("C:/Users/alice/AppData/Local/foo/bar/cache")
        );
    }

    #[test]
    fn roaming_has_no_effect_system_wide() {
        let p = WindowsProvider::new(env().shared());
        let d = resolve_app_dirs(&p, true, &config().with_roaming(true)).unwrap();
        assert_eq!(d.config_dir, PathBuf::from("C:/ProgramData/foo/bar"));
    }

    #[test]
    fn missing_known_folder_fails() {
        let p = WindowsProvider::new(MapEnv::new().shared());
        let err = resolve_app_dirs(&p, true, &config()).unwrap_err();

        assert!(!err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "finddirs: cannot locate known folder ProgramData: %ProgramData% is not set"
        );
    }

    #[test]
    fn user_dirs() {
        let p = WindowsProvider::new(env().shared());
        let d = resolve_user_dirs(&p).unwrap();

        assert_eq!(d.desktop, Some(PathBuf::from("C:/Users/alice/Desktop")));
        assert_eq!(d.downloads, Some(PathBuf::from("C:/Users/alice/Downloads")));
        assert_eq!(d.music, Some(PathBuf::from("C:/Users/alice/Music")));
        assert_eq!(
            d.templates,
            Some(PathBuf::from(
                "C:/Users/alice/AppData/Roaming/Microsoft/Windows/Templates"
            ))
        );
        assert_eq!(d.public_share, Some(PathBuf::from("C:/Users/Public")));
        assert_eq!(
            d.fonts,
            vec![
                PathBuf::from("C:/WINDOWS/Fonts"),
                PathBuf::from("C:/Users/alice/AppData/Local/Microsoft/Windows/Fonts"),
            ]
        );
    }
}

#[cfg(all(test, windows))]
mod shell_tests {
    use super::*;
    use crate::env::testing::MapEnv;
    use crate::resolver::resolve_app_dirs;

    #[test]
    fn system_dirs_do_not_need_environment() {
        let p = WindowsProvider::new(MapEnv::new().shared());
        let config = AppConfig::new("foo/bar")
            .with_state_suffix("state")
            .with_cache_suffix("cache");

        let d = resolve_app_dirs(&p, true, &config).unwrap();
        assert!(d.config_dir.ends_with("foo/bar"));
        assert!(d.state_dir.ends_with("foo/bar/state"));
        assert!(d.cache_dir.ends_with("foo/bar/cache"));
        assert!(!d.config_dir.to_string_lossy().contains('\\'));
    }

    #[test]
    fn windows_folder_does_not_need_environment() {
        let p = WindowsProvider::new(MapEnv::new().shared());
        assert!(p.windir().unwrap().is_absolute());
    }
}
