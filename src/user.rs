use serde::Serialize;
use std::path::PathBuf;

use crate::error::Result;
use crate::path;
use crate::provider::{Lookup, PathStyle, PersonalFolderProvider};

/// Standard personal folders of the current user.
///
/// A folder is `None` where the platform has no such concept or the user's
/// setup leaves it unset (e.g. an XDG entry pointing at `$HOME`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserDirs {
    pub desktop: Option<PathBuf>,
    pub downloads: Option<PathBuf>,
    pub documents: Option<PathBuf>,
    pub pictures: Option<PathBuf>,
    pub videos: Option<PathBuf>,
    pub music: Option<PathBuf>,
    /// Font directories in lookup order.
    pub fonts: Vec<PathBuf>,
    pub templates: Option<PathBuf>,
    pub public_share: Option<PathBuf>,
}

/// Collects every personal folder, stopping at the first failing lookup.
pub fn resolve_user_dirs(provider: &dyn PersonalFolderProvider) -> Result<UserDirs> {
    let separator = provider.separator();
    let folder = |dir: Lookup<Option<PathBuf>>| -> Lookup<Option<PathBuf>> {
        Ok(dir?.map(|dir| path::to_slash(&dir, separator)))
    };

    Ok(UserDirs {
        desktop: folder(provider.desktop_dir())?,
        downloads: folder(provider.downloads_dir())?,
        documents: folder(provider.documents_dir())?,
        pictures: folder(provider.pictures_dir())?,
        videos: folder(provider.videos_dir())?,
        music: folder(provider.music_dir())?,
        fonts: provider
            .fonts_dirs()?
            .iter()
            .map(|dir| path::to_slash(dir, separator))
            .collect(),
        templates: folder(provider.templates_dir())?,
        public_share: folder(provider.public_share_dir())?,
    })
}
