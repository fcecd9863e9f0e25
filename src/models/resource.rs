//! Files discovered in the built site

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Class of a static resource, decided by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Html,
    Css,
    Js,
    Image,
    Font,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Html,
        ResourceKind::Css,
        ResourceKind::Js,
        ResourceKind::Image,
        ResourceKind::Font,
    ];

    /// File extensions (lowercase, without dot) belonging to this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Html => &["html"],
            Self::Css => &["css"],
            Self::Js => &["js"],
            Self::Image => &["png", "jpg", "jpeg", "gif", "svg", "webp"],
            Self::Font => &["woff", "woff2", "ttf", "eot"],
        }
    }

    /// Classify a path by its extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::Js => "JavaScript",
            Self::Image => "Images",
            Self::Font => "Fonts",
        }
    }
}

/// A file of the built site with its size on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResource {
    pub path: PathBuf,
    pub byte_size: u64,
    pub kind: ResourceKind,
}

impl PageResource {
    pub fn new(path: PathBuf, byte_size: u64, kind: ResourceKind) -> Self {
        Self { path, byte_size, kind }
    }

    /// Path relative to `root`, with forward slashes, for display and reports
    pub fn relative_to(&self, root: &Path) -> String {
        relative_display(&self.path, root)
    }
}

/// Render `path` relative to `root` using forward slashes
pub fn relative_display(path: &Path, root: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return path.display().to_string();
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
