//! Directory scanner enumerating the files of a built site
//!
//! Walks the tree below a root directory and classifies files by
//! extension. The order of the returned resources follows the file
//! system and carries no meaning.

use crate::error::{AppError, Result};
use crate::models::{PageResource, ResourceKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursive scanner over one site root
#[derive(Debug, Clone)]
pub struct ResourceScanner {
    root: PathBuf,
}

/// Resources found by a scan plus the entries that could not be read
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub resources: Vec<PageResource>,
    pub unreadable: usize,
}

impl ResourceScanner {
    /// Create a scanner, failing when `root` is missing or not a directory
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(AppError::site_not_found(root));
        }
        let root = root.canonicalize()
            .map_err(|e| AppError::io(format!("Cannot resolve {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Absolute root of the scan
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect every file whose kind is in `kinds`
    pub fn scan(&self, kinds: &[ResourceKind]) -> ScanResult {
        self.scan_matching(|path| ResourceKind::from_path(path).filter(|k| kinds.contains(k)))
    }

    /// Collect every file of a single kind
    pub fn scan_kind(&self, kind: ResourceKind) -> Vec<PageResource> {
        self.scan(&[kind]).resources
    }

    /// Collect files for which `classify` returns a kind
    pub fn scan_matching<F>(&self, classify: F) -> ScanResult
    where
        F: Fn(&Path) -> Option<ResourceKind>,
    {
        let mut result = ScanResult::default();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => {
                    result.unreadable += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(kind) = classify(entry.path()) else {
                continue;
            };

            match entry.metadata() {
                Ok(metadata) => result.resources.push(PageResource::new(
                    entry.path().to_path_buf(),
                    metadata.len(),
                    kind,
                )),
                Err(_) => result.unreadable += 1,
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("guide/intro")).unwrap();
        fs::create_dir_all(root.join("assets/css")).unwrap();
        fs::create_dir_all(root.join("assets/images")).unwrap();
        fs::write(root.join("index.html"), "<html></html>").unwrap();
        fs::write(root.join("guide/intro/index.html"), "<html><body>hi</body></html>").unwrap();
        fs::write(root.join("assets/css/main.css"), "body{}").unwrap();
        fs::write(root.join("assets/images/logo.PNG"), [0u8; 64]).unwrap();
        fs::write(root.join("assets/site.woff2"), [0u8; 32]).unwrap();
        fs::write(root.join("sitemap.xml"), "<urlset/>").unwrap();
        dir
    }

    #[test]
    fn test_missing_root_is_error() {
        let err = ResourceScanner::new("/nonexistent/site/dir").unwrap_err();
        assert!(matches!(err, AppError::SiteNotFound(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_file_root_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("index.html");
        fs::write(&file, "x").unwrap();
        assert!(ResourceScanner::new(&file).is_err());
    }

    #[test]
    fn test_scan_html_recursively() {
        let site = build_site();
        let scanner = ResourceScanner::new(site.path()).unwrap();
        let mut pages: Vec<String> = scanner
            .scan_kind(ResourceKind::Html)
            .iter()
            .map(|r| r.relative_to(scanner.root()))
            .collect();
        pages.sort();
        assert_eq!(pages, vec!["guide/intro/index.html", "index.html"]);
    }

    #[test]
    fn test_scan_multiple_kinds_with_sizes() {
        let site = build_site();
        let scanner = ResourceScanner::new(site.path()).unwrap();
        let result = scanner.scan(&[ResourceKind::Image, ResourceKind::Font]);
        assert_eq!(result.unreadable, 0);
        assert_eq!(result.resources.len(), 2);

        let image = result.resources.iter().find(|r| r.kind == ResourceKind::Image).unwrap();
        assert_eq!(image.byte_size, 64);
        assert!(image.path.is_absolute());

        let font = result.resources.iter().find(|r| r.kind == ResourceKind::Font).unwrap();
        assert_eq!(font.byte_size, 32);
    }

    #[test]
    fn test_unknown_extensions_ignored() {
        let site = build_site();
        let scanner = ResourceScanner::new(site.path()).unwrap();
        let all = scanner.scan(&ResourceKind::ALL);
        assert_eq!(all.resources.len(), 5);
        assert!(all.resources.iter().all(|r| !r.path.ends_with("sitemap.xml")));
    }
}
