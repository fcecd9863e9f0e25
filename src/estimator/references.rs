//! Asset reference extraction and resolution
//!
//! References are found with plain patterns over the markup rather than
//! a DOM parse; a page built by a site generator is regular enough.

use crate::error::{AppError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

/// Raw reference strings found in one page, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetReferences {
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub images: Vec<String>,
}

impl AssetReferences {
    pub fn is_empty(&self) -> bool {
        self.stylesheets.is_empty() && self.scripts.is_empty() && self.images.is_empty()
    }
}

/// Pulls stylesheet, script and image references out of HTML
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    stylesheet: Regex,
    script: Regex,
    image: Regex,
}

impl ReferenceExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            stylesheet: Regex::new(r#"href="([^"]+\.css)""#)?,
            script: Regex::new(r#"src="([^"]+\.js)""#)?,
            image: Regex::new(r#"src="([^"]+\.(?:png|jpg|jpeg|gif|svg|webp))""#)?,
        })
    }

    pub fn extract(&self, html: &str) -> AssetReferences {
        let capture_all = |re: &Regex| -> Vec<String> {
            re.captures_iter(html)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect()
        };

        AssetReferences {
            stylesheets: capture_all(&self.stylesheet),
            scripts: capture_all(&self.script),
            images: capture_all(&self.image),
        }
    }
}

/// Maps reference strings of a page to files below the site root
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    site_url: Url,
}

impl ReferenceResolver {
    /// `site_root` must be absolute
    pub fn new(site_root: &Path) -> Result<Self> {
        let site_url = Url::from_directory_path(site_root)
            .map_err(|_| AppError::config(format!("Site root must be an absolute path: {}", site_root.display())))?;
        Ok(Self { site_url })
    }

    /// Resolve `reference` as written in the page at `page`
    ///
    /// Returns `None` for external references (any scheme, or
    /// protocol-relative) and for references that cannot form a path.
    /// Existence on disk is not checked here.
    pub fn resolve(&self, page: &Path, reference: &str) -> Option<PathBuf> {
        let reference = reference.trim();
        if reference.is_empty() || reference.starts_with("//") || Url::parse(reference).is_ok() {
            return None;
        }

        let resolved = if let Some(site_relative) = reference.strip_prefix('/') {
            self.site_url.join(site_relative).ok()?
        } else {
            Url::from_file_path(page).ok()?.join(reference).ok()?
        };

        resolved.to_file_path().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_references() {
        let html = r#"
            <link rel="stylesheet" href="../assets/stylesheets/main.css">
            <link rel="stylesheet" href="/assets/extra.css">
            <link rel="icon" href="/favicon.png">
            <script src="../assets/javascripts/bundle.js"></script>
            <script src="https://cdn.example.com/mermaid.min.js"></script>
            <img src="images/diagram.svg" alt="">
            <img src="photo.JPG" alt="">
            <img src="images/board.png">
        "#;
        let refs = ReferenceExtractor::new().unwrap().extract(html);
        assert_eq!(refs.stylesheets, vec!["../assets/stylesheets/main.css", "/assets/extra.css"]);
        assert_eq!(refs.scripts, vec![
            "../assets/javascripts/bundle.js",
            "https://cdn.example.com/mermaid.min.js",
        ]);
        assert_eq!(refs.images, vec!["images/diagram.svg", "images/board.png"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<script src="a.js"></script><script src="a.js"></script>"#;
        let refs = ReferenceExtractor::new().unwrap().extract(html);
        assert_eq!(refs.scripts.len(), 2);
    }

    #[test]
    fn test_no_references() {
        let refs = ReferenceExtractor::new().unwrap().extract("<p>plain</p>");
        assert!(refs.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_relative_and_rooted() {
        let resolver = ReferenceResolver::new(Path::new("/srv/site")).unwrap();
        let page = Path::new("/srv/site/guide/intro/index.html");

        assert_eq!(
            resolver.resolve(page, "../../assets/main.css"),
            Some(PathBuf::from("/srv/site/assets/main.css"))
        );
        assert_eq!(
            resolver.resolve(page, "img/board.png"),
            Some(PathBuf::from("/srv/site/guide/intro/img/board.png"))
        );
        assert_eq!(
            resolver.resolve(page, "/assets/app.js"),
            Some(PathBuf::from("/srv/site/assets/app.js"))
        );
        assert_eq!(
            resolver.resolve(page, "app.js?v=3#top"),
            Some(PathBuf::from("/srv/site/guide/intro/app.js"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_external_references_ignored() {
        let resolver = ReferenceResolver::new(Path::new("/srv/site")).unwrap();
        let page = Path::new("/srv/site/index.html");
        assert_eq!(resolver.resolve(page, "https://cdn.example.com/x.js"), None);
        assert_eq!(resolver.resolve(page, "//cdn.example.com/x.js"), None);
        assert_eq!(resolver.resolve(page, "data:image/png;base64,AAAA.png"), None);
        assert_eq!(resolver.resolve(page, ""), None);
    }

    #[test]
    fn test_relative_root_rejected() {
        assert!(ReferenceResolver::new(Path::new("site")).is_err());
    }
}
