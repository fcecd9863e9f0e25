//! Static resource inventory grouped by class

use super::{compression_ratio, CompressionAuditor};
use crate::models::{PageResource, ResourceKind};
use crate::scanner::ResourceScanner;
use serde::{Deserialize, Serialize};

/// One static file; `gzip_size` only for text resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub path: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_size: Option<u64>,
}

/// CSS, JavaScript, image and font files of the site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceInventory {
    pub css: Vec<ResourceEntry>,
    pub js: Vec<ResourceEntry>,
    pub images: Vec<ResourceEntry>,
    pub fonts: Vec<ResourceEntry>,
}

impl ResourceInventory {
    /// Scan the site and measure every static resource
    ///
    /// Text resources that cannot be read keep their raw size and get no
    /// compressed size.
    pub fn collect(scanner: &ResourceScanner, auditor: &CompressionAuditor) -> Self {
        let scan = scanner.scan(&[
            ResourceKind::Css,
            ResourceKind::Js,
            ResourceKind::Image,
            ResourceKind::Font,
        ]);
        let mut inventory = Self::default();

        for resource in scan.resources {
            let compressible = matches!(resource.kind, ResourceKind::Css | ResourceKind::Js);
            let entry = Self::entry(&resource, auditor, compressible);
            match resource.kind {
                ResourceKind::Css => inventory.css.push(entry),
                ResourceKind::Js => inventory.js.push(entry),
                ResourceKind::Image => inventory.images.push(entry),
                ResourceKind::Font => inventory.fonts.push(entry),
                ResourceKind::Html => {}
            }
        }

        for group in [&mut inventory.css, &mut inventory.js, &mut inventory.images, &mut inventory.fonts] {
            group.sort_by(|a, b| a.path.cmp(&b.path));
        }
        inventory
    }

    fn entry(resource: &PageResource, auditor: &CompressionAuditor, compressible: bool) -> ResourceEntry {
        ResourceEntry {
            path: resource.relative_to(auditor.site_root()),
            size: resource.byte_size,
            gzip_size: if compressible {
                auditor.compressed_file_size(&resource.path).ok()
            } else {
                None
            },
        }
    }

    pub fn total_size(entries: &[ResourceEntry]) -> u64 {
        entries.iter().map(|e| e.size).sum()
    }

    /// Sum of compressed sizes, falling back to raw size where missing
    pub fn total_gzip_size(entries: &[ResourceEntry]) -> u64 {
        entries.iter().map(|e| e.gzip_size.unwrap_or(e.size)).sum()
    }

    /// Aggregate compression ratio of a group, `None` when the group is empty
    pub fn group_ratio(entries: &[ResourceEntry]) -> Option<f64> {
        if entries.is_empty() {
            return None;
        }
        Some(compression_ratio(Self::total_size(entries), Self::total_gzip_size(entries)))
    }

    /// Images above `limit` bytes, largest first
    pub fn large_images(&self, limit: u64) -> Vec<&ResourceEntry> {
        let mut large: Vec<&ResourceEntry> = self.images.iter().filter(|e| e.size > limit).collect();
        large.sort_by(|a, b| b.size.cmp(&a.size));
        large
    }
}
