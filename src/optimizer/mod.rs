//! Image asset optimizer
//!
//! SVG files are minified in place. PNG and JPEG files are scaled down to
//! at most 2000 px, re-encoded, and get a WebP copy next to them; results
//! still above the large-image limit are flagged. A failure on one file is
//! recorded and the run moves on to the next.

pub mod raster;
pub mod svg;

pub use raster::{RasterEncoder, RasterOutput};
pub use svg::SvgMinifier;

use crate::error::{AppError, Result};
use crate::logging::Logger;
use crate::models::resource::relative_display;
use crate::models::ResourceKind;
use crate::scanner::ResourceScanner;
use crate::{log_error, log_info, log_warn};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions the optimizer looks at
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "svg"];

/// Running totals of one optimizer run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub original_size: u64,
    pub optimized_size: u64,
}

impl OptimizationStats {
    pub fn savings(&self) -> u64 {
        self.original_size.saturating_sub(self.optimized_size)
    }

    /// Savings in percent of the original size, 0 when nothing was measured
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.savings() as f64 / self.original_size as f64 * 100.0
    }
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Smaller output written (or computed, in dry-run mode)
    Optimized { original: u64, optimized: u64 },
    /// Minification found nothing to remove
    AlreadyOptimized { size: u64 },
    /// PNG or JPEG re-encoded; `optimized == original` when the re-encode
    /// was not smaller and the file was kept
    Raster {
        original: u64,
        optimized: u64,
        resized: Option<(u32, u32)>,
        webp_size: u64,
        oversized: bool,
    },
    /// Reading, parsing or writing failed
    Failed { message: String },
}

/// Per-file line of the optimizer summary
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: String,
    pub outcome: FileOutcome,
}

/// Everything the console summary needs
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationSummary {
    pub target_dir: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub stats: OptimizationStats,
}

pub struct ImageOptimizer {
    dry_run: bool,
    verbose: bool,
    large_image_bytes: u64,
    minifier: SvgMinifier,
    encoder: RasterEncoder,
    logger: Logger,
    stats: OptimizationStats,
}

impl ImageOptimizer {
    pub fn new(dry_run: bool, verbose: bool, logger: Logger) -> Result<Self> {
        Ok(Self {
            dry_run,
            verbose,
            large_image_bytes: crate::defaults::LARGE_IMAGE_BYTES,
            minifier: SvgMinifier::new()?,
            encoder: RasterEncoder::default(),
            logger,
            stats: OptimizationStats::default(),
        })
    }

    pub fn with_large_image_limit(mut self, bytes: u64) -> Self {
        self.large_image_bytes = bytes;
        self
    }

    pub fn with_encoder(mut self, encoder: RasterEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn stats(&self) -> &OptimizationStats {
        &self.stats
    }

    /// Process every image below `directory`
    ///
    /// Fails only when `directory` is missing or not a directory.
    pub fn optimize_directory(&mut self, directory: &Path) -> Result<OptimizationSummary> {
        let scanner = ResourceScanner::new(directory)?;
        let scan = scanner.scan_matching(|path| {
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ResourceKind::Image)
        });
        if scan.unreadable > 0 {
            log_warn!(self.logger, "Some directory entries could not be read")
                .field("count", scan.unreadable)
                .log();
        }

        let mut images: Vec<PathBuf> = scan.resources.into_iter().map(|r| r.path).collect();
        images.sort();

        self.logger.info("Scanning image directory")
            .field("directory", directory.display().to_string())
            .field("images", images.len())
            .log();

        let files = images
            .iter()
            .map(|path| FileReport {
                path: relative_display(path, scanner.root()),
                outcome: self.optimize_image(path),
            })
            .collect();

        Ok(OptimizationSummary {
            target_dir: directory.to_path_buf(),
            dry_run: self.dry_run,
            files,
            stats: self.stats,
        })
    }

    /// Optimize one file, folding the result into the running stats
    pub fn optimize_image(&mut self, path: &Path) -> FileOutcome {
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

        let result = if is_svg {
            self.optimize_svg(path)
        } else {
            self.optimize_raster(path)
        };

        match result {
            Ok(outcome) => {
                self.record(&outcome);
                outcome
            }
            Err(e) => {
                self.stats.errors += 1;
                let message = format!("{:#}", e);
                log_error!(self.logger, "Failed to optimize image")
                    .field("path", path.display().to_string())
                    .error_info(&AppError::from(e))
                    .log();
                FileOutcome::Failed { message }
            }
        }
    }

    fn optimize_svg(&self, path: &Path) -> anyhow::Result<FileOutcome> {
        if self.verbose {
            log_info!(self.logger, "Processing SVG").field("path", path.display().to_string()).log();
        }

        let original = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let minified = self.minifier.minify(&original)
            .with_context(|| format!("parsing {}", path.display()))?;

        let original_size = original.len() as u64;
        let optimized_size = minified.len() as u64;
        if optimized_size >= original_size {
            return Ok(FileOutcome::AlreadyOptimized { size: original_size });
        }

        if !self.dry_run {
            fs::write(path, &minified)
                .with_context(|| format!("writing {}", path.display()))?;
        }

        Ok(FileOutcome::Optimized { original: original_size, optimized: optimized_size })
    }

    fn optimize_raster(&self, path: &Path) -> anyhow::Result<FileOutcome> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(raster::format_for_extension)
            .ok_or_else(|| anyhow!("unsupported image type: {}", path.display()))?;

        if self.verbose {
            log_info!(self.logger, "Processing raster image")
                .field("path", path.display().to_string())
                .field("format", format!("{:?}", format))
                .log();
        }

        let original = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let output = self.encoder.encode(&original, format)
            .with_context(|| format!("processing {}", path.display()))?;

        let original_size = original.len() as u64;
        let replace = output.resized.is_some() || (output.encoded.len() as u64) < original_size;
        let optimized_size = if replace { output.encoded.len() as u64 } else { original_size };

        if !self.dry_run {
            if replace {
                fs::write(path, &output.encoded)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            let webp_path = path.with_extension("webp");
            fs::write(&webp_path, &output.webp)
                .with_context(|| format!("writing {}", webp_path.display()))?;
        }

        if let Some((width, height)) = output.resized {
            log_info!(self.logger, "Resized raster image")
                .field("path", path.display().to_string())
                .field("width", width)
                .field("height", height)
                .log();
        }

        Ok(FileOutcome::Raster {
            original: original_size,
            optimized: optimized_size,
            resized: output.resized,
            webp_size: output.webp.len() as u64,
            oversized: optimized_size > self.large_image_bytes,
        })
    }

    fn record(&mut self, outcome: &FileOutcome) {
        match *outcome {
            FileOutcome::Optimized { original, optimized } => {
                self.stats.processed += 1;
                self.stats.original_size += original;
                self.stats.optimized_size += optimized;
            }
            FileOutcome::AlreadyOptimized { size } => {
                self.stats.processed += 1;
                self.stats.skipped += 1;
                self.stats.original_size += size;
                self.stats.optimized_size += size;
            }
            FileOutcome::Raster { original, optimized, oversized, .. } => {
                self.stats.processed += 1;
                if optimized >= original && !oversized {
                    self.stats.skipped += 1;
                }
                self.stats.original_size += original;
                self.stats.optimized_size += optimized;
            }
            FileOutcome::Failed { .. } => {}
        }
    }
}
