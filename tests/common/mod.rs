//! Shared fixtures for the CLI integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Variables the binary reads that must not leak in from the test host
const ENV_VARS: [&str; 11] = [
    "SITE_DIR",
    "BANDWIDTH_MBPS",
    "LATENCY_MS",
    "MAX_CONCURRENT",
    "JS_BLOCKING_FRACTION",
    "ENABLE_COLOR",
    "LOG_LEVEL",
    "NO_COLOR",
    "FORCE_COLOR",
    "CLICOLOR",
    "CLICOLOR_FORCE",
];

/// Command running in `workdir` with a clean environment
pub fn site_audit(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("site-audit").unwrap();
    cmd.current_dir(workdir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

pub fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Gradient PNG stored unfiltered at the fastest compression, so a
/// re-encode always comes out smaller
pub fn loose_png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_with_encoder(PngEncoder::new_with_quality(&mut buffer, CompressionType::Fast, FilterType::NoFilter))
        .unwrap();
    buffer
}

/// Working directory holding a small built site under `site/`
///
/// `index.html` links one 50 KiB stylesheet; the guide page pulls in a
/// script and an image through `../` references.
pub fn sample_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let site = dir.path().join("site");

    let body = "<p>Static documentation body text.</p>\n".repeat(200);
    write(
        &site,
        "index.html",
        format!(
            "<html><head><link rel=\"stylesheet\" href=\"assets/style.css\"></head><body>{}</body></html>",
            body
        ),
    );
    write(
        &site,
        "guide/index.html",
        format!(
            "<html><head><link href=\"../assets/style.css\" rel=\"stylesheet\">\
             <script src=\"../assets/app.js\"></script></head>\
             <body>{}<img src=\"../assets/hero.png\"><img src=\"https://cdn.example.com/x.png\"></body></html>",
            body
        ),
    );
    write(&site, "assets/style.css", "a{color:red}\n".repeat(50 * 1024 / 13));
    write(&site, "assets/app.js", "console.log(1);\n".repeat(2048));
    write(&site, "assets/hero.png", vec![0u8; 4096]);

    dir
}
