//! SVG minification
//!
//! Markup is parsed first so malformed files are rejected before any
//! rewrite; the cleanup itself is pattern based.

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use roxmltree::{Document, ParsingOptions};

/// Strips comments, `<metadata>` and editor attributes from SVG markup
#[derive(Debug, Clone)]
pub struct SvgMinifier {
    comment: Regex,
    metadata_empty: Regex,
    metadata_block: Regex,
    attributes: Regex,
}

impl SvgMinifier {
    pub fn new() -> crate::Result<Self> {
        Ok(Self {
            comment: Regex::new(r"(?s)<!--.*?-->")?,
            metadata_empty: Regex::new(r"<metadata\b[^>]*/>")?,
            metadata_block: Regex::new(r"(?s)<metadata(?:\s[^>]*)?>.*?</metadata\s*>")?,
            attributes: Regex::new(r#"\s(?:id|inkscape:version|sodipodi:docname)\s*=\s*(?:"[^"]*"|'[^']*')"#)?,
        })
    }

    /// Fail unless `input` is a well-formed XML document rooted at `<svg>`
    pub fn check_well_formed(&self, input: &str) -> Result<()> {
        let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
        let document = Document::parse_with_options(input, options)
            .map_err(|e| anyhow!("malformed markup: {}", e))?;

        let root = document.root_element().tag_name().name();
        if root != "svg" {
            bail!("no <svg> root element (found <{}>)", root);
        }
        Ok(())
    }

    /// Return the minified markup, or an error when it is not well-formed SVG
    pub fn minify(&self, input: &str) -> Result<String> {
        self.check_well_formed(input)?;

        let without_comments = self.comment.replace_all(input, "");
        let markup = self.metadata_empty.replace_all(&without_comments, "");
        let without_metadata = self.metadata_block.replace_all(&markup, "");
        let minified = self.attributes.replace_all(&without_metadata, "");

        Ok(minified.into_owned())
    }
}
