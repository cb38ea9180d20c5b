//! Offline extraction from saved SAFER pages.

use crate::models::{CompanyResult, CompanySnapshot};
use crate::scraper::parsers::{parse_search_page, parse_snapshot_page};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn read_page(path: &Path) -> Result<String> {
    debug!("Reading {:?}", path);
    std::fs::read_to_string(path).with_context(|| format!("Could not read {:?}", path))
}

/// Extract a snapshot from a saved Company Snapshot page.
pub fn load_snapshot(path: &Path) -> Result<CompanySnapshot> {
    let html = read_page(path)?;
    let snapshot =
        parse_snapshot_page(&html).with_context(|| format!("No snapshot in {:?}", path))?;
    info!("{:?}: DOT {} {}", path, snapshot.dot_number, snapshot.legal_name);
    Ok(snapshot)
}

/// Extract result rows from a saved name search page.
pub fn load_results(path: &Path) -> Result<Vec<CompanyResult>> {
    let html = read_page(path)?;
    let results = parse_search_page(&html);
    info!("{:?}: {} results", path, results.len());
    Ok(results)
}

/// `.html`/`.htm` files directly inside `dir`, sorted by name.
pub fn discover_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Could not list {:?}", dir))? {
        let path = entry?.path();
        let is_html = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
            .unwrap_or(false);
        if path.is_file() && is_html {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The file itself, or every page inside it when `path` is a directory.
pub fn page_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        discover_html_files(path)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}
