use crate::error::{Result, SaferError};
use crate::models::{CompanyResult, CompanySnapshot};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, trace};

use super::cleaner::{parse_date, parse_dot_from_link};
use super::navigator::Navigator;
use super::regions::Region;

// ── Snapshot page ─────────────────────────────────────────────────────────────

const TITLE: &str = "head/title";
const TITLE_NOT_FOUND: &str = "SAFER Web - Company Snapshot RECORD NOT FOUND";
const TITLE_INACTIVE: &str = "SAFER Web - Company Snapshot RECORD INACTIVE";

/// Cell holding the whole snapshot body; every other snapshot path starts here.
const SNAPSHOT_ANCHOR: &str = "body/p/table/tbody/tr[2]/td/table/tbody/tr[2]/td";
const LATEST_UPDATE_DATE: &str = "table/tbody/tr[3]/td/font/b[3]/font";

// ── Search page ───────────────────────────────────────────────────────────────

const RESULT_ROWS: &str = "body/table[3]/tbody/tr";
const RESULT_LINK: &str = "th/b/a";
const RESULT_LOCATION: &str = "td/b";

static RESULT_MARKER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[scope="rpw"]"#).expect("result row selector is hardcoded and valid")
});

pub fn parse_snapshot_page(html: &str) -> Result<CompanySnapshot> {
    let doc = Html::parse_document(html);
    extract_snapshot(&doc)
}

pub fn parse_search_page(html: &str) -> Vec<CompanyResult> {
    let doc = Html::parse_document(html);
    extract_results(&doc)
}

/// Build a snapshot from a parsed Company Snapshot page.
///
/// Returns [`SaferError::CompanyNotFound`] when SAFER says the record does not exist
/// or is inactive. A page without the snapshot body yields an all-default snapshot.
pub fn extract_snapshot(doc: &Html) -> Result<CompanySnapshot> {
    let page = Navigator::document(doc);

    let title = page.text(TITLE);
    if title == TITLE_NOT_FOUND || title == TITLE_INACTIVE {
        debug!("Snapshot page reports {:?}", title);
        return Err(SaferError::CompanyNotFound);
    }

    let mut snapshot = CompanySnapshot::default();

    let Some(anchor) = page.at(SNAPSHOT_ANCHOR) else {
        debug!("No snapshot body on page; returning empty snapshot");
        return Ok(snapshot);
    };

    snapshot.latest_update_date = parse_date(&anchor.text(LATEST_UPDATE_DATE));

    let mut mapped = 0usize;
    for region in Region::ALL {
        match anchor.at(region.path()) {
            Some(table) => {
                trace!("Region {} → {:?}", region.index(), region);
                region.apply(table, &mut snapshot);
                mapped += 1;
            }
            None => trace!("Region {} ({:?}) missing", region.index(), region),
        }
    }

    debug!(
        "Snapshot for DOT {:?}: {}/{} regions mapped",
        snapshot.dot_number,
        mapped,
        Region::ALL.len()
    );
    Ok(snapshot)
}

/// Result rows of a parsed name search page, in page order.
pub fn extract_results(doc: &Html) -> Vec<CompanyResult> {
    let page = Navigator::document(doc);

    let results: Vec<CompanyResult> = page
        .find_all(RESULT_ROWS)
        .into_iter()
        .filter(|row| row.select(&RESULT_MARKER).next().is_some())
        .map(|row| {
            let row = Navigator::new(row);
            CompanyResult {
                name: row.text(RESULT_LINK),
                dot_number: parse_dot_from_link(&row.attr(RESULT_LINK, "href")),
                location: row.text(RESULT_LOCATION),
            }
        })
        .collect();

    debug!("Search page: {} results", results.len());
    results
}
