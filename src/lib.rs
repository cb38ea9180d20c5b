//! Company snapshots and name searches from the FMCSA SAFER website.
//!
//! ```no_run
//! # async fn demo() -> safer_snapshot::Result<()> {
//! let snapshot = safer_snapshot::get_company_by_dot_number("264184").await?;
//! println!("{} ({})", snapshot.legal_name, snapshot.operating_status);
//!
//! for result in safer_snapshot::search_companies_by_name("schneider").await? {
//!     println!("{} {} {}", result.dot_number, result.name, result.location);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Saved pages can be parsed without the network through
//! [`parse_snapshot_page`] and [`parse_search_page`].

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod utils;

pub use crate::config::{AppConfig, ClientConfig, PipelineConfig};
pub use crate::error::{Result, SaferError};
pub use crate::models::{
    CompanyResult, CompanySnapshot, CrashSummary, InspectionSummary, SafetyRating,
};
pub use crate::scraper::parsers::{parse_search_page, parse_snapshot_page};
pub use crate::scraper::{
    CarrierSource, QueryParam, SaferClient, get_company_by_dot_number, get_company_by_mc_mx,
    search_companies_by_name,
};
