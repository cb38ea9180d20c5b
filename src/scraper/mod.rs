pub mod cleaner;
pub mod http_client;
pub mod navigator;
pub mod parsers;
pub mod regions;

use crate::config::ClientConfig;
use crate::error::{Result, SaferError};
use crate::models::{CompanyResult, CompanySnapshot};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};
use url::Url;

use self::cleaner::normalise_query;
use self::http_client::HttpClient;
use self::parsers::{parse_search_page, parse_snapshot_page};

// ── Source trait ──────────────────────────────────────────────────────────────

/// Anything that can answer carrier lookups.
#[async_trait]
pub trait CarrierSource: Send + Sync {
    async fn get_company_by_dot_number(&self, dot_number: &str) -> Result<CompanySnapshot>;

    /// `mc_mx` is the bare number; an `MC-`/`MX-`/`FF-` prefix is stripped.
    async fn get_company_by_mc_mx(&self, mc_mx: &str) -> Result<CompanySnapshot>;

    async fn search_companies_by_name(&self, name: &str) -> Result<Vec<CompanyResult>>;

    /// Full snapshot for a row of a name search.
    async fn snapshot_for_result(&self, result: &CompanyResult) -> Result<CompanySnapshot> {
        self.get_company_by_dot_number(&result.dot_number).await
    }
}

/// Which identifier a snapshot query is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    UsDot,
    McMx,
}

impl QueryParam {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryParam::UsDot => "USDOT",
            QueryParam::McMx => "MC_MX",
        }
    }
}

// ── SAFER client ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SaferClient {
    client: HttpClient,
    snapshot_url: String,
    search_url: String,
}

impl SaferClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            snapshot_url: config.snapshot_url.clone(),
            search_url: config.search_url.clone(),
        })
    }

    /// e.g. query.asp?searchType=ANY&query_type=queryCarrierSnapshot&query_param=USDOT&query_string=264184
    pub fn snapshot_url(&self, param: QueryParam, value: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.snapshot_url,
            &[
                ("searchType", "ANY"),
                ("query_type", "queryCarrierSnapshot"),
                ("query_param", param.as_str()),
                ("query_string", value),
            ],
        )
        .map_err(|source| SaferError::InvalidUrl {
            url: self.snapshot_url.clone(),
            source,
        })
    }

    /// e.g. keywordx.asp?SEARCHTYPE=&searchstring=*SCHNEIDER*
    pub fn search_url(&self, name: &str) -> Result<Url> {
        let pattern = format!("*{}*", name.to_uppercase());
        Url::parse_with_params(
            &self.search_url,
            &[("SEARCHTYPE", ""), ("searchstring", pattern.as_str())],
        )
        .map_err(|source| SaferError::InvalidUrl {
            url: self.search_url.clone(),
            source,
        })
    }

    async fn fetch_snapshot(&self, param: QueryParam, value: &str) -> Result<CompanySnapshot> {
        let value = normalise_query(value);
        info!("Fetching snapshot {}={}", param.as_str(), value);

        let url = self.snapshot_url(param, &value)?;
        let html = self.client.post_text(url).await?;
        parse_snapshot_page(&html)
    }
}

#[async_trait]
impl CarrierSource for SaferClient {
    async fn get_company_by_dot_number(&self, dot_number: &str) -> Result<CompanySnapshot> {
        self.fetch_snapshot(QueryParam::UsDot, dot_number).await
    }

    async fn get_company_by_mc_mx(&self, mc_mx: &str) -> Result<CompanySnapshot> {
        self.fetch_snapshot(QueryParam::McMx, mc_mx).await
    }

    async fn search_companies_by_name(&self, name: &str) -> Result<Vec<CompanyResult>> {
        info!("Searching companies by name {:?}", name);

        let url = self.search_url(name)?;
        let html = self.client.post_text(url).await?;
        let results = parse_search_page(&html);

        debug!("{:?}: {} results", name, results.len());
        Ok(results)
    }
}

// ── Process-wide default client ───────────────────────────────────────────────

static DEFAULT_CLIENT: Mutex<Option<Arc<SaferClient>>> = Mutex::new(None);

/// Client built from [`ClientConfig::default`], created on first use.
pub fn default_client() -> Result<Arc<SaferClient>> {
    let mut slot = DEFAULT_CLIENT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(client) = slot.as_ref() {
        return Ok(Arc::clone(client));
    }

    debug!("Building default SAFER client");
    let client = Arc::new(SaferClient::new(&ClientConfig::default())?);
    *slot = Some(Arc::clone(&client));
    Ok(client)
}

pub async fn get_company_by_dot_number(dot_number: &str) -> Result<CompanySnapshot> {
    default_client()?.get_company_by_dot_number(dot_number).await
}

pub async fn get_company_by_mc_mx(mc_mx: &str) -> Result<CompanySnapshot> {
    default_client()?.get_company_by_mc_mx(mc_mx).await
}

pub async fn search_companies_by_name(name: &str) -> Result<Vec<CompanyResult>> {
    default_client()?.search_companies_by_name(name).await
}
