//! Ballotpedia scraping.
//!
//! Every selector and index in this module mirrors the markup of one external
//! site as it rendered the 2022 gubernatorial results. None of it is validated
//! against a schema: when the page changes, lookups fail with
//! [`ScrapeError::PageStructure`] instead of adapting.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AppConfig;

/// Election page slug appended to the lowercased state name.
pub const GOVERNOR_ELECTION_SUFFIX: &str = "_gubernatorial_election,_2022";
pub const RESULTS_CONTAINER_SELECTOR: &str = "div.results_table_container";
/// The first container on the page is the primary; the general election is second.
pub const RESULTS_CONTAINER_INDEX: usize = 1;
pub const RESULTS_TABLE_SELECTOR: &str = "table.results_table";
pub const RESULTS_ROW_SELECTOR: &str = "tr.results_row";
pub const CANDIDATE_COLUMN: usize = 2;
pub const PERCENTAGE_COLUMN: usize = 3;

static RESULTS_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| selector(RESULTS_CONTAINER_SELECTOR));
static RESULTS_TABLE: LazyLock<Selector> = LazyLock::new(|| selector(RESULTS_TABLE_SELECTOR));
static TABLE_BODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static RESULTS_ROW: LazyLock<Selector> = LazyLock::new(|| selector(RESULTS_ROW_SELECTOR));
static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static STYLED: LazyLock<Selector> = LazyLock::new(|| selector("[style]"));

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("State/position not supported yet.")]
    UnsupportedPosition(String),
    #[error("failed to fetch {url}: {source}")]
    Connectivity {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("page request failed ({status}): {url}")]
    UpstreamStatus { url: String, status: StatusCode },
    #[error("unexpected page structure: {0}")]
    PageStructure(String),
    #[error("Description not found")]
    DescriptionNotFound,
}

/// Offices that have a known results page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Governor,
}

impl Position {
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        if raw.to_lowercase() == "governor" {
            Ok(Self::Governor)
        } else {
            Err(ScrapeError::UnsupportedPosition(raw.to_string()))
        }
    }

    fn page_suffix(self) -> &'static str {
        match self {
            Self::Governor => GOVERNOR_ELECTION_SUFFIX,
        }
    }
}

/// One results row: the candidate and, when the row has that column, their share of the vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateResult {
    pub candidate: String,
    pub percentage: Option<String>,
}

pub struct BallotClient {
    client: reqwest::Client,
    base_url: String,
    description_style: String,
}

impl BallotClient {
    pub fn new(cfg: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.ballot_base_url.trim_end_matches('/').to_string(),
            description_style: cfg.description_style.clone(),
        })
    }

    /// Look up the general election results for `state`.
    ///
    /// The position is checked before any request is made.
    pub async fn candidates(
        &self,
        state: &str,
        position: &str,
    ) -> Result<Vec<CandidateResult>, ScrapeError> {
        let position = Position::parse(position)?;
        let url = results_url(&self.base_url, state, position);
        let html = self.fetch(&url).await?;
        let results = parse_results_table(&html)?;
        debug!(%url, count = results.len(), "parsed results table");
        Ok(results)
    }

    /// Scrape the biography block from a candidate's page.
    pub async fn description(&self, candidate: &str) -> Result<String, ScrapeError> {
        let url = candidate_url(&self.base_url, candidate);
        let html = self.fetch(&url).await?;
        parse_description(&html, &self.description_style)
    }

    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Connectivity {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "page request failed");
            return Err(ScrapeError::UpstreamStatus {
                url: url.to_string(),
                status,
            });
        }

        response
            .text()
            .await
            .map_err(|source| ScrapeError::Connectivity {
                url: url.to_string(),
                source,
            })
    }
}

pub fn results_url(base_url: &str, state: &str, position: Position) -> String {
    format!(
        "{}/{}{}",
        base_url.trim_end_matches('/'),
        state.to_lowercase(),
        position.page_suffix()
    )
}

pub fn candidate_url(base_url: &str, candidate: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        candidate.replace(' ', "_")
    )
}

pub fn parse_results_table(html: &str) -> Result<Vec<CandidateResult>, ScrapeError> {
    let document = Html::parse_document(html);

    let container = document
        .select(&RESULTS_CONTAINER)
        .nth(RESULTS_CONTAINER_INDEX)
        .ok_or_else(|| {
            ScrapeError::PageStructure(format!(
                "results container #{RESULTS_CONTAINER_INDEX} not found"
            ))
        })?;

    let table = container
        .select(&RESULTS_TABLE)
        .next()
        .ok_or_else(|| ScrapeError::PageStructure("results table not found".to_string()))?;

    let body = table
        .select(&TABLE_BODY)
        .next()
        .ok_or_else(|| ScrapeError::PageStructure("results table has no body".to_string()))?;

    let mut results = Vec::new();
    for row in body.select(&RESULTS_ROW) {
        let columns: Vec<ElementRef> = row.select(&TABLE_CELL).collect();
        if columns.is_empty() {
            continue;
        }
        let Some(candidate) = columns.get(CANDIDATE_COLUMN) else {
            return Err(ScrapeError::PageStructure(format!(
                "results row has {} cells, expected at least {}",
                columns.len(),
                CANDIDATE_COLUMN + 1
            )));
        };
        results.push(CandidateResult {
            candidate: stripped_text(*candidate),
            percentage: columns.get(PERCENTAGE_COLUMN).map(|cell| stripped_text(*cell)),
        });
    }

    Ok(results)
}

/// Concatenate the text of every element whose `style` attribute is exactly `style`.
pub fn parse_description(html: &str, style: &str) -> Result<String, ScrapeError> {
    let document = Html::parse_document(html);

    let text: String = document
        .select(&STYLED)
        .filter(|el| el.value().attr("style") == Some(style))
        .flat_map(|el| el.text())
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(ScrapeError::DescriptionNotFound);
    }
    Ok(text.to_string())
}

/// Text fragments trimmed individually and joined without a separator.
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}
