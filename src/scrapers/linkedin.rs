use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};

use crate::config::ScraperArgs;
use crate::error::AppError;
use crate::models::job::ScrapedJob;
use crate::scrapers::JobScraper;

/// Characters that encodeURIComponent does NOT encode.
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const BASE_URL: &str = "https://www.linkedin.com";
const ALLOWED_DOMAIN: &str = "linkedin.com";
const PAGE_SIZE: u32 = 25;
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Scrapes LinkedIn's public guest job search.
pub struct LinkedInScraper {
    client: reqwest::Client,
    base_url: String,
    keywords: String,
    location: String,
    max_pages: u32,
}

impl LinkedInScraper {
    pub fn new(args: &ScraperArgs) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(args.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            keywords: args.keywords.clone(),
            location: args.location.clone(),
            max_pages: args.max_pages,
        })
    }

    fn search_url(&self, start: u32) -> String {
        format!(
            "{}/jobs-guest/jobs/api/seeMoreJobPostings/search?keywords={}&location={}&start={start}",
            self.base_url,
            urlencoded(&self.keywords),
            urlencoded(&self.location)
        )
    }

    async fn fetch_html(&self, url: &str) -> Result<(StatusCode, String), reqwest::Error> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl JobScraper for LinkedInScraper {
    fn name(&self) -> &str {
        "linkedin"
    }

    async fn scrape_jobs(&self) -> Result<Vec<ScrapedJob>, AppError> {
        let mut collected = Vec::new();

        for page in 0..self.max_pages {
            let url = self.search_url(page * PAGE_SIZE);
            let (status, body) = self
                .fetch_html(&url)
                .await
                .map_err(|e| AppError::Internal(format!("LinkedIn request failed: {e}")))?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("LinkedIn returned 429 on page {page}, keeping {} jobs", collected.len());
                break;
            }
            if !status.is_success() {
                return Err(AppError::Internal(format!("LinkedIn returned {status}")));
            }

            let jobs = parse_search_page(&body);
            tracing::debug!("Page {page}: {} job cards", jobs.len());
            if jobs.is_empty() {
                break;
            }
            collected.extend(jobs);
        }

        tracing::info!("Scraped {} jobs from LinkedIn", collected.len());
        Ok(collected)
    }

    async fn get_job_description(&self, url: &str) -> String {
        if !is_linkedin_url(url) {
            tracing::warn!("Refusing to fetch description from non-LinkedIn URL {url}");
            return String::new();
        }
        match self.fetch_html(url).await {
            Ok((status, body)) if status.is_success() => {
                parse_description(&body).unwrap_or_else(|| {
                    tracing::warn!("No description markup found at {url}");
                    String::new()
                })
            }
            Ok((status, _)) => {
                tracing::warn!("Description fetch for {url} returned {status}");
                String::new()
            }
            Err(e) => {
                tracing::warn!("Description fetch for {url} failed: {e}");
                String::new()
            }
        }
    }
}

/// Only https URLs on linkedin.com or one of its subdomains are fetched.
fn is_linkedin_url(url: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    parsed.scheme() == "https"
        && parsed.host_str().is_some_and(|host| {
            host == ALLOWED_DOMAIN || host.ends_with(&format!(".{ALLOWED_DOMAIN}"))
        })
}

/// URL-encode a string for use in query parameters.
fn urlencoded(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_URI_COMPONENT_SET).to_string()
}

/// Parse one page of search result cards. Cards missing a title or company
/// are skipped.
fn parse_search_page(html: &str) -> Vec<ScrapedJob> {
    let document = Html::parse_fragment(html);
    let Ok(card_selector) = Selector::parse("div.base-search-card") else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .filter_map(parse_card)
        .collect()
}

fn parse_card(card: ElementRef<'_>) -> Option<ScrapedJob> {
    let title = select_text(card, ".base-search-card__title")?;
    let company = select_text(card, ".base-search-card__subtitle")?;
    let location = select_text(card, ".job-search-card__location");

    let job_url = select_attr(card, "a.base-card__full-link", "href")
        .and_then(|href| href.split('?').next().map(String::from));

    let job_posting_id = card
        .value()
        .attr("data-entity-urn")
        .and_then(|urn| urn.rsplit(':').next())
        .filter(|id| !id.is_empty())
        .map(String::from);

    let date = select_attr(card, "time", "datetime")
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

    Some(ScrapedJob {
        title,
        company,
        location,
        job_posting_id,
        job_url,
        date,
    })
}

/// Extract the description body from a posting page.
fn parse_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    ["div.show-more-less-html__markup", "div.description__text"]
        .into_iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| normalize_whitespace(el.text()))
                .filter(|text| !text.is_empty())
        })
}

fn select_text(el: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    el.select(&selector)
        .next()
        .map(|found| normalize_whitespace(found.text()))
        .filter(|text| !text.is_empty())
}

fn select_attr(el: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    el.select(&selector)
        .next()
        .and_then(|found| found.value().attr(attr))
        .map(String::from)
}

fn normalize_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
