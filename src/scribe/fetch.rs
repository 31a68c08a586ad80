// SPDX-License-Identifier: MIT

//! Web fetcher - retrieves a page and extracts its readable text
//!
//! Extraction mirrors what a reader would see: navigation chrome and
//! scripts are dropped, the main article container is preferred over the
//! whole body, and only paragraph-like blocks are kept.

use crate::scribe::config::FetchConfig;
use crate::scribe::error::FetchError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

const NO_TITLE: &str = "No title found";

/// Text extracted from a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// Source of web page text for the research agent
#[async_trait]
pub trait WebFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = validate_url(url)?;
        log::info!("Fetching {}", parsed);

        let resp = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let html = resp.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;
        log::debug!("Fetched {} bytes from {}", html.len(), url);

        let page = extract_page(url, &html);
        if page.content.is_empty() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }
        log::info!("Scraped article: {}", page.title);
        Ok(page)
    }
}

/// Accept only absolute http(s) URLs
pub fn validate_url(raw: &str) -> Result<url::Url, FetchError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

// --- Static patterns ---

fn element(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}\s*>")).expect("valid element pattern")
}

fn class_container(class: &str) -> Regex {
    // Matches an opening tag whose class list contains `class` exactly; the
    // capture runs to the end of the document since nesting can't be matched.
    Regex::new(&format!(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bclass\s*=\s*(?:"(?:[^"]*\s)?{class}(?:\s[^"]*)?"|'(?:[^']*\s)?{class}(?:\s[^']*)?')[^>]*>(.*)"#
    ))
    .expect("valid class pattern")
}

static CHROME: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["script", "style", "nav", "footer", "header", "noscript"]
        .iter()
        .map(|tag| element(tag))
        .collect()
});

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid pattern"));

static H1: Lazy<Regex> = Lazy::new(|| element("h1"));
static TITLE: Lazy<Regex> = Lazy::new(|| element("title"));
static BODY: Lazy<Regex> = Lazy::new(|| element("body"));

static CONTAINERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        element("article"),
        element("main"),
        class_container("post-content"),
        class_container("article-content"),
        class_container("content"),
    ]
});

static BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:p|h1|h2|h3|h4|li)\b[^>]*>(.*?)</(?:p|h1|h2|h3|h4|li)\s*>")
        .expect("valid pattern")
});

static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid pattern"));

/// Extract title and readable text from raw HTML
pub fn extract_page(url: &str, html: &str) -> FetchedPage {
    let mut cleaned = COMMENTS.replace_all(html, "").into_owned();
    for pattern in CHROME.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let title = [&*H1, &*TITLE]
        .iter()
        .find_map(|re| re.captures(&cleaned).map(|c| inner_text(&c[1])))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let container = CONTAINERS
        .iter()
        .find_map(|re| re.captures(&cleaned).map(|c| c[1].to_string()))
        .or_else(|| BODY.captures(&cleaned).map(|c| c[1].to_string()))
        .unwrap_or_else(|| cleaned.clone());

    let blocks: Vec<String> = BLOCKS
        .captures_iter(&container)
        .map(|c| inner_text(&c[1]))
        .filter(|t| !t.is_empty())
        .collect();

    let content = if blocks.is_empty() {
        TAGS.replace_all(&container, "\n")
            .lines()
            .map(|line| collapse_whitespace(&decode_entities(line)))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        blocks.join("\n")
    };

    FetchedPage {
        url: url.to_string(),
        title,
        content,
    }
}

/// Text of an HTML fragment on a single line
fn inner_text(fragment: &str) -> String {
    let stripped = TAGS.replace_all(fragment, " ");
    collapse_whitespace(&decode_entities(&stripped))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&rsquo;", "'")
        .replace("&lsquo;", "'")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&mdash;", "-")
        .replace("&ndash;", "-")
        .replace("&amp;", "&")
}
