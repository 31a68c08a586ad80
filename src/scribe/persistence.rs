// SPDX-License-Identifier: MIT

//! Persistence - writes an article as front matter plus body
//!
//! The file is a YAML front matter block between `---` fences followed by
//! the Markdown/MDX body. The write is a single direct write.

use crate::scribe::error::{PersistenceError, ScribeError};
use crate::scribe::state::Article;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ARTICLE_EXTENSION: &str = "mdx";
const FENCE: &str = "---";

/// Metadata header of an article file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontMatter {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<&Article> for FrontMatter {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            published_at: article.published_at.clone(),
            author: article.author.clone(),
            category: article.category.clone(),
            tags: article.tags.clone(),
        }
    }
}

/// URL-safe slug: lowercase ASCII alphanumerics joined by single dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "article".to_string()
    } else {
        slug
    }
}

/// Reduce a caller-supplied filename to a safe basename.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = Path::new(raw.trim()).file_name()?.to_str()?;

    let mut name = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '-'
        };
        if c == '-' && name.ends_with('-') {
            continue;
        }
        name.push(c);
    }

    let name = name
        .trim_start_matches(['.', '-'])
        .trim_end_matches(['.', '-']);
    if !name.chars().any(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    if Path::new(name).extension().is_some() {
        Some(name.to_string())
    } else {
        Some(format!("{}.{}", name, ARTICLE_EXTENSION))
    }
}

/// Output filename for an article
pub fn resolve_filename(article: &Article, filename: Option<&str>) -> String {
    filename
        .and_then(|f| {
            let sanitized = sanitize_filename(f);
            if sanitized.is_none() {
                log::warn!("Filename '{}' is unusable, deriving one from the slug", f);
            }
            sanitized
        })
        .unwrap_or_else(|| format!("{}.{}", article.slug, ARTICLE_EXTENSION))
}

/// Render an article file
pub fn render_article(article: &Article) -> Result<String, ScribeError> {
    let front_matter = serde_yaml::to_string(&FrontMatter::from(article))?;
    Ok(format!(
        "{fence}\n{front_matter}{fence}\n\n{body}\n",
        fence = FENCE,
        front_matter = front_matter,
        body = article.body.trim()
    ))
}

/// Split an article file back into front matter and body.
///
/// CRLF line endings are accepted.
pub fn parse_front_matter(text: &str) -> Result<(FrontMatter, String), ScribeError> {
    let text = text.replace("\r\n", "\n");
    let rest = text
        .strip_prefix("---\n")
        .ok_or_else(|| ScribeError::front_matter("file does not start with a '---' fence"))?;
    let end = rest
        .find("\n---\n")
        .or_else(|| rest.strip_suffix("\n---").map(str::len))
        .ok_or_else(|| ScribeError::front_matter("closing '---' fence not found"))?;

    let front_matter: FrontMatter = serde_yaml::from_str(&rest[..=end])
        .map_err(|e| ScribeError::front_matter(e.to_string()))?;
    let body = rest.get(end + 5..).unwrap_or_default().trim().to_string();
    Ok((front_matter, body))
}

/// Write the article into `articles_dir` and return the file path
pub fn save(
    article: &Article,
    filename: Option<&str>,
    articles_dir: &Path,
) -> Result<PathBuf, ScribeError> {
    let path = articles_dir.join(resolve_filename(article, filename));
    let contents = render_article(article)?;

    fs::create_dir_all(articles_dir).map_err(|source| PersistenceError {
        path: articles_dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, contents).map_err(|source| PersistenceError {
        path: path.clone(),
        source,
    })?;

    log::info!("Article saved to: {}", path.display());
    Ok(path)
}
