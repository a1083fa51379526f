//! Shared types passed between the scan, index and generate stages.

use crate::slug::slugify;
use serde::Serialize;
use serde_yaml_ng::Mapping;

/// A taxonomy value: the slugified key used for grouping and paths, plus the
/// text as first written, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub key: String,
    pub label: String,
}

impl Term {
    /// `None` when the text slugifies to nothing.
    pub fn new(label: &str) -> Option<Self> {
        let label = label.trim();
        let key = slugify(label);
        (!key.is_empty()).then(|| Self {
            key,
            label: label.to_string(),
        })
    }

    /// Build terms from free text, dropping empties and keys already seen.
    ///
    /// `["Reviews", "news", "REVIEWS"]` → keys `["reviews", "news"]`, first label kept.
    pub fn collect<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<Self> {
        let mut terms: Vec<Self> = Vec::new();
        for term in labels.into_iter().filter_map(Self::new) {
            if !terms.iter().any(|t| t.key == term.key) {
                terms.push(term);
            }
        }
        terms
    }
}

/// One parsed article.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    /// Output file stem under `articles/`. Expected unique per build.
    pub slug: String,
    /// Site-absolute URL of the article page.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Term>,
    /// Only meaningful together with `brand`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Term>,
    pub topics: Vec<Term>,
    pub countries: Vec<Term>,
    /// Canonical `YYYY-MM-DD`, trimmed original text, or empty. Sort key only.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Rendered HTML fragment.
    pub content: String,
    /// Every front-matter key, known or not.
    pub meta: Mapping,
    /// Path relative to the articles directory.
    pub source: String,
}

impl Article {
    /// Composite brand+series key, `"{brand}-{series}"`.
    pub fn series_key(&self) -> Option<String> {
        match (&self.brand, &self.series) {
            (Some(brand), Some(series)) => Some(format!("{}-{}", brand.key, series.key)),
            _ => None,
        }
    }

    pub fn has_topic(&self, key: &str) -> bool {
        self.topics.iter().any(|t| t.key == key)
    }

    pub fn has_country(&self, key: &str) -> bool {
        self.countries.iter().any(|c| c.key == key)
    }
}

/// Site-absolute URL for an article slug.
pub fn article_url(slug: &str) -> String {
    format!("/articles/{slug}.html")
}

/// A `{title, url, summary}` record, the unit every listing is built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub date: String,
}

impl From<&Article> for ListItem {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            summary: article.summary.clone(),
            date: article.date.clone(),
        }
    }
}
