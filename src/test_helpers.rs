//! Shared test utilities for the hubgen test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // Fixture site on disk
//! let tmp = setup_fixtures();
//! let articles = scan(&tmp.path().join("articles"), &MarkdownConfig::default()).unwrap();
//! let spring = find_article(&articles, "acme-spring-lineup");
//!
//! // In-memory articles
//! let a = article("Spring Lineup").brand("Acme").topics(&["Reviews"]).build();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Article, Term, article_url};
use serde_yaml_ng::Mapping;

/// Number of `*.md` files in `fixtures/content/articles/`.
pub const FIXTURE_ARTICLE_COUNT: usize = 5;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find an article by slug. Panics if not found.
pub fn find_article<'a>(articles: &'a [Article], slug: &str) -> &'a Article {
    articles.iter().find(|a| a.slug == slug).unwrap_or_else(|| {
        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        panic!("article '{slug}' not found. Available: {slugs:?}")
    })
}

/// Keys of a term list, in order.
pub fn term_keys(terms: &[Term]) -> Vec<&str> {
    terms.iter().map(|t| t.key.as_str()).collect()
}

// =========================================================================
// In-memory article builder
// =========================================================================

/// Start building an article with the given title. The slug is the
/// slugified title and the source defaults to `<slug>.md`.
pub fn article(title: &str) -> ArticleBuilder {
    ArticleBuilder {
        title: title.to_string(),
        brand: None,
        series: None,
        topics: Vec::new(),
        countries: Vec::new(),
        date: String::new(),
        summary: None,
        content: "<p>Body text.</p>".to_string(),
        meta: Mapping::new(),
        source: None,
    }
}

pub struct ArticleBuilder {
    title: String,
    brand: Option<String>,
    series: Option<String>,
    topics: Vec<String>,
    countries: Vec<String>,
    date: String,
    summary: Option<String>,
    content: String,
    meta: Mapping,
    source: Option<String>,
}

impl ArticleBuilder {
    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn series(mut self, series: &str) -> Self {
        self.series = Some(series.to_string());
        self
    }

    pub fn topics(mut self, topics: &[&str]) -> Self {
        self.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Already-normalized date string.
    pub fn date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Rendered HTML body.
    pub fn content(mut self, html: &str) -> Self {
        self.content = html.to_string();
        self
    }

    /// Front-matter mapping from a YAML snippet.
    pub fn meta(mut self, yaml: &str) -> Self {
        self.meta = serde_yaml_ng::from_str(yaml).unwrap();
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn build(self) -> Article {
        let slug = crate::slug::slugify(&self.title);
        let source = self.source.unwrap_or_else(|| format!("{slug}.md"));
        Article {
            url: article_url(&slug),
            title: self.title,
            brand: self.brand.as_deref().and_then(Term::new),
            series: self.series.as_deref().and_then(Term::new),
            topics: Term::collect(self.topics.iter().map(String::as_str)),
            countries: Term::collect(self.countries.iter().map(String::as_str)),
            date: self.date,
            summary: self.summary,
            content: self.content,
            meta: self.meta,
            source,
            slug,
        }
    }
}
