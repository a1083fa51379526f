//! Article discovery and parsing.
//!
//! Stage 1 of the build. Reads every `*.md` file directly inside the articles
//! directory, splits off its front-matter and produces an [`Article`] per file.
//!
//! ## Directory Structure
//!
//! ```text
//! articles/
//! ├── acme-spring-lineup.md
//! ├── acme-summer-recall.md
//! ├── drafts/              # Subdirectories are ignored
//! └── .notes.md            # Hidden files are ignored
//! ```
//!
//! Files are read in file-name order. That order is the *ingestion order*,
//! which breaks ties between articles with the same date everywhere
//! downstream.
//!
//! ## Field Resolution
//!
//! | Field | Source | Fallback |
//! |-------|--------|----------|
//! | title | `title` | `"Untitled"` |
//! | slug | `slug`, else `title`, slugified | file stem, then `"untitled"` |
//! | brand / series | `brand` / `series`, slugified key + original label | absent |
//! | topics / countries | list or single string, slugified, de-duplicated | empty |
//! | date | `date`, normalized | `""` |
//! | summary | `summary` | absent |
//!
//! Any malformed file aborts the scan. Nothing has been written yet at that
//! point, so the previous build output survives.

use crate::config::MarkdownConfig;
use crate::dates::{DateValue, normalize_date};
use crate::frontmatter::{self, DocumentReader, FrontMatterError, YamlFrontMatter};
use crate::markdown;
use crate::slug::slugify;
use crate::types::{Article, Term, article_url};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const UNTITLED: &str = "Untitled";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Articles directory not found: {0}")]
    MissingArticlesDir(PathBuf),
    #[error("{path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Scan the articles directory into articles, in ingestion order.
pub fn scan(articles_dir: &Path, markdown: &MarkdownConfig) -> Result<Vec<Article>, ScanError> {
    if !articles_dir.is_dir() {
        return Err(ScanError::MissingArticlesDir(articles_dir.to_path_buf()));
    }

    let reader = YamlFrontMatter;
    let mut articles = Vec::new();
    for path in article_files(articles_dir)? {
        let text = fs::read_to_string(&path)?;
        let source = path
            .strip_prefix(articles_dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .to_string();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let article = parse_article(&reader, &text, &stem, &source, markdown)
            .map_err(|source| ScanError::FrontMatter {
                path: path.clone(),
                source,
            })?;
        log::debug!("parsed {} as '{}'", article.source, article.slug);
        articles.push(article);
    }
    Ok(articles)
}

/// Markdown files directly inside `dir`, sorted by file name.
fn article_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        let is_markdown = entry
            .path()
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));
        if entry.file_type().is_file() && is_markdown && !name.starts_with('.') {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Parse one article file's text.
///
/// `stem` is the file name without extension (slug fallback); `source` is the
/// path shown in reports.
pub fn parse_article(
    reader: &impl DocumentReader,
    text: &str,
    stem: &str,
    source: &str,
    markdown_config: &MarkdownConfig,
) -> Result<Article, FrontMatterError> {
    let doc = reader.read(text)?;
    let meta = doc.meta;

    let title = frontmatter::get_str(&meta, "title").unwrap_or_else(|| UNTITLED.to_string());
    let slug = resolve_slug(frontmatter::get_str(&meta, "slug").as_deref(), &title, stem);

    let brand = frontmatter::get_str(&meta, "brand").and_then(|b| Term::new(&b));
    let series = frontmatter::get_str(&meta, "series").and_then(|s| Term::new(&s));

    let topics = frontmatter::get_list(&meta, "topics");
    let countries = frontmatter::get_list(&meta, "countries");

    let date_value = meta.get("date").and_then(DateValue::from_yaml);
    let date = normalize_date(date_value.as_ref());

    let summary = frontmatter::get_str(&meta, "summary");
    let content = markdown::render(&doc.body, markdown_config);

    Ok(Article {
        title,
        url: article_url(&slug),
        slug,
        brand,
        series,
        topics: Term::collect(topics.iter().map(String::as_str)),
        countries: Term::collect(countries.iter().map(String::as_str)),
        date,
        summary,
        content,
        meta,
        source: source.to_string(),
    })
}

/// First non-empty slug among: explicit slug, title, file stem.
fn resolve_slug(explicit: Option<&str>, title: &str, stem: &str) -> String {
    explicit
        .into_iter()
        .chain([title, stem])
        .map(slugify)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "untitled".to_string())
}
