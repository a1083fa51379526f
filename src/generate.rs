//! HTML site generation.
//!
//! Stage 3 of the build. Takes the [`SiteIndex`] and a theme and writes the
//! final static site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): every article, newest first
//! - **Article pages** (`/articles/<slug>.html`): rendered body, taxonomy links,
//!   related articles
//! - **Hub pages**: one per brand, brand+series, topic and country (paths per
//!   [`routes`](crate::routes))
//!
//! ## Output Structure (flat layout)
//!
//! ```text
//! builds/
//! ├── index.html
//! ├── style.css                  # Built-in theme only
//! ├── articles/
//! │   ├── spring-lineup.html
//! │   └── summer-recall.html
//! ├── brand/
//! │   ├── acme.html
//! │   └── acme-spring-24.html    # Brand + series
//! ├── topic/
//! │   └── reviews.html
//! └── country/
//!     └── france.html
//! ```
//!
//! ## All-or-nothing
//!
//! Every page is rendered into memory first ([`plan_pages`]). The output
//! directory is only wiped and rewritten once that has succeeded, so a
//! template error leaves the previous build in place.

use crate::config::{HubLayout, SiteConfig, SitePaths};
use crate::index::{HubGroup, HubKind, SiteIndex};
use crate::render::{ArticleView, HubLink, HubView, PageRenderer, RenderError};
use crate::routes::{self, PathCollision};
use crate::types::{Article, ListItem, Term};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HOME_TITLE: &str = "Index";
pub const HOME_DESCRIPTION: &str = "Latest articles";
pub const STYLESHEET: &str = "style.css";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Refusing to write output to {0}: it would delete the site's own sources")]
    UnsafeOutput(PathBuf),
}

/// One page to write: path relative to the output root, and its HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct PageJob {
    pub output_path: String,
    pub kind: PageKind,
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Article,
    Hub(HubKind),
}

/// What a finished generate wrote.
#[derive(Debug)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub theme: &'static str,
    pub pages: Vec<PageJob>,
    pub assets_copied: usize,
    /// Hub pages that overwrote one another.
    pub path_collisions: Vec<PathCollision>,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// Render the whole site, then replace the output directory with it.
pub fn generate(
    index: &SiteIndex,
    config: &SiteConfig,
    paths: &SitePaths,
    theme: &dyn PageRenderer,
) -> Result<GenerateReport, GenerateError> {
    check_output_dir(paths)?;

    let pages = plan_pages(index, config, theme)?;
    let path_collisions = hub_path_collisions(index, config.layout.hubs);
    let stylesheet = theme.stylesheet();
    log::debug!("rendered {} pages with the {} theme", pages.len(), theme.name());

    reset_output(&paths.output, config.layout.hubs)?;
    for page in &pages {
        let path = paths.output.join(&page.output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &page.html)?;
    }
    if let Some(css) = stylesheet {
        fs::write(paths.output.join(STYLESHEET), css)?;
    }
    let assets_copied = copy_assets(&paths.assets, &paths.output)?;

    log::info!("wrote {} pages to {}", pages.len(), paths.output.display());
    Ok(GenerateReport {
        output_dir: paths.output.clone(),
        theme: theme.name(),
        pages,
        assets_copied,
        path_collisions,
    })
}

/// Hubs sharing an output path under `layout`, each logged as a warning.
pub fn hub_path_collisions(index: &SiteIndex, layout: HubLayout) -> Vec<PathCollision> {
    let collisions = routes::path_collisions(layout, index.all_groups());
    for collision in &collisions {
        log::warn!(
            "{} is written by {}; only the last one is kept",
            collision.path,
            collision.hubs.join(", ")
        );
    }
    collisions
}

/// Render every page into memory. Nothing is written.
///
/// Order: home, articles in ingestion order, then hubs by kind and key. With
/// duplicate slugs the later article comes later, so it is the one left on
/// disk. The same goes for hubs sharing a path (see [`hub_path_collisions`]).
pub fn plan_pages(
    index: &SiteIndex,
    config: &SiteConfig,
    theme: &dyn PageRenderer,
) -> Result<Vec<PageJob>, GenerateError> {
    let layout = config.layout.hubs;
    let site_title = config.site_title.as_str();
    let mut pages = Vec::new();

    let home = HubView {
        site_title,
        title: HOME_TITLE.to_string(),
        description: Some(HOME_DESCRIPTION.to_string()),
        items: index.home_articles().map(ListItem::from).collect(),
    };
    pages.push(PageJob {
        output_path: routes::HOME_PATH.to_string(),
        kind: PageKind::Home,
        html: theme.render_hub(&home)?,
    });

    for (pos, article) in index.articles.iter().enumerate() {
        let related = if config.related.enabled {
            index
                .related(pos, config.related.limit)
                .into_iter()
                .map(ListItem::from)
                .collect()
        } else {
            Vec::new()
        };
        let view = article_view(index, layout, site_title, article, related);
        pages.push(PageJob {
            output_path: routes::article_path(&article.slug),
            kind: PageKind::Article,
            html: theme.render_article(&view)?,
        });
    }

    for group in index.all_groups() {
        let view = HubView {
            site_title,
            title: group.title(),
            description: None,
            items: index.list_items(group),
        };
        pages.push(PageJob {
            output_path: routes::hub_path(layout, group),
            kind: PageKind::Hub(group.kind),
            html: theme.render_hub(&view)?,
        });
    }

    Ok(pages)
}

fn article_view<'a>(
    index: &SiteIndex,
    layout: HubLayout,
    site_title: &'a str,
    article: &'a Article,
    related: Vec<ListItem>,
) -> ArticleView<'a> {
    let hub_link = |group: &HubGroup| HubLink {
        label: group.label.clone(),
        url: routes::hub_url(layout, group),
    };
    let link = |kind: HubKind, key: &str| index.group(kind, key).map(hub_link);
    let links = |kind: HubKind, terms: &[Term]| -> Vec<HubLink> {
        terms.iter().filter_map(|t| link(kind, &t.key)).collect()
    };

    ArticleView {
        site_title,
        article,
        brand: article
            .brand
            .as_ref()
            .and_then(|b| link(HubKind::Brand, &b.key)),
        series: match (&article.brand, &article.series) {
            (Some(brand), Some(series)) => {
                index.series_group(&brand.key, &series.key).map(hub_link)
            }
            _ => None,
        },
        topics: links(HubKind::Topic, &article.topics),
        countries: links(HubKind::Country, &article.countries),
        related,
    }
}

/// Refuse an output directory that is, or contains, the site's inputs.
pub fn check_output_dir(paths: &SitePaths) -> Result<(), GenerateError> {
    let output = normalize(&paths.output);
    for input in [&paths.root, &paths.articles, &paths.templates, &paths.assets] {
        let input = normalize(input);
        if input.starts_with(&output) {
            return Err(GenerateError::UnsafeOutput(paths.output.clone()));
        }
    }
    Ok(())
}

/// Canonical form when the path exists, lexical cleanup otherwise.
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Delete the previous build and lay out the directory skeleton.
fn reset_output(output: &Path, layout: HubLayout) -> Result<(), GenerateError> {
    if output.exists() {
        log::debug!("removing previous build at {}", output.display());
        fs::remove_dir_all(output)?;
    }
    for dir in routes::skeleton(layout) {
        fs::create_dir_all(output.join(dir))?;
    }
    Ok(())
}

/// Copy the static assets directory into the output root. Returns the number
/// of files copied; a missing directory copies nothing.
fn copy_assets(assets: &Path, output: &Path) -> Result<usize, GenerateError> {
    if !assets.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in walkdir::WalkDir::new(assets).min_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let rel = entry.path().strip_prefix(assets).unwrap_or(entry.path());
        let dest = output.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BuiltinTheme, Partials};
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn acme_index() -> SiteIndex {
        SiteIndex::build(vec![
            article("First")
                .brand("Acme")
                .series("Spring")
                .topics(&["Reviews"])
                .countries(&["France"])
                .date("2024-01-10")
                .build(),
            article("Second")
                .brand("acme")
                .topics(&["Reviews", "News"])
                .date("2024-02-01")
                .build(),
        ])
    }

    fn theme(config: &SiteConfig) -> BuiltinTheme {
        BuiltinTheme::new(config, Partials::default())
    }

    fn site(tmp: &TempDir) -> SitePaths {
        let root = tmp.path();
        fs::create_dir_all(root.join("articles")).unwrap();
        SiteConfig::default().paths.resolve(root)
    }

    fn paths_of(pages: &[PageJob]) -> Vec<&str> {
        pages.iter().map(|p| p.output_path.as_str()).collect()
    }

    #[test]
    fn plan_covers_every_page_flat() {
        let config = SiteConfig::default();
        let pages = plan_pages(&acme_index(), &config, &theme(&config)).unwrap();
        assert_eq!(
            paths_of(&pages),
            vec![
                "index.html",
                "articles/first.html",
                "articles/second.html",
                "brand/acme.html",
                "brand/acme-spring.html",
                "topic/news.html",
                "topic/reviews.html",
                "country/france.html",
            ]
        );
    }

    #[test]
    fn plan_nested_layout() {
        let mut config = SiteConfig::default();
        config.layout.hubs = HubLayout::Nested;
        let pages = plan_pages(&acme_index(), &config, &theme(&config)).unwrap();
        let paths = paths_of(&pages);
        assert!(paths.contains(&"brands/acme/index.html"));
        assert!(paths.contains(&"brands/acme/spring/index.html"));
        assert!(paths.contains(&"topics/reviews/index.html"));
        assert!(paths.contains(&"countries/france/index.html"));
    }

    #[test]
    fn home_lists_newest_first() {
        let config = SiteConfig::default();
        let pages = plan_pages(&acme_index(), &config, &theme(&config)).unwrap();
        let home = &pages[0].html;
        assert!(home.contains("<h1>Index</h1>"));
        assert!(home.contains("Latest articles"));
        let second = home.find("/articles/second.html").unwrap();
        let first = home.find("/articles/first.html").unwrap();
        assert!(second < first);
    }

    #[test]
    fn article_links_point_at_hubs() {
        let config = SiteConfig::default();
        let pages = plan_pages(&acme_index(), &config, &theme(&config)).unwrap();
        let first = &pages[1].html;
        assert!(first.contains(r#"href="/brand/acme.html""#));
        assert!(first.contains(r#"href="/brand/acme-spring.html""#));
        assert!(first.contains(r#"href="/topic/reviews.html""#));
        assert!(first.contains(r#"href="/country/france.html""#));
        // Second shares brand and topic.
        assert!(first.contains(r#"href="/articles/second.html""#));
    }

    #[test]
    fn related_disabled_renders_no_related_block() {
        let mut config = SiteConfig::default();
        config.related.enabled = false;
        let pages = plan_pages(&acme_index(), &config, &theme(&config)).unwrap();
        assert!(!pages[1].html.contains("/articles/second.html"));
    }

    #[test]
    fn generate_writes_pages_and_stylesheet() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        let config = SiteConfig::default();

        let report = generate(&acme_index(), &config, &paths, &theme(&config)).unwrap();
        assert_eq!(report.count(PageKind::Home), 1);
        assert_eq!(report.count(PageKind::Article), 2);
        assert_eq!(report.count(PageKind::Hub(HubKind::Topic)), 2);
        assert_eq!(report.theme, "built-in");

        let out = &paths.output;
        assert!(out.join("index.html").is_file());
        assert!(out.join("articles/first.html").is_file());
        assert!(out.join("brand/acme-spring.html").is_file());
        assert!(out.join("style.css").is_file());
    }

    #[test]
    fn generate_replaces_previous_output_and_keeps_skeleton() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        fs::create_dir_all(paths.output.join("brand")).unwrap();
        fs::write(paths.output.join("brand/stale.html"), "old").unwrap();

        let config = SiteConfig::default();
        let index = SiteIndex::build(vec![article("Bare").build()]);
        generate(&index, &config, &paths, &theme(&config)).unwrap();

        assert!(!paths.output.join("brand/stale.html").exists());
        for dir in ["articles", "brand", "topic", "country"] {
            assert!(paths.output.join(dir).is_dir(), "{dir} missing");
        }
    }

    #[test]
    fn generate_copies_assets() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        fs::create_dir_all(paths.assets.join("img")).unwrap();
        fs::write(paths.assets.join("favicon.ico"), "icon").unwrap();
        fs::write(paths.assets.join("img/logo.svg"), "<svg/>").unwrap();

        let config = SiteConfig::default();
        let index = SiteIndex::build(vec![article("A").build()]);
        let report = generate(&index, &config, &paths, &theme(&config)).unwrap();

        assert_eq!(report.assets_copied, 2);
        assert!(paths.output.join("favicon.ico").is_file());
        assert!(paths.output.join("img/logo.svg").is_file());
    }

    #[test]
    fn duplicate_slug_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        let config = SiteConfig::default();
        let index = SiteIndex::build(vec![
            article("Same").summary("from a").source("a.md").build(),
            article("Same").summary("from b").source("b.md").build(),
        ]);
        generate(&index, &config, &paths, &theme(&config)).unwrap();

        let html = fs::read_to_string(paths.output.join("articles/same.html")).unwrap();
        assert!(html.contains("from b"));
    }

    #[test]
    fn flat_brand_and_series_path_clash_is_reported() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        let config = SiteConfig::default();
        let index = SiteIndex::build(vec![
            article("Brand only").brand("Acme Spring").build(),
            article("Series member").brand("Acme").series("Spring").build(),
        ]);
        let report = generate(&index, &config, &paths, &theme(&config)).unwrap();

        assert_eq!(
            report.path_collisions,
            vec![PathCollision {
                path: "brand/acme-spring.html".to_string(),
                hubs: vec![
                    "Brand: Acme Spring".to_string(),
                    "Series: Acme / Spring".to_string(),
                ],
            }]
        );
        let html = fs::read_to_string(paths.output.join("brand/acme-spring.html")).unwrap();
        assert!(html.contains("Series: Acme / Spring"));
    }

    #[test]
    fn nested_series_with_same_composite_key_get_their_own_pages() {
        let mut config = SiteConfig::default();
        config.layout.hubs = HubLayout::Nested;
        let index = SiteIndex::build(vec![
            article("One").brand("a-b").series("c").build(),
            article("Two").brand("a").series("b-c").build(),
        ]);
        let pages = plan_pages(&index, &config, &theme(&config)).unwrap();
        let paths = paths_of(&pages);
        assert!(paths.contains(&"brands/a-b/c/index.html"));
        assert!(paths.contains(&"brands/a/b-c/index.html"));
        assert!(hub_path_collisions(&index, HubLayout::Nested).is_empty());

        let two = pages
            .iter()
            .find(|p| p.output_path == "articles/two.html")
            .unwrap();
        assert!(two.html.contains(r#"href="/brands/a/b-c/""#));
        assert!(!two.html.contains(r#"href="/brands/a-b/c/""#));

        // Flat: both series land on brand/a-b-c.html and the clash is reported.
        assert_eq!(
            hub_path_collisions(&index, HubLayout::Flat),
            vec![PathCollision {
                path: "brand/a-b-c.html".to_string(),
                hubs: vec!["Series: a / b-c".to_string(), "Series: a-b / c".to_string()],
            }]
        );
    }

    #[test]
    fn output_at_site_root_is_refused() {
        let tmp = TempDir::new().unwrap();
        let mut paths = site(&tmp);
        paths.output = tmp.path().to_path_buf();
        let result = check_output_dir(&paths);
        assert!(matches!(result, Err(GenerateError::UnsafeOutput(_))));
    }

    #[test]
    fn output_containing_articles_is_refused() {
        let tmp = TempDir::new().unwrap();
        let mut paths = site(&tmp);
        paths.articles = tmp.path().join("builds/articles");
        fs::create_dir_all(&paths.articles).unwrap();
        paths.output = tmp.path().join("builds");
        assert!(check_output_dir(&paths).is_err());
    }

    #[test]
    fn output_via_dotdot_is_refused() {
        let tmp = TempDir::new().unwrap();
        let mut paths = site(&tmp);
        paths.output = tmp.path().join("articles/..");
        assert!(check_output_dir(&paths).is_err());
    }

    #[test]
    fn sibling_output_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let paths = site(&tmp);
        assert!(check_output_dir(&paths).is_ok());
    }
}
