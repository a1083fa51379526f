//! Page rendering: article pages and hub listings.
//!
//! Rendering goes through the [`PageRenderer`] trait so the generator doesn't
//! care where markup comes from. Two themes exist:
//!
//! - [`BuiltinTheme`]: [Maud](https://maud.lambda.xyz/) layouts compiled into
//!   the binary. Auto-escaped, no files to ship. Used when the templates
//!   directory has no `article.html`/`hub.html` pair.
//! - [`TeraTheme`]: external Tera templates loaded from the templates
//!   directory. Every `*.html` there is registered, so templates can
//!   `{% extends %}` and `{% include %}` each other.
//!
//! `header.html` and `footer.html` in the templates directory are loaded once
//! into [`Partials`] and included raw by either theme. The theme value owns
//! them for the whole build.
//!
//! ## Tera contexts
//!
//! `article.html` receives `site_title`, `title`, `date`, `summary`,
//! `content` (pre-rendered HTML, use `| safe`), `brand` and `series`
//! (`{label, url}` or absent), `topics` and `countries` (lists of
//! `{label, url}`), `related` (list of `{title, url, summary, date}`), `meta`
//! (every front-matter key), `header`, `footer` (empty when absent).
//!
//! `hub.html` receives `site_title`, `hub_title`, `hub_desc`, `items` (list of
//! `{title, url, summary, date}`), `header`, `footer`.

use crate::config::{SiteConfig, generate_color_css};
use crate::types::{Article, ListItem};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;
use serde_yaml_ng::{Mapping, Value as YamlValue};
use std::fs;
use std::path::Path;
use tera::Tera;
use thiserror::Error;

pub const ARTICLE_TEMPLATE: &str = "article.html";
pub const HUB_TEMPLATE: &str = "hub.html";
pub const HEADER_PARTIAL: &str = "header.html";
pub const FOOTER_PARTIAL: &str = "footer.html";

const CSS_STATIC: &str = include_str!("../static/style.css");
const GENERATOR: &str = concat!("hubgen ", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// A `{label, url}` link to a hub page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubLink {
    pub label: String,
    pub url: String,
}

/// Everything an article page shows.
#[derive(Debug)]
pub struct ArticleView<'a> {
    pub site_title: &'a str,
    pub article: &'a Article,
    pub brand: Option<HubLink>,
    pub series: Option<HubLink>,
    pub topics: Vec<HubLink>,
    pub countries: Vec<HubLink>,
    pub related: Vec<ListItem>,
}

/// Everything a listing page (home or hub) shows.
#[derive(Debug)]
pub struct HubView<'a> {
    pub site_title: &'a str,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<ListItem>,
}

/// Produces HTML for the two page shapes.
pub trait PageRenderer {
    /// Short name for the build report.
    fn name(&self) -> &'static str;
    fn render_article(&self, view: &ArticleView) -> Result<String, RenderError>;
    fn render_hub(&self, view: &HubView) -> Result<String, RenderError>;
    /// Stylesheet to write as `/style.css`, if the theme ships one.
    fn stylesheet(&self) -> Option<String>;
}

/// Raw HTML included at the top and bottom of every page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partials {
    pub header: Option<String>,
    pub footer: Option<String>,
}

impl Partials {
    /// Read `header.html`/`footer.html` from `dir`. Missing files (or a
    /// missing directory) simply leave the slot empty.
    pub fn load(dir: &Path) -> Result<Self, RenderError> {
        Ok(Self {
            header: read_optional(&dir.join(HEADER_PARTIAL))?,
            footer: read_optional(&dir.join(FOOTER_PARTIAL))?,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, RenderError> {
    if path.is_file() {
        Ok(Some(fs::read_to_string(path)?))
    } else {
        Ok(None)
    }
}

/// Pick the theme for a build: Tera when the templates directory has both
/// `article.html` and `hub.html`, the built-in theme otherwise.
pub fn load_theme(
    templates_dir: &Path,
    config: &SiteConfig,
) -> Result<Box<dyn PageRenderer>, RenderError> {
    let partials = Partials::load(templates_dir)?;
    let has_templates = templates_dir.join(ARTICLE_TEMPLATE).is_file()
        && templates_dir.join(HUB_TEMPLATE).is_file();

    if has_templates {
        log::info!("using templates from {}", templates_dir.display());
        Ok(Box::new(TeraTheme::load(templates_dir, partials)?))
    } else {
        log::debug!(
            "no {ARTICLE_TEMPLATE}/{HUB_TEMPLATE} in {}, using built-in theme",
            templates_dir.display()
        );
        Ok(Box::new(BuiltinTheme::new(config, partials)))
    }
}

// ============================================================================
// Built-in theme (Maud)
// ============================================================================

pub struct BuiltinTheme {
    partials: Partials,
    color_css: String,
}

impl BuiltinTheme {
    pub fn new(config: &SiteConfig, partials: Partials) -> Self {
        Self {
            partials,
            color_css: generate_color_css(&config.colors),
        }
    }

    /// Renders the base HTML document structure.
    fn base_document(&self, title: &str, site_title: &str, content: Markup) -> Markup {
        let full_title = if title == site_title {
            title.to_string()
        } else {
            format!("{title} | {site_title}")
        };
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="generator" content=(GENERATOR);
                    title { (full_title) }
                    link rel="stylesheet" href="/style.css";
                }
                body {
                    @if let Some(header) = &self.partials.header {
                        (PreEscaped(header))
                    }
                    header.site-header {
                        nav.breadcrumb {
                            a href="/" { (site_title) }
                        }
                    }
                    (content)
                    @if let Some(footer) = &self.partials.footer {
                        (PreEscaped(footer))
                    }
                }
            }
        }
    }
}

impl PageRenderer for BuiltinTheme {
    fn name(&self) -> &'static str {
        "built-in"
    }

    fn render_article(&self, view: &ArticleView) -> Result<String, RenderError> {
        let article = view.article;
        let content = html! {
            main.article-page {
                article {
                    header.article-header {
                        h1 { (article.title) }
                        p.article-meta {
                            @if !article.date.is_empty() {
                                time { (article.date) }
                            }
                            @if let Some(brand) = &view.brand {
                                " · " a.brand href=(brand.url) { (brand.label) }
                            }
                            @if let Some(series) = &view.series {
                                " · " a.series href=(series.url) { (series.label) }
                            }
                        }
                        @if let Some(summary) = &article.summary {
                            p.summary { (summary) }
                        }
                    }
                    div.article-content {
                        (PreEscaped(&article.content))
                    }
                    @if !view.topics.is_empty() || !view.countries.is_empty() {
                        footer.article-tags {
                            (tag_list("Topics", "topics", &view.topics))
                            (tag_list("Countries", "countries", &view.countries))
                        }
                    }
                }
                @if !view.related.is_empty() {
                    aside.related {
                        h2 { "Related" }
                        (item_list(&view.related))
                    }
                }
            }
        };
        Ok(self
            .base_document(&article.title, view.site_title, content)
            .into_string())
    }

    fn render_hub(&self, view: &HubView) -> Result<String, RenderError> {
        let content = html! {
            main.hub-page {
                header.hub-header {
                    h1 { (view.title) }
                    @if let Some(desc) = &view.description {
                        p.hub-description { (desc) }
                    }
                }
                (item_list(&view.items))
            }
        };
        Ok(self
            .base_document(&view.title, view.site_title, content)
            .into_string())
    }

    fn stylesheet(&self) -> Option<String> {
        Some(format!("{}\n\n{}", self.color_css, CSS_STATIC))
    }
}

/// Renders a `{title, url, summary}` listing.
fn item_list(items: &[ListItem]) -> Markup {
    html! {
        ul.item-list {
            @for item in items {
                li.item {
                    a href=(item.url) { (item.title) }
                    @if !item.date.is_empty() {
                        " " time { (item.date) }
                    }
                    @if let Some(summary) = &item.summary {
                        p.item-summary { (summary) }
                    }
                }
            }
        }
    }
}

fn tag_list(heading: &str, class: &str, links: &[HubLink]) -> Markup {
    html! {
        @if !links.is_empty() {
            div class=(class) {
                span.tag-heading { (heading) ": " }
                @for (i, link) in links.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(link.url) { (link.label) }
                }
            }
        }
    }
}

// ============================================================================
// External theme (Tera)
// ============================================================================

pub struct TeraTheme {
    tera: Tera,
    partials: Partials,
}

#[derive(Serialize)]
struct ArticleContext<'a> {
    site_title: &'a str,
    title: &'a str,
    date: &'a str,
    summary: Option<&'a str>,
    content: &'a str,
    brand: Option<&'a HubLink>,
    series: Option<&'a HubLink>,
    topics: &'a [HubLink],
    countries: &'a [HubLink],
    related: &'a [ListItem],
    meta: serde_json::Value,
    header: &'a str,
    footer: &'a str,
}

#[derive(Serialize)]
struct HubContext<'a> {
    site_title: &'a str,
    hub_title: &'a str,
    hub_desc: Option<&'a str>,
    items: &'a [ListItem],
    header: &'a str,
    footer: &'a str,
}

impl TeraTheme {
    /// Register every `*.html` file under `dir`.
    pub fn load(dir: &Path, partials: Partials) -> Result<Self, RenderError> {
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob)?;
        Ok(Self { tera, partials })
    }

    fn render(&self, name: &str, context: &impl Serialize) -> Result<String, RenderError> {
        let context = tera::Context::from_serialize(context)?;
        Ok(self.tera.render(name, &context)?)
    }
}

impl PageRenderer for TeraTheme {
    fn name(&self) -> &'static str {
        "tera"
    }

    fn render_article(&self, view: &ArticleView) -> Result<String, RenderError> {
        let article = view.article;
        let context = ArticleContext {
            site_title: view.site_title,
            title: &article.title,
            date: &article.date,
            summary: article.summary.as_deref(),
            content: &article.content,
            brand: view.brand.as_ref(),
            series: view.series.as_ref(),
            topics: &view.topics,
            countries: &view.countries,
            related: &view.related,
            meta: mapping_to_json(&article.meta),
            header: self.partials.header.as_deref().unwrap_or_default(),
            footer: self.partials.footer.as_deref().unwrap_or_default(),
        };
        self.render(ARTICLE_TEMPLATE, &context)
    }

    fn render_hub(&self, view: &HubView) -> Result<String, RenderError> {
        let context = HubContext {
            site_title: view.site_title,
            hub_title: &view.title,
            hub_desc: view.description.as_deref(),
            items: &view.items,
            header: self.partials.header.as_deref().unwrap_or_default(),
            footer: self.partials.footer.as_deref().unwrap_or_default(),
        };
        self.render(HUB_TEMPLATE, &context)
    }

    fn stylesheet(&self) -> Option<String> {
        None
    }
}

/// Convert front-matter to a JSON object for template contexts.
///
/// YAML allows non-string keys (`1: one`, `true: yes`); JSON doesn't, so keys
/// are rendered to their text form.
pub fn mapping_to_json(mapping: &Mapping) -> serde_json::Value {
    let object = mapping
        .iter()
        .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
        .collect();
    serde_json::Value::Object(object)
}

fn yaml_key(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn yaml_to_json(value: &YamlValue) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        YamlValue::Null => Json::Null,
        YamlValue::Bool(b) => Json::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        YamlValue::String(s) => Json::String(s.clone()),
        YamlValue::Sequence(items) => Json::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => mapping_to_json(map),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
