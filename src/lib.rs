//! # hubgen
//!
//! A static site generator for articles annotated with front-matter. Each
//! markdown file becomes an article page, and the front-matter's `brand`,
//! `series`, `topics` and `countries` fields become hub pages listing every
//! article that shares them.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      articles/*.md  →  Vec<Article>   (front-matter + rendered markdown)
//! 2. Index     Vec<Article>   →  SiteIndex      (hub groupings, newest first)
//! 3. Generate  SiteIndex      →  builds/        (home, article and hub pages)
//! ```
//!
//! The build is one-shot and deterministic. Every input is read and every
//! page rendered in memory before the output directory is replaced, so a bad
//! file or template never leaves a half-written site behind.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: reads the articles directory into [`types::Article`]s |
//! | [`index`] | Stage 2: brand, series, topic and country groupings; related articles |
//! | [`generate`] | Stage 3: plans every page in memory, then writes the output tree |
//! | [`pipeline`] | Runs the three stages for the CLI |
//! | [`render`] | `PageRenderer` trait: built-in Maud theme or external Tera templates |
//! | [`routes`] | Output paths and URLs for the flat and nested hub layouts |
//! | [`frontmatter`] | Splits `---` delimited YAML front-matter from the body |
//! | [`markdown`] | Markdown to HTML with heading anchors |
//! | [`slug`] | URL-safe slug normalization |
//! | [`dates`] | Date normalization to `YYYY-MM-DD` sort keys |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared types (`Article`, `Term`, `ListItem`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Slugs Everywhere
//!
//! Brand, series, topic and country values are grouped by their slug, so
//! `Acme`, `acme` and `ACME!` land on the same hub. The first spelling seen is
//! kept as the display label. Output paths are built from slugs only, which
//! keeps front-matter from steering writes outside the output directory.
//!
//! ## Two Themes
//!
//! Sites without templates get the built-in [Maud](https://maud.lambda.xyz/)
//! theme: compile-time checked, auto-escaped, nothing to ship. Sites that
//! provide `templates/article.html` and `templates/hub.html` get those
//! rendered with [Tera](https://keats.github.io/tera/) instead.

pub mod config;
pub mod dates;
pub mod frontmatter;
pub mod generate;
pub mod index;
pub mod markdown;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod scan;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
