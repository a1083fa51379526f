//! Output paths and URLs.
//!
//! Every path is built from slugified keys only, so nothing in an article's
//! front-matter can point a write outside the output directory.
//!
//! | Page | `flat` | `nested` |
//! |------|--------|----------|
//! | home | `index.html` | `index.html` |
//! | article | `articles/<slug>.html` | `articles/<slug>.html` |
//! | brand | `brand/<brand>.html` | `brands/<brand>/index.html` |
//! | series | `brand/<brand>-<series>.html` | `brands/<brand>/<series>/index.html` |
//! | topic | `topic/<topic>.html` | `topics/<topic>/index.html` |
//! | country | `country/<country>.html` | `countries/<country>/index.html` |

use crate::config::HubLayout;
use crate::index::{HubGroup, HubKind};
use std::collections::BTreeMap;

pub const HOME_PATH: &str = "index.html";
pub const ARTICLES_DIR: &str = "articles";

/// Directories created up front, before any page is written.
pub fn skeleton(layout: HubLayout) -> [&'static str; 4] {
    [
        ARTICLES_DIR,
        hub_dir(layout, HubKind::Brand),
        hub_dir(layout, HubKind::Topic),
        hub_dir(layout, HubKind::Country),
    ]
}

/// Top-level directory for a hub kind. Series hubs live with their brand.
pub fn hub_dir(layout: HubLayout, kind: HubKind) -> &'static str {
    match (layout, kind) {
        (HubLayout::Flat, HubKind::Brand | HubKind::Series) => "brand",
        (HubLayout::Flat, HubKind::Topic) => "topic",
        (HubLayout::Flat, HubKind::Country) => "country",
        (HubLayout::Nested, HubKind::Brand | HubKind::Series) => "brands",
        (HubLayout::Nested, HubKind::Topic) => "topics",
        (HubLayout::Nested, HubKind::Country) => "countries",
    }
}

/// Output path of an article page, relative to the output root.
pub fn article_path(slug: &str) -> String {
    format!("{ARTICLES_DIR}/{slug}.html")
}

/// Output path of a hub page, relative to the output root.
pub fn hub_path(layout: HubLayout, group: &HubGroup) -> String {
    let dir = hub_dir(layout, group.kind);
    match (layout, &group.parts) {
        (HubLayout::Flat, _) => format!("{dir}/{}.html", group.key),
        (HubLayout::Nested, Some((brand, series))) => format!("{dir}/{brand}/{series}/index.html"),
        (HubLayout::Nested, None) => format!("{dir}/{}/index.html", group.key),
    }
}

/// Two or more hubs that resolve to the same output path. Pages are written
/// in plan order, so only the last one survives.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCollision {
    pub path: String,
    /// Hub titles in plan order; the last one wins.
    pub hubs: Vec<String>,
}

/// Find hub output paths claimed more than once.
///
/// Only the flat layout can produce these: `brand/<brand>.html` and
/// `brand/<brand>-<series>.html` share a directory, so brand `Acme Spring`
/// and brand `Acme` with series `Spring` both land on `brand/acme-spring.html`.
pub fn path_collisions<'a>(
    layout: HubLayout,
    groups: impl Iterator<Item = &'a HubGroup>,
) -> Vec<PathCollision> {
    let mut by_path: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for group in groups {
        by_path
            .entry(hub_path(layout, group))
            .or_default()
            .push(group.title());
    }
    by_path
        .into_iter()
        .filter(|(_, hubs)| hubs.len() > 1)
        .map(|(path, hubs)| PathCollision { path, hubs })
        .collect()
}

/// Site-absolute URL of a hub page. Nested hubs link to their directory.
pub fn hub_url(layout: HubLayout, group: &HubGroup) -> String {
    let path = hub_path(layout, group);
    match layout {
        HubLayout::Flat => format!("/{path}"),
        HubLayout::Nested => format!("/{}", path.trim_end_matches("index.html")),
    }
}
