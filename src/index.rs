//! Hub groupings over the scanned articles.
//!
//! Stage 2 of the build. Takes the articles in ingestion order and derives
//! every listing the site needs:
//!
//! | Grouping | Key | Membership |
//! |----------|-----|------------|
//! | home | (none) | every article |
//! | brand | `brand` | articles with a brand |
//! | series | `(brand, series)` | articles with both brand and series |
//! | topic | each topic | fan-out: one entry per topic |
//! | country | each country | fan-out: one entry per country |
//!
//! Every listing is sorted by date descending. The sort is stable, so
//! articles with equal dates (including two missing dates) keep their
//! ingestion order. Missing dates sort last.
//!
//! Groups are held in `BTreeMap`s so hub pages are emitted in key order and
//! repeated builds of the same input produce the same output.
//!
//! Articles are referred to by position in the scanned `Vec<Article>`; the
//! index never copies them.

use crate::types::{Article, ListItem, Term};
use std::collections::BTreeMap;

/// Which taxonomy a hub groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HubKind {
    Brand,
    Series,
    Topic,
    Country,
}

impl HubKind {
    /// Human label used in hub titles ("Brand: Acme").
    pub fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Series => "Series",
            Self::Topic => "Topic",
            Self::Country => "Country",
        }
    }
}

/// One hub: a grouping key and its member articles, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HubGroup {
    pub kind: HubKind,
    /// Slugified key; for series hubs the `"{brand}-{series}"` composite.
    pub key: String,
    /// Display text as first written ("Acme / Spring '24" for series hubs).
    pub label: String,
    /// For series hubs, the brand and series keys separately.
    pub parts: Option<(String, String)>,
    /// Positions into the article list, sorted for display.
    pub members: Vec<usize>,
}

impl HubGroup {
    fn new(kind: HubKind, key: String, label: String) -> Self {
        Self {
            kind,
            key,
            label,
            parts: None,
            members: Vec::new(),
        }
    }

    /// Page heading, e.g. `"Topic: Reviews"`.
    pub fn title(&self) -> String {
        format!("{}: {}", self.kind.label(), self.label)
    }
}

/// An article slug claimed by more than one file. Only the last one's page
/// survives in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateSlug {
    pub slug: String,
    /// Sources in ingestion order; the last one wins.
    pub sources: Vec<String>,
}

/// Every derived listing for one build.
#[derive(Debug)]
pub struct SiteIndex {
    pub articles: Vec<Article>,
    /// All article positions, newest first.
    pub home: Vec<usize>,
    pub brands: BTreeMap<String, HubGroup>,
    /// Keyed by brand and series key separately; `a-b`+`c` and `a`+`b-c`
    /// are different hubs even though their composite keys match.
    pub series: BTreeMap<(String, String), HubGroup>,
    pub topics: BTreeMap<String, HubGroup>,
    pub countries: BTreeMap<String, HubGroup>,
    pub duplicate_slugs: Vec<DuplicateSlug>,
}

impl SiteIndex {
    /// Build every grouping from articles in ingestion order.
    pub fn build(articles: Vec<Article>) -> Self {
        let mut brands = BTreeMap::new();
        let mut series = BTreeMap::new();
        let mut topics = BTreeMap::new();
        let mut countries = BTreeMap::new();

        for (pos, article) in articles.iter().enumerate() {
            match &article.brand {
                Some(brand) => add(&mut brands, HubKind::Brand, brand, pos),
                None => log::debug!("{}: no brand, skipped for brand hubs", article.source),
            }

            if let (Some(brand), Some(s), Some(key)) =
                (&article.brand, &article.series, article.series_key())
            {
                let parts = (brand.key.clone(), s.key.clone());
                series
                    .entry(parts.clone())
                    .or_insert_with(|| HubGroup {
                        parts: Some(parts),
                        ..HubGroup::new(
                            HubKind::Series,
                            key,
                            format!("{} / {}", brand.label, s.label),
                        )
                    })
                    .members
                    .push(pos);
            }

            if article.topics.is_empty() {
                log::debug!("{}: no topics", article.source);
            }
            for topic in &article.topics {
                add(&mut topics, HubKind::Topic, topic, pos);
            }

            if article.countries.is_empty() {
                log::debug!("{}: no countries", article.source);
            }
            for country in &article.countries {
                add(&mut countries, HubKind::Country, country, pos);
            }
        }

        let mut home: Vec<usize> = (0..articles.len()).collect();
        sort_newest_first(&mut home, &articles);
        for group in brands
            .values_mut()
            .chain(series.values_mut())
            .chain(topics.values_mut())
            .chain(countries.values_mut())
        {
            sort_newest_first(&mut group.members, &articles);
        }

        let duplicate_slugs = find_duplicate_slugs(&articles);
        for dup in &duplicate_slugs {
            log::warn!(
                "slug '{}' is used by {}; only the last one is written",
                dup.slug,
                dup.sources.join(", ")
            );
        }

        Self {
            articles,
            home,
            brands,
            series,
            topics,
            countries,
            duplicate_slugs,
        }
    }

    /// Every hub, brand hubs first, then series, topic and country hubs,
    /// each in key order.
    pub fn all_groups(&self) -> impl Iterator<Item = &HubGroup> {
        self.brands
            .values()
            .chain(self.series.values())
            .chain(self.topics.values())
            .chain(self.countries.values())
    }

    /// Look a hub up by its key. For series hubs this is the composite
    /// `"{brand}-{series}"` key, which can be shared by more than one hub;
    /// the first in `(brand, series)` order is returned. Use
    /// [`series_group`](Self::series_group) for an exact match.
    pub fn group(&self, kind: HubKind, key: &str) -> Option<&HubGroup> {
        match kind {
            HubKind::Brand => self.brands.get(key),
            HubKind::Series => self.series.values().find(|g| g.key == key),
            HubKind::Topic => self.topics.get(key),
            HubKind::Country => self.countries.get(key),
        }
    }

    /// The series hub for a brand key and series key.
    pub fn series_group(&self, brand: &str, series: &str) -> Option<&HubGroup> {
        self.series.get(&(brand.to_string(), series.to_string()))
    }

    /// Member articles of a group, in display order.
    pub fn members<'a>(&'a self, group: &'a HubGroup) -> impl Iterator<Item = &'a Article> {
        group.members.iter().map(|&pos| &self.articles[pos])
    }

    /// Home page articles, newest first.
    pub fn home_articles(&self) -> impl Iterator<Item = &Article> {
        self.home.iter().map(|&pos| &self.articles[pos])
    }

    /// Listing records for a group.
    pub fn list_items(&self, group: &HubGroup) -> Vec<ListItem> {
        self.members(group).map(ListItem::from).collect()
    }

    /// Up to `limit` other articles sharing the brand, a topic, or a country
    /// with the article at `pos`, in home order.
    ///
    /// Exclusion is by position, so a different article that happens to share
    /// the slug is still a candidate.
    pub fn related(&self, pos: usize, limit: usize) -> Vec<&Article> {
        let article = &self.articles[pos];
        self.home
            .iter()
            .filter(|&&other| other != pos)
            .map(|&other| &self.articles[other])
            .filter(|other| is_related(article, other))
            .take(limit)
            .collect()
    }
}

fn add(groups: &mut BTreeMap<String, HubGroup>, kind: HubKind, term: &Term, pos: usize) {
    groups
        .entry(term.key.clone())
        .or_insert_with(|| HubGroup::new(kind, term.key.clone(), term.label.clone()))
        .members
        .push(pos);
}

fn is_related(a: &Article, b: &Article) -> bool {
    let same_brand = matches!((&a.brand, &b.brand), (Some(x), Some(y)) if x.key == y.key);
    same_brand
        || a.topics.iter().any(|t| b.has_topic(&t.key))
        || a.countries.iter().any(|c| b.has_country(&c.key))
}

/// Stable sort by date descending. Empty dates compare lowest, so they land last.
fn sort_newest_first(positions: &mut [usize], articles: &[Article]) {
    positions.sort_by(|&a, &b| articles[b].date.cmp(&articles[a].date));
}

fn find_duplicate_slugs(articles: &[Article]) -> Vec<DuplicateSlug> {
    let mut by_slug: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for article in articles {
        by_slug
            .entry(article.slug.as_str())
            .or_default()
            .push(article.source.clone());
    }
    by_slug
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(slug, sources)| DuplicateSlug {
            slug: slug.to_string(),
            sources,
        })
        .collect()
}
