//! End-to-end build orchestration: config → scan → index → generate.
//!
//! The CLI commands are thin wrappers around [`check`] and [`build`].

use crate::config::{self, ConfigError, SiteConfig, SitePaths};
use crate::generate::{self, GenerateError, GenerateReport};
use crate::index::SiteIndex;
use crate::render::{self, RenderError};
use crate::routes::PathCollision;
use crate::scan::{self, ScanError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Command-line overrides for `config.paths`. Relative paths resolve against
/// the site root, same as the config file's.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub articles: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl PathOverrides {
    fn apply(&self, mut paths: SitePaths) -> SitePaths {
        if let Some(dir) = &self.articles {
            paths.articles = paths.root.join(dir);
        }
        if let Some(dir) = &self.templates {
            paths.templates = paths.root.join(dir);
        }
        if let Some(dir) = &self.output {
            paths.output = paths.root.join(dir);
        }
        paths
    }
}

/// Loaded config plus the directories it resolves to.
#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub paths: SitePaths,
}

impl Site {
    pub fn load(root: &Path, overrides: &PathOverrides) -> Result<Self, BuildError> {
        let config = config::load_config(root)?;
        let paths = overrides.apply(config.paths.resolve(root));
        log::debug!("site paths: {paths:?}");
        Ok(Self { config, paths })
    }
}

/// Result of a successful [`check`].
#[derive(Debug)]
pub struct CheckReport {
    pub index: SiteIndex,
    /// Hubs that would overwrite one another under the configured layout.
    pub path_collisions: Vec<PathCollision>,
}

/// Result of a successful [`build`].
#[derive(Debug)]
pub struct BuildReport {
    pub index: SiteIndex,
    pub generated: GenerateReport,
}

/// Scan and index without writing anything.
pub fn check(site: &Site) -> Result<CheckReport, BuildError> {
    let index = scan_and_index(site)?;
    let path_collisions = generate::hub_path_collisions(&index, site.config.layout.hubs);
    Ok(CheckReport {
        index,
        path_collisions,
    })
}

/// Full build. Every input is read and every page rendered before the
/// output directory is touched.
pub fn build(site: &Site) -> Result<BuildReport, BuildError> {
    let index = scan_and_index(site)?;
    let theme = render::load_theme(&site.paths.templates, &site.config)?;
    let generated = generate::generate(&index, &site.config, &site.paths, theme.as_ref())?;
    Ok(BuildReport { index, generated })
}

fn scan_and_index(site: &Site) -> Result<SiteIndex, BuildError> {
    let articles = scan::scan(&site.paths.articles, &site.config.markdown)?;
    log::info!(
        "scanned {} articles from {}",
        articles.len(),
        site.paths.articles.display()
    );
    Ok(SiteIndex::build(articles))
}
