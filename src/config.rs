//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site root (the `--source` directory) next to the articles and
//! templates directories:
//!
//! ```text
//! site/
//! ├── config.toml          # Optional: overrides stock defaults
//! ├── articles/            # *.md files with front-matter
//! ├── templates/           # Optional: article.html + hub.html (Tera), header/footer partials
//! └── static/              # Optional: copied verbatim into the output root
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "Articles"
//!
//! [paths]
//! articles = "articles"
//! templates = "templates"
//! output = "builds"
//! assets = "static"
//!
//! [layout]
//! hubs = "flat"             # "flat": brand/acme.html, "nested": brands/acme/index.html
//!
//! [related]
//! enabled = true
//! limit = 5                 # 1-50
//!
//! [markdown]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! smart_punctuation = false
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#1a4fa0"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#121212"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#8ab4f8"
//! link_hover = "#ffffff"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the site root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title shown in page heads and the home page heading.
    pub site_title: String,
    /// Input/output directory locations, relative to the site root.
    pub paths: PathsConfig,
    /// Output path scheme for hub pages.
    pub layout: LayoutConfig,
    /// "Related articles" block on article pages.
    pub related: RelatedConfig,
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Color schemes for the built-in theme.
    pub colors: ColorConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "Articles".to_string(),
            paths: PathsConfig::default(),
            layout: LayoutConfig::default(),
            related: RelatedConfig::default(),
            markdown: MarkdownConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.related.limit == 0 || self.related.limit > 50 {
            return Err(ConfigError::Validation(
                "related.limit must be 1-50".into(),
            ));
        }
        for (name, value) in [
            ("paths.articles", &self.paths.articles),
            ("paths.templates", &self.paths.templates),
            ("paths.output", &self.paths.output),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }
        if Path::new(&self.paths.output) == Path::new(".") {
            return Err(ConfigError::Validation(
                "paths.output must not be the site root; it is wiped on every build".into(),
            ));
        }
        Ok(())
    }
}

/// Directory locations. Relative paths resolve against the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory holding the `*.md` articles.
    pub articles: String,
    /// Directory holding external templates and partials (optional on disk).
    pub templates: String,
    /// Build output. Deleted and recreated on every build.
    pub output: String,
    /// Static files copied into the output root (optional on disk).
    pub assets: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            articles: "articles".to_string(),
            templates: "templates".to_string(),
            output: "builds".to_string(),
            assets: "static".to_string(),
        }
    }
}

/// Fully-resolved directories for one build.
#[derive(Debug, Clone, PartialEq)]
pub struct SitePaths {
    pub root: PathBuf,
    pub articles: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
    pub assets: PathBuf,
}

impl PathsConfig {
    /// Resolve each configured path against the site root.
    pub fn resolve(&self, root: &Path) -> SitePaths {
        SitePaths {
            root: root.to_path_buf(),
            articles: root.join(&self.articles),
            templates: root.join(&self.templates),
            output: root.join(&self.output),
            assets: root.join(&self.assets),
        }
    }
}

/// Output path scheme for hub pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HubLayout {
    /// `brand/acme.html`, `brand/acme-spring.html`, `topic/news.html`
    #[default]
    Flat,
    /// `brands/acme/index.html`, `brands/acme/spring/index.html`, `topics/news/index.html`
    Nested,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub hubs: HubLayout,
}

/// Related-article selection on article pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelatedConfig {
    pub enabled: bool,
    /// Maximum number of related articles per page.
    pub limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 5,
        }
    }
}

/// pulldown-cmark extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    /// Curly quotes and dashes.
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            smart_punctuation: false,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, summaries, breadcrumbs.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#1a4fa0".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#8ab4f8".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it isn't valid TOML.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# hubgen configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Title used in <title> and on the home page.
site_title = "Articles"

# ---------------------------------------------------------------------------
# Paths (relative to the directory holding this file)
# ---------------------------------------------------------------------------
[paths]
# Markdown articles with front-matter.
articles = "articles"

# External templates. If both article.html and hub.html exist here they are
# rendered with Tera; otherwise the built-in theme is used. header.html and
# footer.html, when present, are included on every page by either theme.
templates = "templates"

# Build output. DELETED AND RECREATED on every build - never put
# hand-written files here.
output = "builds"

# Static files copied verbatim into the output root.
assets = "static"

# ---------------------------------------------------------------------------
# Hub page layout
# ---------------------------------------------------------------------------
[layout]
# "flat":   brand/acme.html, brand/acme-spring.html, topic/news.html
# "nested": brands/acme/index.html, brands/acme/spring/index.html, topics/news/index.html
hubs = "flat"

# ---------------------------------------------------------------------------
# Related articles (same brand, or any shared topic or country)
# ---------------------------------------------------------------------------
[related]
enabled = true
# Maximum entries per article (1-50).
limit = 5

# ---------------------------------------------------------------------------
# Markdown extensions
# ---------------------------------------------------------------------------
[markdown]
tables = true
footnotes = true
strikethrough = true
smart_punctuation = false

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light), built-in theme only
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Dates, summaries, breadcrumbs
border = "#e0e0e0"
link = "#1a4fa0"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark), built-in theme only
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#8ab4f8"
link_hover = "#ffffff"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}
}}

@media (prefers-color-scheme: dark) {{
    :root {{
{dark}
    }}
}}"#,
        light = scheme_vars(&colors.light, "    "),
        dark = scheme_vars(&colors.dark, "        "),
    )
}

fn scheme_vars(scheme: &ColorScheme, pad: &str) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
    ]
    .iter()
    .map(|(name, value)| format!("{pad}{name}: {value};"))
    .collect::<Vec<_>>()
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site_title, "Articles");
        assert_eq!(config.paths.articles, "articles");
        assert_eq!(config.paths.output, "builds");
        assert_eq!(config.layout.hubs, HubLayout::Flat);
        assert!(config.related.enabled);
        assert_eq!(config.related.limit, 5);
        assert!(config.markdown.tables);
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
site_title = "Field Notes"

[layout]
hubs = "nested"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.site_title, "Field Notes");
        assert_eq!(config.layout.hubs, HubLayout::Nested);
        // Defaults preserved
        assert_eq!(config.paths.articles, "articles");
        assert_eq!(config.related.limit, 5);
    }

    #[test]
    fn unknown_layout_rejected() {
        let toml = "[layout]\nhubs = \"sideways\"\n";
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = "site_titel = \"typo\"\n";
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml = "[related]\nmax = 3\n";
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site_title, "Articles");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[paths]\noutput = \"public\"\n\n[related]\nlimit = 3\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.paths.output, "public");
        assert_eq!(config.related.limit, 3);
        assert_eq!(config.paths.articles, "articles");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[related]\nlimit = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_related_limit_bounds() {
        let mut config = SiteConfig::default();
        config.related.limit = 50;
        assert!(config.validate().is_ok());
        config.related.limit = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_output_at_site_root() {
        let mut config = SiteConfig::default();
        config.paths.output = ".".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_paths() {
        let mut config = SiteConfig::default();
        config.paths.articles = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn paths_resolve_against_root() {
        let paths = PathsConfig::default().resolve(Path::new("/site"));
        assert_eq!(paths.articles, Path::new("/site/articles"));
        assert_eq!(paths.templates, Path::new("/site/templates"));
        assert_eq!(paths.output, Path::new("/site/builds"));
        assert_eq!(paths.assets, Path::new("/site/static"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value =
            toml::from_str("[colors.light]\nbackground = \"#fff\"\ntext = \"#000\"").unwrap();
        let overlay: toml::Value =
            toml::from_str("[colors.light]\nbackground = \"#eee\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(
            merged["colors"]["light"]["background"].as_str(),
            Some("#eee")
        );
        assert_eq!(merged["colors"]["light"]["text"].as_str(), Some("#000"));
    }

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value().unwrap(), None).unwrap();
        assert_eq!(config.related.limit, 5);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(parsed.site_title, defaults.site_title);
        assert_eq!(parsed.paths.output, defaults.paths.output);
        assert_eq!(parsed.layout.hubs, defaults.layout.hubs);
        assert_eq!(parsed.related.limit, defaults.related.limit);
        assert_eq!(parsed.colors.dark.link, defaults.colors.dark.link);
        assert_eq!(parsed.markdown.footnotes, defaults.markdown.footnotes);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0;"));
        assert!(css.contains("--color-bg: #1a1a1a;"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
        assert!(css.contains("--color-link-hover:"));
    }
}
