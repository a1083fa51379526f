//! CLI output formatting for `check` and `build`.
//!
//! Output is **information-centric, not file-centric**: every article leads
//! with its positional index and title, with the source file as indented
//! context. Hubs lead with their heading and member count.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Articles
//! 001 Spring Lineup
//!     Source: acme-spring-lineup.md
//!     Date: 2024-02-01
//! 002 Untitled
//!     Source: notes.md
//!
//! Hubs
//!     Brand: Acme (2)
//!     Series: Acme / Spring '24 (1)
//!     Topic: Reviews (2)
//!
//! Warnings
//!     Duplicate slug 'same': a.md, b.md (last one wins)
//!     Output path 'brand/acme-spring.html' shared by Brand: Acme Spring, Series: Acme / Spring (last one wins)
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 Spring Lineup → articles/spring-lineup.html
//! 002 Untitled → articles/untitled.html
//!
//! Hubs
//!     Brand: Acme → brand/acme.html
//!
//! Generated 2 articles, 1 hub page, home (built-in theme) → builds
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::{GenerateReport, PageKind};
use crate::index::SiteIndex;
use crate::routes::PathCollision;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn warning_lines(index: &SiteIndex, collisions: &[PathCollision]) -> Vec<String> {
    let mut lines = Vec::new();
    if index.duplicate_slugs.is_empty() && collisions.is_empty() {
        return lines;
    }
    lines.push(String::new());
    lines.push("Warnings".to_string());
    for dup in &index.duplicate_slugs {
        lines.push(format!(
            "{}Duplicate slug '{}': {} (last one wins)",
            indent(1),
            dup.slug,
            dup.sources.join(", ")
        ));
    }
    for collision in collisions {
        lines.push(format!(
            "{}Output path '{}' shared by {} (last one wins)",
            indent(1),
            collision.path,
            collision.hubs.join(", ")
        ));
    }
    lines
}

// ============================================================================
// Check output
// ============================================================================

/// Format the scan/index summary shown by `check`.
pub fn format_check_output(index: &SiteIndex, collisions: &[PathCollision]) -> Vec<String> {
    let mut lines = vec!["Articles".to_string()];

    for (i, article) in index.articles.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), article.title));
        lines.push(format!("{}Source: {}", indent(1), article.source));
        if !article.date.is_empty() {
            lines.push(format!("{}Date: {}", indent(1), article.date));
        }
        if let Some(summary) = &article.summary {
            lines.push(format!("{}Summary: {}", indent(1), truncate(summary, 60)));
        }
    }

    let groups: Vec<_> = index.all_groups().collect();
    if !groups.is_empty() {
        lines.push(String::new());
        lines.push("Hubs".to_string());
        for group in groups {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                group.title(),
                group.members.len()
            ));
        }
    }

    lines.extend(warning_lines(index, collisions));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(index: &SiteIndex, collisions: &[PathCollision]) {
    for line in format_check_output(index, collisions) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the list of written pages shown by `build`.
pub fn format_build_output(index: &SiteIndex, report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut article_pos = 0;
    let mut hub_lines = Vec::new();

    for page in &report.pages {
        match page.kind {
            PageKind::Home => lines.push(format!("Home \u{2192} {}", page.output_path)),
            PageKind::Article => {
                let title = index
                    .articles
                    .get(article_pos)
                    .map(|a| a.title.as_str())
                    .unwrap_or_default();
                article_pos += 1;
                lines.push(format!(
                    "{} {} \u{2192} {}",
                    format_index(article_pos),
                    title,
                    page.output_path
                ));
            }
            PageKind::Hub(_) => hub_lines.push(page.output_path.as_str()),
        }
    }

    if !hub_lines.is_empty() {
        lines.push(String::new());
        lines.push("Hubs".to_string());
        for (group, path) in index.all_groups().zip(hub_lines) {
            lines.push(format!("{}{} \u{2192} {}", indent(1), group.title(), path));
        }
    }

    lines.extend(warning_lines(index, &report.path_collisions));

    let hubs = report
        .pages
        .iter()
        .filter(|p| matches!(p.kind, PageKind::Hub(_)))
        .count();
    let mut summary = format!(
        "Generated {}, {}, home ({} theme)",
        plural(report.count(PageKind::Article), "article", "articles"),
        plural(hubs, "hub page", "hub pages"),
        report.theme
    );
    if report.assets_copied > 0 {
        summary.push_str(&format!(
            ", {}",
            plural(report.assets_copied, "asset", "assets")
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{summary} \u{2192} {}",
        report.output_dir.display()
    ));
    lines
}

/// Print build output to stdout.
pub fn print_build_output(index: &SiteIndex, report: &GenerateReport) {
    for line in format_build_output(index, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
