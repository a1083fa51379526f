//! URL-safe token normalization.
//!
//! Every path segment the generator writes (article slugs, brand, series,
//! topic and country keys) goes through [`slugify`], so output paths never
//! depend on the casing or punctuation of the source text:
//!
//! - `"Hello, World!"` → `"hello-world"`
//! - `"Acme"` and `"acme"` → `"acme"`
//! - `"--Côte d'Ivoire--"` → `"c-te-d-ivoire"`
//! - `"../../etc"` → `"etc"`

/// Normalize free text into a lowercase `[a-z0-9]+(-[a-z0-9]+)*` token.
///
/// Every maximal run of characters outside `[a-z0-9-]` (after lowercasing)
/// becomes a single `-`, repeated dashes collapse, and leading/trailing dashes
/// are trimmed. The result may be empty. Normalizing a normalized string
/// returns it unchanged.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_dash = true; // suppress leading dash
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
