//! URL slug derivation for content records.

use crate::content::ContentType;
use crate::types::ContentId;

/// Derive a URL-safe slug from arbitrary text.
///
/// Lowercases, turns every run of non-alphanumeric ASCII characters into a
/// single hyphen, and trims leading/trailing hyphens.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Resolve the slug stored on a record.
///
/// A non-blank `requested` slug is normalised; otherwise the slug comes from
/// the title. When neither yields anything usable (e.g. a title made only of
/// punctuation or non-ASCII script) the slug falls back to the content type
/// plus the leading hex digits of the id.
pub fn resolve_slug(
    requested: Option<&str>,
    title: &str,
    content_type: ContentType,
    id: ContentId,
) -> String {
    let source = match requested {
        Some(s) if !s.trim().is_empty() => s,
        _ => title,
    };

    let slug = generate_slug(source);
    if !slug.is_empty() {
        return slug;
    }

    let simple = id.simple().to_string();
    format!("{}-{}", content_type.as_str(), &simple[..8])
}
