//! Slug derivation shared by projects, tasks, and workspaces.
//!
//! Slugs are computed once when an entity is created and never regenerated.
//! Uniqueness is not guaranteed by derivation alone: callers create the row
//! first, then check for an existing row with the same slug and, on collision,
//! append the new row's numeric identifier (see [`resolve_slug`]).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Replacement used when the source contains no ASCII letter.
pub const UNTITLED: &str = "untitled";

/// Derivation variant applied to the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlugStyle {
    /// Strip everything outside `[A-Za-z0-9-]`.
    Url,
    /// Entity-escape HTML special characters instead of stripping them.
    Html,
}

/// Derived slug owned by a parent entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derives the base slug for `source` using the given style.
    #[must_use]
    pub fn derive(style: SlugStyle, source: &str) -> Self {
        match style {
            SlugStyle::Url => Self(sanitize_for_slug(source)),
            SlugStyle::Html => Self(sanitize_for_html(source)),
        }
    }

    /// Wraps a slug read back from storage.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Appends `-{id}` to disambiguate a colliding slug.
    #[must_use]
    pub fn disambiguated(self, id: impl fmt::Display) -> Self {
        Self(format!("{}-{id}", self.0))
    }

    /// Returns the slug as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applies the collision policy to a freshly derived base slug.
///
/// `collides` reports whether another row of the same entity type already
/// holds `base`; the new row's own `id` is appended in that case.
#[must_use]
pub fn resolve_slug(base: Slug, collides: bool, id: impl fmt::Display) -> Slug {
    if collides {
        base.disambiguated(id)
    } else {
        base
    }
}

/// Interprets a lookup key that may be either a numeric id or a slug.
///
/// Returns the id when `uid` is a positive integer. Callers fall back to a
/// slug lookup when this returns `None` or when no row has that id.
#[must_use]
pub fn numeric_uid(uid: &str) -> Option<i64> {
    uid.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Cleans a title into a URL-friendly slug.
///
/// Spaces become hyphens, input without any ASCII letter becomes
/// [`UNTITLED`], characters outside `[A-Za-z0-9-]` are dropped and hyphen runs
/// collapse to one.
#[must_use]
pub fn sanitize_for_slug(input: &str) -> String {
    let hyphenated = input.replace(' ', "-");
    let source = if hyphenated.chars().any(|ch| ch.is_ascii_alphabetic()) {
        hyphenated
    } else {
        UNTITLED.to_owned()
    };
    let kept: String = source
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .collect();
    collapse_hyphens(&kept)
}

/// Makes a title safe for display inside HTML while keeping its slug shape.
///
/// Spaces become hyphens, `& " ' < >` are entity-escaped and hyphen runs
/// collapse to one. Unlike [`sanitize_for_slug`] nothing is removed.
#[must_use]
pub fn sanitize_for_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            ' ' => escaped.push('-'),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    collapse_hyphens(&escaped)
}

fn collapse_hyphens(value: &str) -> String {
    let mut collapsed = String::with_capacity(value.len());
    let mut previous_was_hyphen = false;
    for ch in value.chars() {
        let is_hyphen = ch == '-';
        if !(is_hyphen && previous_was_hyphen) {
            collapsed.push(ch);
        }
        previous_was_hyphen = is_hyphen;
    }
    collapsed
}
