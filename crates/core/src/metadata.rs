//! Content metadata: typed known sub-structures plus a forward-compatible
//! bag of unknown keys, with merge-on-write semantics.
//!
//! Stored as a single JSON object. Keys inside the object use camelCase so
//! documents written by the admin UI round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Counter keys owned by the system; patches never overwrite them.
pub const COUNTER_KEYS: &[&str] = &["views", "likes"];

/// Maximum number of tags (and, separately, categories) on one record.
pub const MAX_TAGS: usize = 50;

/// Maximum length of a single tag or category.
pub const MAX_TAG_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Metadata attached to every content record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<SeoMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aeo: Option<AeoMetadata>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<HowToStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changelog: Vec<String>,

    /// Keys this version does not know about. Preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// schema.org type emitted for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaType {
    Article,
    NewsArticle,
    BlogPosting,
    TechArticle,
}

/// Local-SEO hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMetadata {
    /// ISO 3166-2 style region, e.g. `US-NY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placename: Option<String>,
    /// `lat;long`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answer-engine snippet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_snippet: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HowToStep {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Construction and merge
// ---------------------------------------------------------------------------

impl ContentMetadata {
    /// Build the metadata for a new record from whatever the caller supplied.
    ///
    /// Counters always start at zero regardless of input.
    pub fn initial(supplied: Option<Value>) -> Result<Self, CoreError> {
        let mut metadata = match supplied {
            None | Some(Value::Null) => ContentMetadata::default(),
            Some(value) => Self::from_json(value)?,
        };
        metadata.views = 0;
        metadata.likes = 0;
        metadata.normalize()?;
        Ok(metadata)
    }

    /// Parse a metadata JSON object.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        if !value.is_object() {
            return Err(CoreError::Validation(
                "metadata must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Invalid metadata: {e}")))
    }

    pub fn to_json(&self) -> Value {
        // Serializing plain structs and maps into a Value cannot fail.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Return a copy with `patch` deep-merged in.
    ///
    /// Sibling sub-structures the patch does not mention are kept; nested
    /// objects merge key by key; a `null` removes the key; any other value
    /// replaces it (lists such as `tags` are replaced as a whole). Counter
    /// keys in the patch are ignored.
    pub fn merged(&self, patch: Value) -> Result<Self, CoreError> {
        let Value::Object(mut patch) = patch else {
            return Err(CoreError::Validation(
                "metadata must be a JSON object".into(),
            ));
        };
        for key in COUNTER_KEYS {
            patch.remove(*key);
        }

        let mut current = self.to_json();
        merge_json(&mut current, Value::Object(patch));

        let mut merged = Self::from_json(current)?;
        merged.views = self.views;
        merged.likes = self.likes;
        merged.normalize()?;
        Ok(merged)
    }

    /// Trim and de-duplicate tag-like lists (order of first occurrence wins)
    /// and enforce their limits.
    fn normalize(&mut self) -> Result<(), CoreError> {
        self.tags = normalize_labels("tags", std::mem::take(&mut self.tags))?;
        self.categories = normalize_labels("categories", std::mem::take(&mut self.categories))?;
        Ok(())
    }
}

fn normalize_labels(field: &str, labels: Vec<String>) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() || out.iter().any(|l| l == label) {
            continue;
        }
        if label.chars().count() > MAX_TAG_LEN {
            return Err(CoreError::Validation(format!(
                "Each entry in {field} must be at most {MAX_TAG_LEN} characters"
            )));
        }
        out.push(label.to_string());
    }
    if out.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS} {field} is allowed"
        )));
    }
    Ok(out)
}

/// Recursively merge `patch` into `target`.
pub fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    target.remove(&key);
                    continue;
                }
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_json(existing, value);
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}
