//! The polymorphic content record.
//!
//! Every publishable item lives in one collection. Common fields sit on
//! [`ContentRecord`]; the fields that only make sense for one content type
//! live in the [`ContentVariant`] sum type, tagged by `content_type`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::lifecycle;
use crate::metadata::ContentMetadata;
use crate::slug::resolve_slug;
use crate::types::{ContentId, Timestamp};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Declares a string-backed enum with `as_str`, `parse` and `Display`.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $label:literal $(| $alias:literal)*),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label $(, alias = $alias)*)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a label (case-insensitive). Returns `None` for unknown values.
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim().to_ascii_lowercase();
                match value.as_str() {
                    $($label $(| $alias)* => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum! {
    /// Which of the five shapes a record has. Fixed at creation.
    pub enum ContentType {
        Post => "post",
        Update => "update",
        Resource => "resource",
        Press => "press",
        Feed => "feed" | "social",
    }
}

labelled_enum! {
    /// Visibility axis of the lifecycle.
    pub enum ContentStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

labelled_enum! {
    pub enum UpdateType {
        Feature => "feature",
        Improvement => "improvement",
        Fix => "fix",
    }
}

labelled_enum! {
    pub enum ImpactLevel {
        Major => "major",
        Minor => "minor",
        Patch => "patch",
    }
}

labelled_enum! {
    /// Social network a feed item was reposted from.
    pub enum Platform {
        Instagram => "instagram",
        Linkedin => "linkedin",
        Youtube => "youtube",
        Twitter => "twitter",
        Facebook => "facebook",
        Other => "other",
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Who created a record. Captured from the authenticated actor; never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A file attached to a documentation resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostFields {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub excerpt: String,
    pub featured_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFields {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub summary: String,
    pub version: Option<String>,
    pub update_type: Option<UpdateType>,
    pub impact_level: Option<ImpactLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceFields {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub summary: String,
    pub version: Option<String>,
    /// `None` for root resources.
    pub parent_id: Option<ContentId>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PressFields {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub excerpt: String,
    pub external_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedFields {
    pub platform: Option<Platform>,
    pub embed_code: Option<String>,
    pub post_url: Option<String>,
    pub description: Option<String>,
}

/// Type-specific payload, tagged by `content_type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "lowercase")]
pub enum ContentVariant {
    Post(PostFields),
    Update(UpdateFields),
    Resource(ResourceFields),
    Press(PressFields),
    Feed(FeedFields),
}

/// One stored content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub title: String,
    pub slug: String,
    #[serde(flatten)]
    pub variant: ContentVariant,
    pub status: ContentStatus,
    pub author: Author,
    pub metadata: ContentMetadata,
    /// Incremented by the store on every update; used for optimistic writes.
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Input payloads
// ---------------------------------------------------------------------------

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: absent gives
/// `None`, `null` gives `Some(None)`, a value gives `Some(Some(v))`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Flat bag of the type-specific fields accepted on create and update.
///
/// Enum-valued fields are kept as raw strings so unknown values surface as
/// validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantFields {
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub summary: Option<String>,
    #[serde(default, alias = "featuredImage", deserialize_with = "nullable")]
    pub featured_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub version: Option<Option<String>>,
    #[serde(default, alias = "updateType", deserialize_with = "nullable")]
    pub update_type: Option<Option<String>>,
    #[serde(default, alias = "impactLevel", deserialize_with = "nullable")]
    pub impact_level: Option<Option<String>>,
    #[serde(default, alias = "parentId", deserialize_with = "nullable")]
    pub parent_id: Option<Option<ContentId>>,
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default, alias = "externalLink", deserialize_with = "nullable")]
    pub external_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub platform: Option<Option<String>>,
    #[serde(default, alias = "embedCode", deserialize_with = "nullable")]
    pub embed_code: Option<Option<String>>,
    #[serde(default, alias = "postUrl", deserialize_with = "nullable")]
    pub post_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

/// Payload for creating a record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewContent {
    #[serde(default)]
    #[validate(length(max = 300, message = "title must be at most 300 characters"))]
    pub title: String,
    pub slug: Option<String>,
    #[serde(alias = "contentType")]
    pub content_type: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub fields: VariantFields,
    pub metadata: Option<Value>,
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContentPatch {
    #[validate(length(max = 300, message = "title must be at most 300 characters"))]
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<String>,
    /// Accepted only when it matches the stored type.
    #[serde(alias = "contentType")]
    pub content_type: Option<String>,
    #[serde(flatten)]
    pub fields: VariantFields,
    pub metadata: Option<Value>,
    /// When set, the write only succeeds against this stored revision.
    #[serde(alias = "expectedRevision")]
    pub expected_revision: Option<i64>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

pub fn parse_content_type(value: &str) -> Result<ContentType, CoreError> {
    ContentType::parse(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid content type '{value}'. Valid types: post, update, resource, press, feed"
        ))
    })
}

pub fn parse_status(value: &str) -> Result<ContentStatus, CoreError> {
    ContentStatus::parse(value).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid status '{value}'. Valid statuses: draft, published, archived"
        ))
    })
}

fn parse_optional<T>(
    value: Option<String>,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, CoreError> {
    match value {
        None => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("Invalid {field} '{raw}'"))),
    }
}

fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    Ok(title.to_string())
}

// ---------------------------------------------------------------------------
// Variant behaviour
// ---------------------------------------------------------------------------

impl VariantFields {
    /// Names of the fields carrying a non-null value.
    fn present(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut mark = |present: bool, name: &'static str| {
            if present {
                names.push(name);
            }
        };
        mark(self.body.is_some(), "body");
        mark(self.excerpt.is_some(), "excerpt");
        mark(self.summary.is_some(), "summary");
        mark(matches!(self.featured_image, Some(Some(_))), "featured_image");
        mark(matches!(self.version, Some(Some(_))), "version");
        mark(matches!(self.update_type, Some(Some(_))), "update_type");
        mark(matches!(self.impact_level, Some(Some(_))), "impact_level");
        mark(matches!(self.parent_id, Some(Some(_))), "parent_id");
        mark(self.attachments.is_some(), "attachments");
        mark(matches!(self.external_link, Some(Some(_))), "external_link");
        mark(matches!(self.platform, Some(Some(_))), "platform");
        mark(matches!(self.embed_code, Some(Some(_))), "embed_code");
        mark(matches!(self.post_url, Some(Some(_))), "post_url");
        mark(matches!(self.description, Some(Some(_))), "description");
        names
    }
}

/// Overwrite `slot` when the patch mentions the field (including with null).
fn assign<T>(slot: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ContentType {
    /// Type-specific fields a record of this type accepts.
    pub fn allowed_fields(self) -> &'static [&'static str] {
        match self {
            ContentType::Post => &["body", "excerpt", "featured_image"],
            ContentType::Update => &["body", "summary", "version", "update_type", "impact_level"],
            ContentType::Resource => &["body", "summary", "version", "parent_id", "attachments"],
            ContentType::Press => &["body", "excerpt", "external_link"],
            ContentType::Feed => &["platform", "embed_code", "post_url", "description"],
        }
    }
}

impl ContentVariant {
    /// An empty payload of the given type.
    pub fn empty(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Post => ContentVariant::Post(PostFields::default()),
            ContentType::Update => ContentVariant::Update(UpdateFields::default()),
            ContentType::Resource => ContentVariant::Resource(ResourceFields::default()),
            ContentType::Press => ContentVariant::Press(PressFields::default()),
            ContentType::Feed => ContentVariant::Feed(FeedFields::default()),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentVariant::Post(_) => ContentType::Post,
            ContentVariant::Update(_) => ContentType::Update,
            ContentVariant::Resource(_) => ContentType::Resource,
            ContentVariant::Press(_) => ContentType::Press,
            ContentVariant::Feed(_) => ContentType::Feed,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ContentVariant::Post(f) => Some(&f.body),
            ContentVariant::Update(f) => Some(&f.body),
            ContentVariant::Resource(f) => Some(&f.body),
            ContentVariant::Press(f) => Some(&f.body),
            ContentVariant::Feed(_) => None,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            ContentVariant::Update(f) => Some(&f.summary),
            ContentVariant::Resource(f) => Some(&f.summary),
            _ => None,
        }
    }

    pub fn excerpt(&self) -> Option<&str> {
        match self {
            ContentVariant::Post(f) => Some(&f.excerpt),
            ContentVariant::Press(f) => Some(&f.excerpt),
            _ => None,
        }
    }

    pub fn parent_id(&self) -> Option<ContentId> {
        match self {
            ContentVariant::Resource(f) => f.parent_id,
            _ => None,
        }
    }

    pub fn platform(&self) -> Option<Platform> {
        match self {
            ContentVariant::Feed(f) => f.platform,
            _ => None,
        }
    }

    pub fn update_type(&self) -> Option<UpdateType> {
        match self {
            ContentVariant::Update(f) => f.update_type,
            _ => None,
        }
    }

    /// Apply a field bag to this payload.
    ///
    /// Fails when a non-null field does not belong to this content type, so
    /// one shape's fields can never leak into another's.
    pub fn apply(&mut self, fields: VariantFields) -> Result<(), CoreError> {
        let content_type = self.content_type();
        let allowed = content_type.allowed_fields();
        if let Some(stray) = fields.present().into_iter().find(|f| !allowed.contains(f)) {
            return Err(CoreError::Validation(format!(
                "Field '{stray}' does not apply to {content_type} content"
            )));
        }

        match self {
            ContentVariant::Post(f) => {
                if let Some(body) = fields.body {
                    f.body = body;
                }
                if let Some(excerpt) = fields.excerpt {
                    f.excerpt = excerpt;
                }
                assign(&mut f.featured_image, fields.featured_image);
            }
            ContentVariant::Update(f) => {
                if let Some(body) = fields.body {
                    f.body = body;
                }
                if let Some(summary) = fields.summary {
                    f.summary = summary;
                }
                assign(&mut f.version, fields.version);
                if let Some(raw) = fields.update_type {
                    f.update_type = parse_optional(raw, "update type", UpdateType::parse)?;
                }
                if let Some(raw) = fields.impact_level {
                    f.impact_level = parse_optional(raw, "impact level", ImpactLevel::parse)?;
                }
            }
            ContentVariant::Resource(f) => {
                if let Some(body) = fields.body {
                    f.body = body;
                }
                if let Some(summary) = fields.summary {
                    f.summary = summary;
                }
                assign(&mut f.version, fields.version);
                assign(&mut f.parent_id, fields.parent_id);
                if let Some(attachments) = fields.attachments {
                    f.attachments = attachments;
                }
            }
            ContentVariant::Press(f) => {
                if let Some(body) = fields.body {
                    f.body = body;
                }
                if let Some(excerpt) = fields.excerpt {
                    f.excerpt = excerpt;
                }
                assign(&mut f.external_link, fields.external_link);
            }
            ContentVariant::Feed(f) => {
                if let Some(raw) = fields.platform {
                    f.platform = parse_optional(raw, "platform", Platform::parse)?;
                }
                assign(&mut f.embed_code, fields.embed_code);
                assign(&mut f.post_url, fields.post_url);
                assign(&mut f.description, fields.description);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Construction and update
// ---------------------------------------------------------------------------

impl ContentRecord {
    /// Build a new record from a create payload. Pure: no I/O.
    ///
    /// Requires a non-blank title and a known content type. Variant fields
    /// may be empty so drafts can be saved early.
    pub fn new(
        id: ContentId,
        input: NewContent,
        author: Author,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        input.validate()?;
        let title = validate_title(&input.title)?;

        let content_type = match input.content_type.as_deref() {
            Some(raw) => parse_content_type(raw)?,
            None => {
                return Err(CoreError::Validation("Content type is required".into()));
            }
        };
        let status = match input.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => ContentStatus::Draft,
        };

        let mut variant = ContentVariant::empty(content_type);
        variant.apply(input.fields)?;

        let metadata = ContentMetadata::initial(input.metadata)?;
        let slug = resolve_slug(input.slug.as_deref(), &title, content_type, id);

        let mut record = ContentRecord {
            id,
            title,
            slug,
            variant,
            status: ContentStatus::Draft,
            author,
            metadata,
            revision: 1,
            created_at: now,
            updated_at: now,
            published_at: None,
            deleted_at: None,
        };
        lifecycle::set_status(&mut record, status, now);
        Ok(record)
    }

    pub fn content_type(&self) -> ContentType {
        self.variant.content_type()
    }

    /// Apply a partial update in place.
    ///
    /// Either the whole patch applies or `self` is left untouched.
    /// `updated_at` is refreshed only on success.
    pub fn apply_patch(&mut self, patch: ContentPatch, now: Timestamp) -> Result<(), CoreError> {
        patch.validate()?;
        let mut next = self.clone();

        if let Some(raw) = patch.content_type.as_deref() {
            if parse_content_type(raw)? != self.content_type() {
                return Err(CoreError::Validation(
                    "Content type cannot be changed after creation".into(),
                ));
            }
        }

        if let Some(title) = patch.title.as_deref() {
            next.title = validate_title(title)?;
        }
        if let Some(slug) = patch.slug.as_deref() {
            next.slug = resolve_slug(Some(slug), &next.title, next.content_type(), next.id);
        }

        next.variant.apply(patch.fields)?;

        if let Some(metadata) = patch.metadata {
            next.metadata = next.metadata.merged(metadata)?;
        }

        if let Some(raw) = patch.status.as_deref() {
            let status = parse_status(raw)?;
            lifecycle::set_status(&mut next, status, now);
        }

        next.updated_at = now;
        *self = next;
        Ok(())
    }
}
