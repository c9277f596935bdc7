//! Row model for the `content` table.
//!
//! Variant fields are flattened into nullable columns; conversion to and from
//! [`ContentRecord`] picks the columns that belong to the record's type.

use pressroom_core::content::{
    Attachment, Author, ContentRecord, ContentStatus, ContentType, ContentVariant, FeedFields,
    ImpactLevel, Platform, PostFields, PressFields, ResourceFields, UpdateFields, UpdateType,
};
use pressroom_core::error::CoreError;
use pressroom_core::metadata::ContentMetadata;
use pressroom_core::types::{ContentId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// Column list for `content` queries, in [`ContentRow`] order.
pub const COLUMNS: &str = "id, title, slug, content_type, status, body, excerpt, summary, \
    featured_image, version, update_type, impact_level, parent_id, attachments, \
    external_link, platform, embed_code, post_url, description, \
    author_id, author_name, author_email, metadata, revision, \
    created_at, updated_at, published_at, deleted_at";

/// A row from the `content` table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentRow {
    pub id: ContentId,
    pub title: String,
    pub slug: String,
    pub content_type: String,
    pub status: String,
    pub body: String,
    pub excerpt: String,
    pub summary: String,
    pub featured_image: Option<String>,
    pub version: Option<String>,
    pub update_type: Option<String>,
    pub impact_level: Option<String>,
    pub parent_id: Option<ContentId>,
    pub attachments: Json<Vec<Attachment>>,
    pub external_link: Option<String>,
    pub platform: Option<String>,
    pub embed_code: Option<String>,
    pub post_url: Option<String>,
    pub description: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub metadata: Json<ContentMetadata>,
    pub revision: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

fn label<T: Copy>(value: Option<T>, as_str: fn(T) -> &'static str) -> Option<String> {
    value.map(|v| as_str(v).to_string())
}

fn parse_column<T>(
    column: &str,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, CoreError> {
    parse(raw).ok_or_else(|| {
        CoreError::Storage(format!("Unrecognised value '{raw}' in column {column}"))
    })
}

fn parse_nullable<T>(
    column: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, CoreError> {
    raw.map(|r| parse_column(column, r, parse)).transpose()
}

impl ContentRow {
    /// Flatten a record into its row shape.
    pub fn from_record(record: &ContentRecord) -> Self {
        let mut row = ContentRow {
            id: record.id,
            title: record.title.clone(),
            slug: record.slug.clone(),
            content_type: record.content_type().as_str().to_string(),
            status: record.status.as_str().to_string(),
            body: String::new(),
            excerpt: String::new(),
            summary: String::new(),
            featured_image: None,
            version: None,
            update_type: None,
            impact_level: None,
            parent_id: None,
            attachments: Json(Vec::new()),
            external_link: None,
            platform: None,
            embed_code: None,
            post_url: None,
            description: None,
            author_id: record.author.id.clone(),
            author_name: record.author.name.clone(),
            author_email: record.author.email.clone(),
            metadata: Json(record.metadata.clone()),
            revision: record.revision,
            created_at: record.created_at,
            updated_at: record.updated_at,
            published_at: record.published_at,
            deleted_at: record.deleted_at,
        };

        match &record.variant {
            ContentVariant::Post(f) => {
                row.body = f.body.clone();
                row.excerpt = f.excerpt.clone();
                row.featured_image = f.featured_image.clone();
            }
            ContentVariant::Update(f) => {
                row.body = f.body.clone();
                row.summary = f.summary.clone();
                row.version = f.version.clone();
                row.update_type = label(f.update_type, UpdateType::as_str);
                row.impact_level = label(f.impact_level, ImpactLevel::as_str);
            }
            ContentVariant::Resource(f) => {
                row.body = f.body.clone();
                row.summary = f.summary.clone();
                row.version = f.version.clone();
                row.parent_id = f.parent_id;
                row.attachments = Json(f.attachments.clone());
            }
            ContentVariant::Press(f) => {
                row.body = f.body.clone();
                row.excerpt = f.excerpt.clone();
                row.external_link = f.external_link.clone();
            }
            ContentVariant::Feed(f) => {
                row.platform = label(f.platform, Platform::as_str);
                row.embed_code = f.embed_code.clone();
                row.post_url = f.post_url.clone();
                row.description = f.description.clone();
            }
        }
        row
    }
}

impl TryFrom<ContentRow> for ContentRecord {
    type Error = CoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let content_type = parse_column("content_type", &row.content_type, ContentType::parse)?;
        let status = parse_column("status", &row.status, ContentStatus::parse)?;

        let variant = match content_type {
            ContentType::Post => ContentVariant::Post(PostFields {
                body: row.body,
                excerpt: row.excerpt,
                featured_image: row.featured_image,
            }),
            ContentType::Update => ContentVariant::Update(UpdateFields {
                body: row.body,
                summary: row.summary,
                version: row.version,
                update_type: parse_nullable(
                    "update_type",
                    row.update_type.as_deref(),
                    UpdateType::parse,
                )?,
                impact_level: parse_nullable(
                    "impact_level",
                    row.impact_level.as_deref(),
                    ImpactLevel::parse,
                )?,
            }),
            ContentType::Resource => ContentVariant::Resource(ResourceFields {
                body: row.body,
                summary: row.summary,
                version: row.version,
                parent_id: row.parent_id,
                attachments: row.attachments.0,
            }),
            ContentType::Press => ContentVariant::Press(PressFields {
                body: row.body,
                excerpt: row.excerpt,
                external_link: row.external_link,
            }),
            ContentType::Feed => ContentVariant::Feed(FeedFields {
                platform: parse_nullable("platform", row.platform.as_deref(), Platform::parse)?,
                embed_code: row.embed_code,
                post_url: row.post_url,
                description: row.description,
            }),
        };

        Ok(ContentRecord {
            id: row.id,
            title: row.title,
            slug: row.slug,
            variant,
            status,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            metadata: row.metadata.0,
            revision: row.revision,
            created_at: row.created_at,
            updated_at: row.updated_at,
            published_at: row.published_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use pressroom_core::content::NewContent;
    use serde_json::json;

    fn record(value: serde_json::Value) -> ContentRecord {
        let input: NewContent = serde_json::from_value(value).unwrap();
        let author = Author {
            id: "u1".into(),
            name: "Editor".into(),
            email: Some("editor@example.com".into()),
        };
        ContentRecord::new(ContentId::now_v7(), input, author, Utc::now()).unwrap()
    }

    #[test]
    fn columns_list_matches_row_fields() {
        assert_eq!(COLUMNS.split(',').count(), 28);
    }

    #[test]
    fn feed_row_leaves_text_columns_empty() {
        let feed = record(json!({
            "title": "Clip",
            "content_type": "feed",
            "platform": "youtube",
            "post_url": "https://youtube.com/watch?v=1"
        }));
        let row = ContentRow::from_record(&feed);
        assert_eq!(row.content_type, "feed");
        assert_eq!(row.platform.as_deref(), Some("youtube"));
        assert_eq!(row.body, "");
        assert!(row.parent_id.is_none());

        let back = ContentRecord::try_from(row).unwrap();
        assert_eq!(back, feed);
    }

    #[test]
    fn update_row_keeps_enum_labels() {
        let update = record(json!({
            "title": "2.0",
            "content_type": "update",
            "update_type": "improvement",
            "impact_level": "major"
        }));
        let row = ContentRow::from_record(&update);
        assert_eq!(row.update_type.as_deref(), Some("improvement"));
        assert_eq!(row.impact_level.as_deref(), Some("major"));
        assert_eq!(ContentRecord::try_from(row).unwrap(), update);
    }

    #[test]
    fn unknown_status_is_a_storage_error() {
        let mut row = ContentRow::from_record(&record(json!({"title": "x", "content_type": "post"})));
        row.status = "scheduled".into();
        assert_matches!(ContentRecord::try_from(row), Err(CoreError::Storage(_)));
    }
}
