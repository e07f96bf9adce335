//! # Update Posts
//!
//! Model for the blog-style "updates" served by the headless CMS.
//!
//! The CMS schema drifts over time (field renames, new block types), so the
//! model is tolerant on the way in and normalized on the way out:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CMS document                          UpdatePost                       │
//! │  ─────────────                         ──────────                       │
//! │  createdAt | created_at        ──►     created_at                       │
//! │  updatedAt | updated_at        ──►     updated_at                       │
//! │  featuredImage | featured_image──►     featured_image (string or .url)  │
//! │  author (string | {name})      ──►     author                           │
//! │  layout[]                      ──►     Vec<Block>                       │
//! │     blockType "content"        ──►       Block::Known(Content)          │
//! │     blockType "mediaBlock"     ──►       Block::Known(Media)            │
//! │     blockType "cta"            ──►       Block::Known(CallToAction)     │
//! │     anything else              ──►       Block::Unknown { fields }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Blocks
// =============================================================================

/// One element of a post's `layout`.
///
/// Known block types are tried first; anything that does not fit one of them
/// (unknown `blockType`, or a known type whose shape drifted) is kept as
/// [`Block::Unknown`] instead of failing the whole post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block {
    Known(KnownBlock),
    Unknown(UnknownBlock),
}

impl Block {
    /// The `blockType` discriminator.
    pub fn block_type(&self) -> &str {
        match self {
            Block::Known(KnownBlock::Content(_)) => "content",
            Block::Known(KnownBlock::Media(_)) => "mediaBlock",
            Block::Known(KnownBlock::CallToAction(_)) => "cta",
            Block::Unknown(block) => &block.block_type,
        }
    }

    /// The block's id, when the CMS sent one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Known(KnownBlock::Content(b)) => b.id.as_deref(),
            Block::Known(KnownBlock::Media(b)) => b.id.as_deref(),
            Block::Known(KnownBlock::CallToAction(b)) => b.id.as_deref(),
            Block::Unknown(b) => b.fields.get("id").and_then(Value::as_str),
        }
    }
}

/// Block types this site renders natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType")]
pub enum KnownBlock {
    #[serde(rename = "content")]
    Content(ContentBlock),
    #[serde(rename = "mediaBlock")]
    Media(MediaBlock),
    #[serde(rename = "cta")]
    CallToAction(CallToActionBlock),
}

/// Columns of rich text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(default)]
    pub columns: Vec<ContentColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Rich-text tree, passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<Value>,
}

/// A single image or video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    /// Media id or populated media document, depending on query depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Value>,
}

/// Call-to-action text with links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToActionBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rich_text: Option<Value>,
    #[serde(default)]
    pub links: Vec<Value>,
}

/// A block this site does not model. Every other field is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownBlock {
    #[serde(rename = "blockType")]
    pub block_type: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

// =============================================================================
// Posts
// =============================================================================

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

/// A normalized update post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawUpdatePost", rename_all = "camelCase")]
pub struct UpdatePost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// Legacy rich-text body, kept for posts written before `layout` existed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    pub layout: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub author: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

/// A page of documents as returned by the CMS list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostsPage {
    #[serde(default)]
    pub docs: Vec<UpdatePost>,
}

/// Wire shape of a CMS document, before normalization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUpdatePost {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    layout: Option<Vec<Block>>,
    #[serde(default)]
    featured_image: Option<Value>,
    #[serde(default, rename = "featured_image")]
    featured_image_snake: Option<Value>,
    #[serde(default)]
    author: Option<Value>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default, rename = "created_at")]
    created_at_snake: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    #[serde(default, rename = "updated_at")]
    updated_at_snake: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl From<RawUpdatePost> for UpdatePost {
    fn from(raw: RawUpdatePost) -> Self {
        let id = match raw.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };

        let featured_image = raw
            .featured_image
            .or(raw.featured_image_snake)
            .and_then(|v| text_of(&v, &["url", "filename"]));

        let status = match raw.status.as_deref() {
            Some("draft") => Some(PostStatus::Draft),
            Some("published") => Some(PostStatus::Published),
            _ => None,
        };

        UpdatePost {
            id,
            title: raw.title.unwrap_or_default(),
            slug: raw.slug.unwrap_or_default(),
            excerpt: raw.excerpt.unwrap_or_default(),
            content: raw.content,
            layout: raw.layout.unwrap_or_default(),
            featured_image,
            author: raw
                .author
                .and_then(|v| text_of(&v, &["name", "email"]))
                .unwrap_or_default(),
            created_at: parse_timestamp(raw.created_at.or(raw.created_at_snake)),
            updated_at: parse_timestamp(raw.updated_at.or(raw.updated_at_snake)),
            status,
        }
    }
}

/// A string value, or the first string found under `keys` of an object.
fn text_of(value: &Value, keys: &[&str]) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => keys
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

fn parse_timestamp(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|ts| ts.with_timezone(&Utc))
}

/// Sorts posts newest first. Posts without a timestamp go last.
pub fn sort_newest_first(posts: &mut [UpdatePost]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

// =============================================================================
// Unit Tests
// =============================================================================
