//! ShoutOut entity - a public recognition post

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum characters in a shout-out or comment body
pub const MAX_BODY_CHARS: usize = 2000;

/// Trim a shout-out or comment body and enforce the length rules
pub fn normalize_body(raw: &str) -> Result<String, DomainError> {
    let body = raw.trim();
    if body.is_empty() {
        return Err(DomainError::EmptyBody);
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(DomainError::ContentTooLong { max: MAX_BODY_CHARS });
    }
    Ok(body.to_string())
}

/// ShoutOut entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoutOut {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub message: String,
    /// Opaque media identifiers owned by the storage collaborator
    pub media: Vec<String>,
    /// Tagged members, deduplicated, never containing the author
    pub recipients: Vec<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub edit_count: i32,
}

impl ShoutOut {
    /// Build a new shout-out, normalising the recipient list
    pub fn new(
        id: Snowflake,
        author_id: Snowflake,
        message: String,
        recipients: impl IntoIterator<Item = Snowflake>,
        media: Vec<String>,
    ) -> Self {
        let mut tagged: Vec<Snowflake> = Vec::new();
        for recipient in recipients {
            if recipient != author_id && !tagged.contains(&recipient) {
                tagged.push(recipient);
            }
        }

        Self {
            id,
            author_id,
            message,
            media,
            recipients: tagged,
            created_at: Utc::now(),
            edited_at: None,
            edit_count: 0,
        }
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    #[inline]
    pub fn tags(&self, member_id: Snowflake) -> bool {
        self.recipients.contains(&member_id)
    }

    /// Replace the message and bump the edit counter
    pub fn edit(&mut self, message: String) {
        self.message = message;
        self.edit_count += 1;
        self.edited_at = Some(Utc::now());
    }
}
