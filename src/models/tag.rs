//! The tag model.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A multi-valued label attachable to many expenses.
///
/// Equality and hashing are scoped to the name field by design: two tags
/// with the same name are the same tag regardless of id. Ids are disposable
/// storage handles, and when a name collides with an already-stored tag the
/// stored id wins (see
/// [ExpensesPersister::persist_tags](crate::stores::ExpensesPersister::persist_tags)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// The opaque id of the tag, generated when absent from input.
    #[serde(default = "generate_tag_id")]
    pub id: String,
    /// The display name of the tag.
    pub name: String,
}

impl Tag {
    /// Create a tag with a known id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Create a tag from user input, assigning a fresh id.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        Self {
            id: generate_tag_id(),
            name: name.into(),
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

fn generate_tag_id() -> String {
    Uuid::new_v4().to_string()
}
