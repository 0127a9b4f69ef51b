use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single row of the paginated list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
}

impl Item {
    pub fn new(id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Create an item with a freshly generated id
    pub fn with_title(title: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4(), title)
    }
}
