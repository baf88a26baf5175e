//! Change feed events.

use std::fmt;

use super::{Business, Category, EntityKind};

/// A typed record carried by an insert or update event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRecord {
    Business(Business),
    Category(Category),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Business(_) => EntityKind::Business,
            EntityRecord::Category(_) => EntityKind::Category,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            EntityRecord::Business(b) => &b.id,
            EntityRecord::Category(c) => &c.id,
        }
    }
}

impl From<Business> for EntityRecord {
    fn from(business: Business) -> Self {
        EntityRecord::Business(business)
    }
}

impl From<Category> for EntityRecord {
    fn from(category: Category) -> Self {
        EntityRecord::Category(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

/// One committed write on the remote, as pushed over the change feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    Insert(EntityRecord),
    Update(EntityRecord),
    Delete { kind: EntityKind, id: String },
}

impl ChangeEvent {
    pub fn insert(record: impl Into<EntityRecord>) -> Self {
        ChangeEvent::Insert(record.into())
    }

    pub fn update(record: impl Into<EntityRecord>) -> Self {
        ChangeEvent::Update(record.into())
    }

    pub fn delete(kind: EntityKind, id: impl Into<String>) -> Self {
        ChangeEvent::Delete { kind, id: id.into() }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ChangeEvent::Insert(_) => Operation::Insert,
            ChangeEvent::Update(_) => Operation::Update,
            ChangeEvent::Delete { .. } => Operation::Delete,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            ChangeEvent::Insert(r) | ChangeEvent::Update(r) => r.kind(),
            ChangeEvent::Delete { kind, .. } => *kind,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChangeEvent::Insert(r) | ChangeEvent::Update(r) => r.id(),
            ChangeEvent::Delete { id, .. } => id,
        }
    }
}
