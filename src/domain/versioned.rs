use chrono::{DateTime, Utc};

use crate::domain::Key;

/// An entity identified by an `(id, revision)` pair.
pub trait Versioned {
    /// The entity identifier.
    fn id(&self) -> &str;

    /// The entity revision, if it has one.
    fn revision(&self) -> Option<&str>;

    /// When this revision was last changed, if recorded.
    fn changed_at(&self) -> Option<DateTime<Utc>>;

    /// The entity's own key.
    fn key(&self) -> Key {
        Key::from_parts(self.id(), self.revision())
    }
}

/// Implements [`Versioned`] for structs with `id`, `revision` and
/// `changed_at` fields.
macro_rules! impl_versioned {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::domain::Versioned for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn revision(&self) -> Option<&str> {
                    self.revision.as_deref()
                }

                fn changed_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    self.changed_at
                }
            }
        )+
    };
}

pub(crate) use impl_versioned;
