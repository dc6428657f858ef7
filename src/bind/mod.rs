//! Populating records from a [`Store`].
//!
//! A record type describes its bindable fields once, through [`Bind`]. Each
//! field is either untagged (left alone), tagged with the key it is read from,
//! or a nested record that is bound with the same rules. The [`bindable!`]
//! macro writes the descriptor for the common case.
//!
//! ```
//! use envbind::{bindable, MemoryStore, Env};
//!
//! #[derive(Debug, Default)]
//! struct Database {
//!     host: String,
//!     port: u16,
//!     pool: Option<u32>,
//! }
//!
//! bindable!(Database {
//!     host => "DB_HOST",
//!     port => "DB_PORT",
//! });
//!
//! let env = Env::new(MemoryStore::from_iter([("DB_HOST", "localhost"), ("DB_PORT", "5432")]));
//! let mut db = Database::default();
//! env.get_struct(&mut db)?;
//! assert_eq!(db.host, "localhost");
//! assert_eq!(db.port, 5432);
//! assert_eq!(db.pool, None);
//! # Ok::<(), envbind::GetError>(())
//! ```

use crate::access::GetError;
use crate::store::Store;

/// Assigns a tagged field from the value stored under `key`.
pub type Assign<T> = fn(&mut T, &str, &dyn Store) -> Result<(), GetError>;

/// Binds a nested record field.
pub type Descend<T> = fn(&mut T, &dyn Store) -> Result<(), GetError>;

/// A record type that can be populated from a store.
pub trait Bind {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// The record's fields, in declaration order.
    fn fields() -> Vec<Field<Self>>
    where
        Self: Sized;
}

/// Describes one field of a [`Bind`] record.
pub struct Field<T> {
    name: &'static str,
    slot: Slot<T>,
}

enum Slot<T> {
    Untagged,
    Tagged {
        key: &'static str,
        assign: Option<Assign<T>>,
    },
    Nested(Descend<T>),
}

impl<T> Field<T> {
    /// A field with no key; binding leaves it untouched.
    pub fn untagged(name: &'static str) -> Self {
        Self {
            name,
            slot: Slot::Untagged,
        }
    }

    /// A field read from `key`.
    pub fn tagged(name: &'static str, key: &'static str, assign: Assign<T>) -> Self {
        Self {
            name,
            slot: Slot::Tagged {
                key,
                assign: Some(assign),
            },
        }
    }

    /// A field associated with `key` that cannot be assigned.
    ///
    /// Binding a record with such a field fails with
    /// [`GetError::CannotSetField`] when the walk reaches it.
    pub fn read_only(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            slot: Slot::Tagged { key, assign: None },
        }
    }

    /// A field holding another record, bound through `descend`.
    pub fn nested(name: &'static str, descend: Descend<T>) -> Self {
        Self {
            name,
            slot: Slot::Nested(descend),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The key this field is read from, if it is tagged.
    pub fn key(&self) -> Option<&'static str> {
        match self.slot {
            Slot::Tagged { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.key())
            .field("nested", &matches!(self.slot, Slot::Nested(_)))
            .finish()
    }
}

/// Populates the tagged fields of `target` from `store`.
///
/// Fields are visited in declaration order and the first error stops the walk.
/// Fields assigned before the error keep their new values.
pub fn get_struct<T: Bind>(store: &dyn Store, target: &mut T) -> Result<(), GetError> {
    for field in T::fields() {
        match field.slot {
            Slot::Untagged => {}
            Slot::Tagged { assign: None, .. } => {
                return Err(GetError::CannotSetField {
                    record: T::NAME,
                    field: field.name,
                });
            }
            Slot::Tagged {
                key,
                assign: Some(assign),
            } => assign(target, key, store)?,
            Slot::Nested(descend) => descend(target, store)?,
        }
    }
    Ok(())
}

/// Implements [`Bind`] for a record type.
///
/// Each entry is `field => "KEY"` for a field read from `KEY`, or
/// `field => nested` for a field whose type itself implements [`Bind`].
/// Fields not listed are left untouched. Tagged field types must implement
/// [`Cast`](crate::Cast).
#[macro_export]
macro_rules! bindable {
    ($ty:ident { $($field:ident => $spec:tt),* $(,)? }) => {
        impl $crate::Bind for $ty {
            const NAME: &'static str = stringify!($ty);

            fn fields() -> ::std::vec::Vec<$crate::Field<Self>> {
                ::std::vec![$($crate::bindable!(@field $ty, $field, $spec)),*]
            }
        }
    };
    (@field $ty:ident, $field:ident, nested) => {
        $crate::Field::nested(stringify!($field), |target: &mut $ty, store| {
            $crate::bind::get_struct(store, &mut target.$field)
        })
    };
    (@field $ty:ident, $field:ident, $key:literal) => {
        $crate::Field::tagged(stringify!($field), $key, |target: &mut $ty, key, store| {
            target.$field = $crate::access::get(store, key)?;
            Ok(())
        })
    };
}
