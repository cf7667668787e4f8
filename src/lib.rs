pub mod error;
pub mod ext;
pub mod flatten_json_value;
pub mod options;

pub use {
    error::{Error, Result},
    ext::{FlatMapUnflattenExt, ValueFlattenExt},
    flatten_json_value::{
        FieldPath, Segment,
        flatten::{flattened as flatten, flattened_iter},
        unflatten::{unflattened as unflatten, unflattened_value as unflatten_value},
    },
    options::{Conflict, MAX_NESTING, Options},
};

/// Serializes `T` as a flat map, deserializes `T` from one (default [`Options`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<T>(pub T);

#[derive(Debug)]
pub struct FlattenedRef<'a, T>(pub &'a T);

impl<T> Flattened<T> {
    pub fn as_ref(&self) -> FlattenedRef<'_, T> {
        FlattenedRef(&self.0)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

mod serde;
