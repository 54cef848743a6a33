//! Model-to-JSON serializers used by the generic views.

use crate::error::Result;
use crate::store::{Model, QuerySet};
use serde_json::Value;
use std::fmt;

/// A named conversion from a model instance to its JSON representation.
pub struct SerializerClass<M> {
    name: &'static str,
    to_representation: fn(&M) -> Result<Value>,
}

impl<M> SerializerClass<M> {
    pub const fn new(name: &'static str, to_representation: fn(&M) -> Result<Value>) -> Self {
        Self {
            name,
            to_representation,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn serialize(&self, instance: &M) -> Result<Value> {
        (self.to_representation)(instance)
    }
}

impl<M: Model> SerializerClass<M> {
    /// Serialize every record of `queryset` into a JSON array.
    pub fn serialize_many(&self, queryset: &QuerySet<M>) -> Result<Value> {
        queryset
            .iter()
            .map(|instance| self.serialize(instance))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<M> Clone for SerializerClass<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for SerializerClass<M> {}

impl<M> fmt::Debug for SerializerClass<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.name)
    }
}
