//! Path resolution - walks the type graph along field names.

use tracing::trace;

use super::types::{Field, Schema, Type, TypeRef};
use crate::error::{QuerysmithError, Result};

impl Schema {
    /// Find a named type.
    pub fn lookup_type_by_name(&self, name: &str) -> Result<&Type> {
        self.index
            .get(name)
            .map(|&i| &self.types[i])
            .ok_or_else(|| QuerysmithError::type_not_found(name))
    }

    /// The root query type.
    pub fn query_type(&self) -> Result<&Type> {
        self.lookup_type_by_name(&self.query_type)
    }

    /// The root mutation type, `NotFound` when the schema declares none.
    pub fn mutation_type(&self) -> Result<&Type> {
        match self.mutation_type.as_deref() {
            Some(name) => self.lookup_type_by_name(name),
            None => Err(QuerysmithError::type_not_found("<mutation root>")),
        }
    }

    /// Resolve the named type at the bottom of a wrapper chain.
    pub fn resolve_ref(&self, r: &TypeRef) -> Result<&Type> {
        self.lookup_type_by_name(r.unwrap_type().name)
    }

    /// Walk `field_path` from the root query type, returning the named type
    /// reached by each segment.
    pub fn lookup_query_types_by_field_path<S: AsRef<str>>(
        &self,
        field_path: &[S],
    ) -> Result<Vec<&Type>> {
        let mut current = self.query_type()?;
        let mut result = Vec::with_capacity(field_path.len());

        for segment in field_path {
            let (_, next) = self.step(current, segment.as_ref())?;
            result.push(next);
            current = next;
        }

        Ok(result)
    }

    /// Field named `name` directly on the root mutation type.
    pub fn lookup_mutation_by_name(&self, name: &str) -> Result<&Field> {
        let root = self.mutation_type().map_err(|_| QuerysmithError::mutation_not_found(name))?;
        root.field(name).ok_or_else(|| QuerysmithError::mutation_not_found(name))
    }

    /// The field reached by the last segment of `field_path`, walking from `start`.
    pub fn lookup_field_by_path<'a, S: AsRef<str>>(
        &'a self,
        start: &'a Type,
        field_path: &[S],
    ) -> Result<&'a Field> {
        let mut current = start;
        let mut found = None;

        for segment in field_path {
            let (field, next) = self.step(current, segment.as_ref())?;
            found = Some(field);
            current = next;
        }

        found.ok_or_else(|| QuerysmithError::InvalidPath {
            type_name: start.name.clone(),
            segment: String::new(),
        })
    }

    /// Follow one field from `current`. `current` must be able to hold fields.
    pub(crate) fn step<'a>(
        &'a self,
        current: &'a Type,
        segment: &str,
    ) -> Result<(&'a Field, &'a Type)> {
        if !current.kind.has_fields() {
            return Err(QuerysmithError::InvalidPath {
                type_name: current.name.clone(),
                segment: segment.to_string(),
            });
        }

        let field = current.field(segment).ok_or_else(|| QuerysmithError::FieldNotFound {
            type_name: current.name.clone(),
            field: segment.to_string(),
        })?;
        let next = self.resolve_ref(&field.type_ref)?;

        trace!(from = %current.name, field = segment, to = %next.name, "path step");
        Ok((field, next))
    }
}
