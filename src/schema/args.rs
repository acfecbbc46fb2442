//! Argument extraction - which arguments a compiled document surfaces, and
//! how their GraphQL type signatures are written.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Field, InputValue, Kind, Schema, Type, TypeRef};
use crate::error::Result;

/// A rendered argument: name plus GraphQL type signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryArg {
    pub key: String,
    pub value: String,
}

impl TypeRef {
    /// GraphQL signature mirroring the wrapper nesting, e.g. `[EntityGuid]!`.
    pub fn signature(&self) -> String {
        match (self.kind, self.of_type.as_deref()) {
            (Kind::NonNull, Some(inner)) => format!("{}!", inner.signature()),
            (Kind::List, Some(inner)) => format!("[{}]", inner.signature()),
            _ => self.name.clone(),
        }
    }
}

impl Field {
    /// Select this field's arguments.
    ///
    /// With an empty `include_args` only required (outer NON_NULL) arguments
    /// are kept. Otherwise exactly the named arguments are kept, in declared
    /// order; names that match nothing are ignored.
    pub fn select_args<S: AsRef<str>>(&self, include_args: &[S]) -> Vec<&InputValue> {
        if include_args.is_empty() {
            return self.required_args().collect();
        }

        self.args
            .iter()
            .filter(|a| include_args.iter().any(|name| name.as_ref() == a.name))
            .collect()
    }

    /// [`Field::select_args`] rendered as [`QueryArg`]s.
    pub fn query_args<S: AsRef<str>>(&self, include_args: &[S]) -> Vec<QueryArg> {
        self.select_args(include_args)
            .into_iter()
            .map(|a| QueryArg {
                key: a.name.clone(),
                value: a.type_ref.signature(),
            })
            .collect()
    }

    /// Arguments a mutation declares as variables: the required ones plus
    /// any named in `overrides`.
    pub fn select_mutation_args(&self, overrides: &HashMap<String, String>) -> Vec<&InputValue> {
        self.args
            .iter()
            .filter(|a| a.is_required() || overrides.contains_key(&a.name))
            .collect()
    }

    /// [`Field::select_mutation_args`] rendered, override signatures first.
    pub fn mutation_query_args(&self, overrides: &HashMap<String, String>) -> Vec<QueryArg> {
        self.select_mutation_args(overrides)
            .into_iter()
            .map(|a| QueryArg {
                key: a.name.clone(),
                value: overrides
                    .get(&a.name)
                    .cloned()
                    .unwrap_or_else(|| a.type_ref.signature()),
            })
            .collect()
    }
}

/// Variables handed out while compiling one document. An argument whose
/// name is already taken is bound as `<field>_<arg>` instead.
#[derive(Debug, Default)]
pub(crate) struct Variables {
    declared: Vec<QueryArg>,
}

impl Variables {
    /// Declare a variable for `arg` of `field` and return its name.
    pub(crate) fn bind(&mut self, field: &Field, arg: &InputValue, signature: String) -> String {
        let mut name = arg.name.clone();
        let mut n = 1;
        while self.is_taken(&name) {
            name = if n == 1 {
                format!("{}_{}", field.name, arg.name)
            } else {
                format!("{}_{}{}", field.name, arg.name, n)
            };
            n += 1;
        }

        self.declared.push(QueryArg {
            key: name.clone(),
            value: signature,
        });
        name
    }

    fn is_taken(&self, name: &str) -> bool {
        self.declared.iter().any(|v| v.key == name)
    }

    pub(crate) fn declared(&self) -> &[QueryArg] {
        &self.declared
    }

    pub(crate) fn into_args(self) -> Vec<QueryArg> {
        self.declared
    }
}

impl Schema {
    /// Arguments to surface for the endpoint reached by `field_path` from `start`.
    ///
    /// Every segment before the last contributes its required arguments; the
    /// last segment contributes [`Field::select_args`] with `include_args`.
    /// Keys are the variable names a compiled document declares for them.
    pub fn build_query_args_for_endpoint<S: AsRef<str>, I: AsRef<str>>(
        &self,
        start: &Type,
        field_path: &[S],
        include_args: &[I],
    ) -> Result<Vec<QueryArg>> {
        let mut variables = Variables::default();
        let mut current = start;

        for (i, segment) in field_path.iter().enumerate() {
            let (field, next) = self.step(current, segment.as_ref())?;
            let args = if i + 1 == field_path.len() {
                field.select_args(include_args)
            } else {
                field.required_args().collect()
            };
            for arg in args {
                variables.bind(field, arg, arg.type_ref.signature());
            }
            current = next;
        }

        Ok(variables.into_args())
    }

    /// Required arguments only.
    pub fn query_args<S: AsRef<str>>(
        &self,
        start: &Type,
        field_path: &[S],
    ) -> Result<Vec<QueryArg>> {
        let none: &[&str] = &[];
        self.build_query_args_for_endpoint(start, field_path, none)
    }
}
