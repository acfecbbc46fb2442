//! Type graph model - the in-memory form of an introspection schema.
//!
//! Everything here is built once by the loader and only read afterwards.
//! Field and argument types are kept as [`TypeRef`] wrapper chains; named
//! types are looked up through the schema's name index.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Introspection `__TypeKind`. Unknown discriminants fail deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl Kind {
    /// LIST and NON_NULL wrap another type instead of naming one.
    pub fn is_wrapper(self) -> bool {
        matches!(self, Kind::List | Kind::NonNull)
    }

    /// Kinds that carry fields and need a selection set.
    pub fn has_fields(self) -> bool {
        matches!(self, Kind::Object | Kind::Interface)
    }

    /// Kinds selectable without a sub-selection.
    pub fn is_leaf(self) -> bool {
        matches!(self, Kind::Scalar | Kind::Enum)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Scalar => "SCALAR",
            Kind::Object => "OBJECT",
            Kind::Interface => "INTERFACE",
            Kind::Union => "UNION",
            Kind::Enum => "ENUM",
            Kind::InputObject => "INPUT_OBJECT",
            Kind::List => "LIST",
            Kind::NonNull => "NON_NULL",
        };
        write!(f, "{}", s)
    }
}

/// A loaded schema. Owns every named type.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) query_type: String,
    pub(crate) mutation_type: Option<String>,
    pub(crate) types: Vec<Type>,
    /// name -> position in `types`
    pub(crate) index: HashMap<String, usize>,
}

impl Schema {
    /// Name of the root query type.
    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    /// Name of the root mutation type, if the schema has one.
    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// All named types in document order.
    pub fn types(&self) -> &[Type] {
        &self.types
    }
}

/// A named type record from the `types` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub kind: Kind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) input_fields: Option<Vec<InputValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<Box<TypeRef>>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub possible_types: Vec<TypeRef>,
}

impl Type {
    /// Declared fields (object and interface kinds only).
    pub fn fields(&self) -> &[Field] {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Declared members (input object kind only).
    pub fn input_fields(&self) -> &[InputValue] {
        self.input_fields.as_deref().unwrap_or_default()
    }

    /// Field by name, `None` for kinds without fields.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Input field by name (input object kind only).
    pub fn input_field(&self, name: &str) -> Option<&InputValue> {
        self.input_fields().iter().find(|f| f.name == name)
    }
}

/// A field on an object or interface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub args: Vec<InputValue>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

impl Field {
    /// Arguments whose outermost wrapper is NON_NULL, in declared order.
    pub fn required_args(&self) -> impl Iterator<Item = &InputValue> {
        self.args.iter().filter(|a| a.is_required())
    }

    pub fn has_required_args(&self) -> bool {
        self.args.iter().any(InputValue::is_required)
    }
}

/// A field argument or an input object member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl InputValue {
    pub fn is_required(&self) -> bool {
        self.type_ref.kind == Kind::NonNull
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_reason: Option<String>,
}

/// A type reference as it appears on fields and arguments: either a named
/// type or a LIST/NON_NULL wrapper around another reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: Kind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub of_type: Option<Box<TypeRef>>,
}

/// The named type at the bottom of a wrapper chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwrapped<'a> {
    pub name: &'a str,
    pub kind: Kind,
    /// A LIST wrapper appeared somewhere in the chain.
    pub is_list: bool,
    /// A NON_NULL wrapper appeared somewhere in the chain.
    pub is_non_null: bool,
}

impl TypeRef {
    /// Follow `of_type` through LIST/NON_NULL wrappers to the named type.
    pub fn unwrap_type(&self) -> Unwrapped<'_> {
        let mut current = self;
        let mut is_list = false;
        let mut is_non_null = false;

        while current.kind.is_wrapper() {
            match current.kind {
                Kind::List => is_list = true,
                Kind::NonNull => is_non_null = true,
                _ => {}
            }
            match current.of_type.as_deref() {
                Some(inner) => current = inner,
                None => break,
            }
        }

        Unwrapped {
            name: &current.name,
            kind: current.kind,
            is_list,
            is_non_null,
        }
    }
}

/// Introspection emits `null` for absent names and lists; treat it as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
