//! Schema loader - reads an introspection document into a [`Schema`].
//!
//! Accepts the bare `__schema` object, `{"__schema": …}`, or a full
//! `{"data": {"__schema": …}}` response. Each type is checked against what
//! its kind requires before the name index is built.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::types::{Kind, Schema, Type, TypeRef};
use crate::error::{QuerysmithError, Result};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    query_type: Option<RootName>,
    #[serde(default)]
    mutation_type: Option<RootName>,
    types: Vec<Type>,
}

#[derive(Deserialize)]
struct RootName {
    name: String,
}

impl Schema {
    /// Load a schema from an introspection JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading schema");

        let text =
            fs::read_to_string(path).map_err(|e| QuerysmithError::LoadIo(path.to_path_buf(), e))?;
        Self::from_json(&text)
    }

    /// Parse a schema from introspection JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(text)?;

        if let Some(data) = value.get_mut("data") {
            value = data.take();
        }
        if let Some(inner) = value.get_mut("__schema") {
            value = inner.take();
        }

        let raw: RawSchema = serde_json::from_value(value)?;
        let schema = Self::from_raw(raw)?;

        debug!(
            types = schema.types.len(),
            query = %schema.query_type,
            mutation = schema.mutation_type.as_deref().unwrap_or("-"),
            "schema loaded"
        );

        Ok(schema)
    }

    fn from_raw(raw: RawSchema) -> Result<Self> {
        let query_type = raw
            .query_type
            .map(|r| r.name)
            .ok_or_else(|| QuerysmithError::LoadInvalid("missing queryType".to_string()))?;
        let mutation_type = raw.mutation_type.map(|r| r.name);

        let mut index = HashMap::with_capacity(raw.types.len());
        for (i, t) in raw.types.iter().enumerate() {
            validate_type(t)?;
            if index.insert(t.name.clone(), i).is_some() {
                return Err(QuerysmithError::LoadInvalid(format!(
                    "duplicate type name '{}'",
                    t.name
                )));
            }
        }
        for t in &raw.types {
            check_references(t, &raw.types, &index)?;
        }

        let root_ok = |name: &str| {
            index
                .get(name)
                .map_or(false, |&i| raw.types[i].kind.has_fields())
        };
        if !root_ok(&query_type) {
            return Err(QuerysmithError::LoadInvalid(format!(
                "query type '{}' is not a declared object type",
                query_type
            )));
        }
        if let Some(m) = mutation_type.as_deref() {
            if !root_ok(m) {
                return Err(QuerysmithError::LoadInvalid(format!(
                    "mutation type '{}' is not a declared object type",
                    m
                )));
            }
        }

        Ok(Schema {
            query_type,
            mutation_type,
            types: raw.types,
            index,
        })
    }
}

/// Per-kind shape checks for a top-level type record.
fn validate_type(t: &Type) -> Result<()> {
    let invalid = |msg: &str| {
        Err(QuerysmithError::LoadInvalid(format!(
            "type '{}' ({}): {}",
            t.name, t.kind, msg
        )))
    };

    if t.name.is_empty() {
        return Err(QuerysmithError::LoadInvalid(format!("{} type without a name", t.kind)));
    }

    match t.kind {
        Kind::Object | Kind::Interface if t.fields.is_none() => invalid("missing field list"),
        Kind::InputObject if t.input_fields.is_none() => invalid("missing input field list"),
        Kind::List | Kind::NonNull => invalid("wrapper kinds cannot be declared as named types"),
        Kind::Object
        | Kind::Interface
        | Kind::InputObject
        | Kind::Scalar
        | Kind::Enum
        | Kind::Union => Ok(()),
    }
}

/// Every field, argument and input field of `t` must name a declared type
/// of the same kind.
fn check_references(t: &Type, types: &[Type], index: &HashMap<String, usize>) -> Result<()> {
    let members = t
        .fields()
        .iter()
        .flat_map(|f| {
            std::iter::once((f.name.as_str(), &f.type_ref))
                .chain(f.args.iter().map(|a| (a.name.as_str(), &a.type_ref)))
        })
        .chain(t.input_fields().iter().map(|f| (f.name.as_str(), &f.type_ref)));

    for (member, r) in members {
        let named = named_ref(r, &t.name, member)?;
        let Some(&i) = index.get(&named.name) else {
            return Err(QuerysmithError::LoadInvalid(format!(
                "{}.{}: references undeclared type '{}'",
                t.name, member, named.name
            )));
        };
        if types[i].kind != named.kind {
            return Err(QuerysmithError::LoadInvalid(format!(
                "{}.{}: references '{}' as {} but it is declared {}",
                t.name, member, named.name, named.kind, types[i].kind
            )));
        }
    }

    Ok(())
}

/// The named reference at the bottom of a wrapper chain.
fn named_ref<'a>(r: &'a TypeRef, owner: &str, member: &str) -> Result<&'a TypeRef> {
    let mut current = r;
    while current.kind.is_wrapper() {
        current = current.of_type.as_deref().ok_or_else(|| {
            QuerysmithError::LoadInvalid(format!(
                "{}.{}: {} wrapper without ofType",
                owner, member, current.kind
            ))
        })?;
    }

    if current.name.is_empty() {
        return Err(QuerysmithError::LoadInvalid(format!(
            "{}.{}: {} reference without a name",
            owner, member, current.kind
        )));
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "queryType": {"name": "Query"},
        "mutationType": null,
        "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "version", "args": [], "type": {"kind": "SCALAR", "name": "String", "ofType": null}}
            ]},
            {"kind": "SCALAR", "name": "String", "fields": null}
        ]
    }"#;

    #[test]
    fn test_from_json_bare() {
        let schema = Schema::from_json(MINIMAL).unwrap();
        assert_eq!(schema.query_type_name(), "Query");
        assert_eq!(schema.mutation_type_name(), None);
        assert_eq!(schema.types().len(), 2);
    }

    #[test]
    fn test_from_json_response_envelope() {
        let wrapped = format!(r#"{{"data": {{"__schema": {}}}}}"#, MINIMAL);
        let schema = Schema::from_json(&wrapped).unwrap();
        assert_eq!(schema.types().len(), 2);

        let wrapped = format!(r#"{{"__schema": {}}}"#, MINIMAL);
        assert!(Schema::from_json(&wrapped).is_ok());
    }

    #[test]
    fn test_unknown_kind_is_load_error() {
        let doc = MINIMAL.replace(
            r#""kind": "SCALAR", "name": "String", "fields""#,
            r#""kind": "GADGET", "name": "String", "fields""#,
        );
        let err = Schema::from_json(&doc).unwrap_err();
        assert!(matches!(err, QuerysmithError::LoadParse(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_kind_is_load_error() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [{"name": "Query", "fields": []}]}"#;
        assert!(matches!(Schema::from_json(doc), Err(QuerysmithError::LoadParse(_))));
    }

    #[test]
    fn test_object_without_fields_rejected() {
        let doc =
            r#"{"queryType": {"name": "Query"}, "types": [{"kind": "OBJECT", "name": "Query"}]}"#;
        assert!(matches!(Schema::from_json(doc), Err(QuerysmithError::LoadInvalid(_))));
    }

    #[test]
    fn test_wrapper_without_of_type_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "x", "args": [], "type": {"kind": "NON_NULL", "name": null, "ofType": null}}
            ]}
        ]}"#;
        assert!(matches!(Schema::from_json(doc), Err(QuerysmithError::LoadInvalid(_))));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": []},
            {"kind": "SCALAR", "name": "Query"}
        ]}"#;
        assert!(matches!(Schema::from_json(doc), Err(QuerysmithError::LoadInvalid(_))));
    }

    #[test]
    fn test_unknown_root_rejected() {
        let doc = r#"{"queryType": {"name": "Nope"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": []}
        ]}"#;
        assert!(matches!(Schema::from_json(doc), Err(QuerysmithError::LoadInvalid(_))));
    }

    fn assert_invalid(doc: &str, needle: &str) {
        match Schema::from_json(doc) {
            Err(QuerysmithError::LoadInvalid(msg)) => assert!(msg.contains(needle), "{}", msg),
            other => panic!("expected LoadInvalid, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_undeclared_field_type_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "thing", "args": [], "type": {"kind": "OBJECT", "name": "Ghost"}},
                {"name": "holder", "args": [], "type": {"kind": "OBJECT", "name": "Holder"}}
            ]},
            {"kind": "OBJECT", "name": "Holder", "fields": [
                {"name": "ghost", "args": [], "type": {"kind": "OBJECT", "name": "Ghost"}},
                {"name": "n", "args": [], "type": {"kind": "SCALAR", "name": "Int"}}
            ]},
            {"kind": "SCALAR", "name": "Int"}
        ]}"#;
        assert_invalid(doc, "Query.thing: references undeclared type 'Ghost'");
    }

    #[test]
    fn test_undeclared_argument_type_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "n", "type": {"kind": "SCALAR", "name": "Int"}, "args": [
                    {"name": "filter", "type": {"kind": "NON_NULL", "ofType":
                        {"kind": "INPUT_OBJECT", "name": "Filter"}}}
                ]}
            ]},
            {"kind": "SCALAR", "name": "Int"}
        ]}"#;
        assert_invalid(doc, "Query.filter: references undeclared type 'Filter'");
    }

    #[test]
    fn test_undeclared_input_field_type_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": []},
            {"kind": "INPUT_OBJECT", "name": "Filter", "inputFields": [
                {"name": "tags", "type": {"kind": "LIST", "ofType": {"kind": "SCALAR", "name": "Tag"}}}
            ]}
        ]}"#;
        assert_invalid(doc, "Filter.tags: references undeclared type 'Tag'");
    }

    #[test]
    fn test_reference_kind_mismatch_rejected() {
        let doc = r#"{"queryType": {"name": "Query"}, "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "holder", "args": [], "type": {"kind": "SCALAR", "name": "Holder"}}
            ]},
            {"kind": "OBJECT", "name": "Holder", "fields": [
                {"name": "n", "args": [], "type": {"kind": "SCALAR", "name": "Int"}}
            ]},
            {"kind": "SCALAR", "name": "Int"}
        ]}"#;
        assert_invalid(doc, "references 'Holder' as SCALAR but it is declared OBJECT");
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let schema = Schema::load(file.path()).unwrap();
        assert_eq!(schema.query_type_name(), "Query");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Schema::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, QuerysmithError::LoadIo(..)));
    }

    #[test]
    fn test_load_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = Schema::load(file.path()).unwrap_err();
        assert!(matches!(err, QuerysmithError::LoadParse(_)));
    }
}
