//! Input field projection - the arguments a caller must supply along a
//! query path before the compiled query can be issued.

use std::collections::BTreeMap;

use super::types::{InputValue, Schema};
use crate::error::Result;

impl Schema {
    /// For each segment of `query_path` whose field declares required
    /// arguments, map the field name to those arguments in declared order.
    pub fn get_input_fields_for_query_path<S: AsRef<str>>(
        &self,
        query_path: &[S],
    ) -> Result<BTreeMap<String, Vec<InputValue>>> {
        let mut current = self.query_type()?;
        let mut result = BTreeMap::new();

        for segment in query_path {
            let (field, next) = self.step(current, segment.as_ref())?;
            let required: Vec<InputValue> = field.required_args().cloned().collect();
            if !required.is_empty() {
                result.insert(field.name.clone(), required);
            }
            current = next;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuerysmithError;

    const DOC: &str = r#"{
        "queryType": {"name": "Query"},
        "types": [
            {"kind": "OBJECT", "name": "Query", "fields": [
                {"name": "org", "type": {"kind": "OBJECT", "name": "Org"}, "args": [
                    {"name": "slug", "type": {"kind": "NON_NULL", "ofType": {"kind": "SCALAR", "name": "String"}}},
                    {"name": "verbose", "type": {"kind": "SCALAR", "name": "Boolean"}}
                ]}
            ]},
            {"kind": "OBJECT", "name": "Org", "fields": [
                {"name": "team", "type": {"kind": "OBJECT", "name": "Team"}, "args": [
                    {"name": "id", "type": {"kind": "NON_NULL", "ofType": {"kind": "SCALAR", "name": "Int"}}},
                    {"name": "kind", "type": {"kind": "NON_NULL", "ofType": {"kind": "ENUM", "name": "TeamKind"}}}
                ]},
                {"name": "settings", "type": {"kind": "OBJECT", "name": "Team"}}
            ]},
            {"kind": "OBJECT", "name": "Team", "fields": [
                {"name": "name", "type": {"kind": "SCALAR", "name": "String"}}
            ]},
            {"kind": "ENUM", "name": "TeamKind"},
            {"kind": "SCALAR", "name": "String"},
            {"kind": "SCALAR", "name": "Int"},
            {"kind": "SCALAR", "name": "Boolean"}
        ]
    }"#;

    #[test]
    fn test_required_inputs_per_segment() {
        let s = Schema::from_json(DOC).unwrap();
        let inputs = s.get_input_fields_for_query_path(&["org", "team", "name"]).unwrap();
        assert_eq!(inputs.len(), 2);

        let org: Vec<&str> = inputs["org"].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(org, vec!["slug"]);
        let team: Vec<&str> = inputs["team"].iter().map(|i| i.name.as_str()).collect();
        assert_eq!(team, vec!["id", "kind"]);
    }

    #[test]
    fn test_segments_without_required_args_are_absent() {
        let s = Schema::from_json(DOC).unwrap();
        let inputs = s.get_input_fields_for_query_path(&["org", "settings"]).unwrap();
        assert_eq!(inputs.keys().collect::<Vec<_>>(), vec!["org"]);
    }

    #[test]
    fn test_bad_path_errors() {
        let s = Schema::from_json(DOC).unwrap();
        assert!(matches!(
            s.get_input_fields_for_query_path(&["org", "nope"]),
            Err(QuerysmithError::FieldNotFound { .. })
        ));
    }
}
