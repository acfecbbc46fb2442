//! Query compiler - synthesizes query and mutation documents.
//!
//! Output is tab-indented and byte-stable for identical inputs; generated
//! source embeds it verbatim. Shape of an endpoint query:
//!
//! ```text
//! query(
//! 	$guids: [EntityGuid]!,
//! ) { actor { entities(
//! 	guids: $guids,
//! ) {
//! 	guid
//! 	tags {
//! 		key
//! 	}
//! } } }
//! ```
//!
//! Object fields are expanded while depth remains and never twice along
//! the same branch, so cyclic schemas terminate for any depth.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::args::{QueryArg, Variables};
use super::types::{Field, InputValue, Schema, Type};
use crate::error::{QuerysmithError, Result};

const INDENT: char = '\t';

/// An argument passed in a call: `arg: $variable`.
struct Binding<'a> {
    arg: &'a str,
    variable: String,
}

impl Schema {
    /// Compile the query selecting `target_field` at the end of `field_path`.
    ///
    /// `type_path` is the output of [`Schema::lookup_query_types_by_field_path`]
    /// for the same `field_path`. Path segments pass their required
    /// arguments; the target passes [`Field::select_args`] with `include_args`.
    pub fn get_query_string_for_endpoint<S: AsRef<str>, I: AsRef<str>>(
        &self,
        type_path: &[&Type],
        field_path: &[S],
        target_field: &str,
        depth: usize,
        include_args: &[I],
    ) -> Result<String> {
        if type_path.len() != field_path.len() {
            return Err(QuerysmithError::InvalidPath {
                type_name: type_path.last().map(|t| t.name.clone()).unwrap_or_default(),
                segment: target_field.to_string(),
            });
        }

        let mut variables = Variables::default();
        let mut opening = String::new();

        let mut parent = self.query_type()?;
        for (segment, next) in field_path.iter().zip(type_path) {
            let field = field_on(parent, segment.as_ref())?;
            let args: Vec<&InputValue> = field.required_args().collect();
            let bindings = bind(&mut variables, field, &args, None);

            opening.push_str(&field.name);
            opening.push_str(&call_arguments(&bindings));
            opening.push_str(" { ");
            parent = *next;
        }

        let target = field_on(parent, target_field)?;
        let target_args = target.select_args(include_args);
        let bindings = bind(&mut variables, target, &target_args, None);

        let mut doc = String::from("query");
        doc.push_str(&variable_block(variables.declared()));
        doc.push_str(" { ");
        doc.push_str(&opening);
        self.write_target(&mut doc, target, &bindings, depth)?;
        for _ in field_path {
            doc.push_str(" }");
        }
        doc.push_str(" }");

        debug!(endpoint = target_field, depth, bytes = doc.len(), "compiled query");
        Ok(doc)
    }

    /// Compile a mutation document for a field of the mutation root.
    ///
    /// Declares [`Field::select_mutation_args`]; an override replaces the
    /// schema signature of the argument it names.
    pub fn get_query_string_for_mutation(
        &self,
        mutation: &Field,
        depth: usize,
        overrides: &HashMap<String, String>,
    ) -> Result<String> {
        let args = mutation.select_mutation_args(overrides);

        let mut variables = Variables::default();
        let bindings = bind(&mut variables, mutation, &args, Some(overrides));

        let mut doc = String::from("mutation");
        doc.push_str(&variable_block(variables.declared()));
        doc.push_str(" { ");
        self.write_target(&mut doc, mutation, &bindings, depth)?;
        doc.push_str(" }");

        debug!(mutation = %mutation.name, depth, bytes = doc.len(), "compiled mutation");
        Ok(doc)
    }

    /// The target field, its call arguments and, for non-leaf types, its
    /// selection set.
    fn write_target(
        &self,
        out: &mut String,
        target: &Field,
        bindings: &[Binding<'_>],
        depth: usize,
    ) -> Result<()> {
        out.push_str(&target.name);
        out.push_str(&call_arguments(bindings));

        let target_type = self.resolve_ref(&target.type_ref)?;
        if target_type.kind.is_leaf() {
            return Ok(());
        }

        let mut guard = HashSet::new();
        guard.insert(target_type.name.as_str());

        let mut body = String::new();
        self.write_selection(target_type, depth, 1, &mut guard, &mut body)?;
        if body.is_empty() {
            // keep the document valid when nothing is selectable
            body.push(INDENT);
            body.push_str("__typename\n");
        }

        out.push_str(" {\n");
        out.push_str(&body);
        out.push('}');
        Ok(())
    }

    /// Append the selection of `ty` at nesting `level`.
    ///
    /// `guard` holds the type names expanded along the current branch.
    fn write_selection<'a>(
        &'a self,
        ty: &'a Type,
        depth: usize,
        level: usize,
        guard: &mut HashSet<&'a str>,
        out: &mut String,
    ) -> Result<()> {
        for field in ty.fields() {
            // no variables exist for nested required arguments
            if field.has_required_args() {
                continue;
            }

            let unwrapped = field.type_ref.unwrap_type();
            if unwrapped.kind.is_leaf() {
                indent(out, level);
                out.push_str(&field.name);
                out.push('\n');
                continue;
            }

            if depth == 0 || guard.contains(unwrapped.name) {
                continue;
            }

            let nested = self.lookup_type_by_name(unwrapped.name)?;
            guard.insert(nested.name.as_str());
            let mut sub = String::new();
            let res = self.write_selection(nested, depth - 1, level + 1, guard, &mut sub);
            guard.remove(nested.name.as_str());
            res?;

            if sub.is_empty() {
                continue;
            }

            indent(out, level);
            out.push_str(&field.name);
            out.push_str(" {\n");
            out.push_str(&sub);
            indent(out, level);
            out.push_str("}\n");
        }

        Ok(())
    }
}

fn field_on<'a>(ty: &'a Type, name: &str) -> Result<&'a Field> {
    ty.field(name).ok_or_else(|| QuerysmithError::FieldNotFound {
        type_name: ty.name.clone(),
        field: name.to_string(),
    })
}

/// Declare variables for `args` and pair each argument with its variable.
fn bind<'a>(
    variables: &mut Variables,
    field: &Field,
    args: &[&'a InputValue],
    overrides: Option<&HashMap<String, String>>,
) -> Vec<Binding<'a>> {
    args.iter()
        .map(|&arg| {
            let signature = overrides
                .and_then(|o| o.get(&arg.name))
                .cloned()
                .unwrap_or_else(|| arg.type_ref.signature());
            Binding {
                arg: &arg.name,
                variable: variables.bind(field, arg, signature),
            }
        })
        .collect()
}

fn variable_block(variables: &[QueryArg]) -> String {
    if variables.is_empty() {
        return String::new();
    }

    let mut s = String::from("(\n");
    for v in variables {
        s.push(INDENT);
        s.push_str(&format!("${}: {},\n", v.key, v.value));
    }
    s.push(')');
    s
}

fn call_arguments(bindings: &[Binding<'_>]) -> String {
    if bindings.is_empty() {
        return String::new();
    }

    let mut s = String::from("(\n");
    for b in bindings {
        s.push(INDENT);
        s.push_str(&format!("{}: ${},\n", b.arg, b.variable));
    }
    s.push(')');
    s
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push(INDENT);
    }
}
