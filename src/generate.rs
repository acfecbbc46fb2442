//! Batch generation - compiles every configured endpoint and mutation.
//!
//! The schema is read-only, so documents are compiled in parallel over a
//! shared reference. Output order follows the configuration.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::config::{Config, EndpointConfig, MutationConfig, PackageConfig, QueryConfig};
use crate::error::Result;
use crate::schema::{InputValue, QueryArg, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Query,
    Mutation,
}

/// One compiled document plus the projections an emitter needs around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub document: String,
    pub args: Vec<QueryArg>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Vec<InputValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageOutput {
    pub name: String,
    pub path: String,
    pub documents: Vec<CompiledDocument>,
}

enum Job<'a> {
    Endpoint(&'a QueryConfig, &'a EndpointConfig),
    Mutation(&'a MutationConfig),
}

/// Compile all documents named by `config`. The first failure aborts.
pub fn generate(schema: &Schema, config: &Config) -> Result<Vec<PackageOutput>> {
    let out = config
        .packages
        .iter()
        .map(|pkg| generate_package(schema, pkg))
        .collect::<Result<Vec<_>>>()?;

    let total: usize = out.iter().map(|p| p.documents.len()).sum();
    info!(packages = out.len(), documents = total, "generation complete");
    Ok(out)
}

fn generate_package(schema: &Schema, pkg: &PackageConfig) -> Result<PackageOutput> {
    let jobs: Vec<Job<'_>> = pkg
        .queries
        .iter()
        .flat_map(|q| q.endpoints.iter().map(move |e| Job::Endpoint(q, e)))
        .chain(pkg.mutations.iter().map(Job::Mutation))
        .collect();

    let documents = jobs
        .par_iter()
        .map(|job| match job {
            Job::Endpoint(q, e) => compile_endpoint(schema, q, e),
            Job::Mutation(m) => compile_mutation(schema, m),
        })
        .collect::<Result<Vec<_>>>()?;

    info!(package = %pkg.name, documents = documents.len(), "package compiled");
    Ok(PackageOutput {
        name: pkg.name.clone(),
        path: pkg.path.clone(),
        documents,
    })
}

fn compile_endpoint(
    schema: &Schema,
    query: &QueryConfig,
    endpoint: &EndpointConfig,
) -> Result<CompiledDocument> {
    let type_path = schema.lookup_query_types_by_field_path(query.path.as_slice())?;
    let document = schema.get_query_string_for_endpoint(
        &type_path,
        query.path.as_slice(),
        &endpoint.name,
        endpoint.max_query_field_depth,
        endpoint.include_arguments.as_slice(),
    )?;

    let mut full_path = query.path.clone();
    full_path.push(endpoint.name.clone());
    let args = schema.build_query_args_for_endpoint(
        schema.query_type()?,
        full_path.as_slice(),
        endpoint.include_arguments.as_slice(),
    )?;
    let inputs = schema.get_input_fields_for_query_path(full_path.as_slice())?;

    Ok(CompiledDocument {
        name: endpoint.name.clone(),
        kind: DocumentKind::Query,
        document,
        args,
        inputs,
    })
}

fn compile_mutation(schema: &Schema, mutation: &MutationConfig) -> Result<CompiledDocument> {
    let field = schema.lookup_mutation_by_name(&mutation.name)?;
    let document = schema.get_query_string_for_mutation(
        field,
        mutation.max_query_field_depth,
        &mutation.argument_type_overrides,
    )?;

    let args = field.mutation_query_args(&mutation.argument_type_overrides);

    Ok(CompiledDocument {
        name: mutation.name.clone(),
        kind: DocumentKind::Mutation,
        document,
        args,
        inputs: BTreeMap::new(),
    })
}
