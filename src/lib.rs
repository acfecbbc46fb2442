//! # Querysmith
//!
//! Compiles GraphQL query and mutation documents from an introspection
//! schema, for code generators that embed the documents verbatim.
//!
//! The schema is loaded once and never mutated. Everything else is a pure
//! read over it:
//!
//! - **Path resolution**: follow field names from the query root
//! - **Argument extraction**: required-only or explicitly included arguments
//! - **Query compilation**: depth-bounded, cycle-guarded selection sets
//! - **Input projection**: required arguments along a query path
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use querysmith::Schema;
//! use std::path::Path;
//!
//! let schema = Schema::load(Path::new("schema.json"))?;
//! let path = ["actor", "account"];
//! let types = schema.lookup_query_types_by_field_path(&path)?;
//! let query = schema.get_query_string_for_endpoint(&types, &path, "nrql", 2, &["query"])?;
//! println!("{}", query);
//! # Ok::<(), querysmith::QuerysmithError>(())
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod schema;

// Re-exports for convenience
pub use config::Config;
pub use error::{QuerysmithError, Result};
pub use generate::{generate, CompiledDocument, DocumentKind, PackageOutput};
pub use schema::{Field, InputValue, Kind, QueryArg, Schema, Type, TypeRef};
