//! Schema graph model and the algorithms built on it.
//!
//! Split into:
//! - `types` - Schema, Type, Field, InputValue, TypeRef
//! - `loader` - introspection JSON parsing and validation
//! - `resolve` - type and field path lookups
//! - `args` - argument selection and signature rendering
//! - `compile` - query and mutation document synthesis
//! - `inputs` - required inputs along a query path

pub mod args;
pub mod compile;
pub mod inputs;
pub mod loader;
pub mod resolve;
pub mod types;

pub use args::QueryArg;
pub use types::{EnumValue, Field, InputValue, Kind, Schema, Type, TypeRef, Unwrapped};
