//! Entity structs for the schema engine.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema`. Field
//! names are camelCase on the wire to match what downstream query and
//! formatting tools consume.

mod connection;
mod schema;

pub use connection::ConnectionDescriptor;
pub use schema::{ApplicationSchema, FieldDescriptor, SchemaKey};
