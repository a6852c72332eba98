//! Object model for compared graphs.
//!
//! Instances are nodes with a schema class and named attributes. The schema
//! describes, per class, which attributes exist, whether they hold scalars or
//! references to other instances, and whether they are single or
//! multi-valued.

mod instance;
mod schema;
mod value;

pub use instance::*;
pub use schema::*;
pub use value::*;
