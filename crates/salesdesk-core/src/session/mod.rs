//! Session persistence abstraction.
//!
//! The infrastructure layer provides the durable implementation
//! (a whole-file JSON store); this module only defines the port.

pub mod store;
