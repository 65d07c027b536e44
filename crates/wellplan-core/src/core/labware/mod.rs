//! Container-type registry.
//!
//! Built-in plate and tube types are compiled in as a static table; additional or overriding
//! types can be loaded from a TOML file and merged on top. The registry is immutable once built.

mod builtin;
pub mod registry;
