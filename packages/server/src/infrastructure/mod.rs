//! Infrastructure layer: concrete registry and transport implementations.

pub mod registry;
pub mod transport;
