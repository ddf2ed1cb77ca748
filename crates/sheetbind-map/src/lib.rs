#![deny(unsafe_code)]

//! Column matching for sheet bindings.
//!
//! Header names and binding column names are compared after stripping every
//! character that is not an ASCII letter or digit, ignoring case.

pub mod normalize;
pub mod resolver;

pub use normalize::{equals_normalized, normalize};
pub use resolver::{ColumnResolution, resolve};
