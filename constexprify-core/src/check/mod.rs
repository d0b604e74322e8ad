//! Legality checkers for constexpr-candidate functions.
//!
//! - [`body`]: per-declaration policy over the declarations a function body
//!   introduces directly.
//! - [`params`]: literalness of every parameter type.
//!
//! Both report failure reasons through the diagnostics engine (suppressed
//! while probing) and signal ineligibility through their return value.

pub mod body;
pub mod params;

pub use body::{check_body_declarations, BodyCheckReport};
pub use params::check_parameter_types;
