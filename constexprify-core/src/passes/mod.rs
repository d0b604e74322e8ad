//! The two eligibility passes.
//!
//! [`functions`] runs first and may mark functions constexpr; [`variables`]
//! runs second and skips any function whose flag is set by then. The order
//! is a correctness requirement: reversing it would produce spurious
//! variable suggestions inside functions the first pass upgrades.

pub mod functions;
pub mod variables;

pub use functions::run_function_pass;
pub use variables::run_variable_pass;
