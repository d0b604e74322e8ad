//! constexprify-core: constexpr eligibility analysis for parsed C++ units
//!
//! This library takes a parsed, semantically-resolved translation unit and
//! finds functions and local variables that satisfy the language rules for
//! `constexpr` but are not declared so, emitting a warning plus an in-place
//! `constexpr ` insertion fix-it for each.
//!
//! # Features
//!
//! - **Function suggestions**: declaration rules, whole-body rules, the
//!   per-declaration body policy, and parameter literalness all checked
//!   under a speculative (diagnostic-suppressed) probe
//! - **Variable suggestions**: constant-initializer locals in functions
//!   that stay runtime
//! - **Two-pass ordering**: functions upgrade first; their locals are then
//!   skipped by construction
//! - **Fix-it application**: apply accumulated insertions to the primary
//!   source file, with dry-run support
//! - **Pluggable semantics**: every language-legality question goes through
//!   the [`Semantics`](semantics::Semantics) trait; a table-driven model
//!   ships in the box
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use constexprify_core::prelude::*;
//!
//! let mut tu = load_translation_unit(Path::new("unit.json"))?;
//! let result = Constexprify::new().run(&mut tu);
//!
//! for diag in result.warnings() {
//!     println!("{}: {}", tu.display_loc(diag.loc), diag.message);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`ast`]: arena translation-unit model with stable ids
//! - [`diagnostics`]: diagnostic records, fix-its, scoped suppression
//! - [`semantics`]: the semantic-query seam and its table-driven default
//! - [`check`]: body-declaration and parameter-type legality checkers
//! - [`passes`]: the function and variable eligibility passes
//! - [`builder`]: fluent analysis API
//! - [`rewrite`]: fix-it application (feature `fix`)
//! - [`report`]: plain and JSON output
//! - [`config`]: constexprify.toml loading
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `fix` (default): Enable fix-it application to source files

// Core modules (always available)
pub mod ast;
pub mod builder;
pub mod check;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod passes;
pub mod prelude;
pub mod report;
pub mod semantics;

// Feature-gated modules
#[cfg(feature = "fix")]
pub mod rewrite;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ConstexprifyError, ConstexprifyResult, IoResultExt};

// Data model
pub use ast::{
    load_translation_unit, Body, FileId, FuncId, FunctionDecl, Initializer, LocalDecl,
    LocalDeclKind, LocalId, ParamDecl, SourceFile, SourceLoc, SourceRange, Standard, Stmt,
    StmtKind, StorageDuration, TranslationUnit, TypeId, TypeInfo, VarDecl,
};

// Diagnostics
pub use diagnostics::{Diagnostic, DiagnosticsEngine, FixItHint, Severity, SuppressionGuard};

// Semantic seam
pub use semantics::{Ineligible, LiteralContext, ModelSemantics, RuleCheck, Semantics};

// Checkers
pub use check::{check_body_declarations, check_parameter_types, BodyCheckReport};

// Passes
pub use passes::{run_function_pass, run_variable_pass};

// Builder API
pub use builder::{AnalysisResult, Constexprify};

// Configuration
pub use config::{load_config, ConstexprifyConfig, OutputConfig};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{print_json, print_plain};

// Feature-gated re-exports
#[cfg(feature = "fix")]
pub use rewrite::{apply_fix_its, fix_primary_file, FixResult};
