//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use constexprify_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for running an analysis
//! without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::ast::{
    load_translation_unit, FunctionDecl, SourceLoc, Standard, TranslationUnit, VarDecl,
};
pub use crate::error::{ConstexprifyError, ConstexprifyResult};

// Diagnostics
pub use crate::diagnostics::{Diagnostic, DiagnosticsEngine, FixItHint, Severity};

// Semantic seam
pub use crate::semantics::{ModelSemantics, Semantics};

// Builder API
pub use crate::builder::{AnalysisResult, Constexprify};

// Configuration
pub use crate::config::{load_config, ConstexprifyConfig};

// Fix functionality
#[cfg(feature = "fix")]
pub use crate::rewrite::{apply_fix_its, fix_primary_file, FixResult};
