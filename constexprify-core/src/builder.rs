//! Builder API for running a constexpr-eligibility analysis.
//!
//! Provides a fluent interface for configuring and running both passes:
//!
//! ```rust,ignore
//! use constexprify_core::prelude::*;
//!
//! let result = Constexprify::new()
//!     .with_standard(Standard::Cxx14)
//!     .ignore_functions(["legacy_init"])
//!     .run(&mut tu);
//!
//! for diag in &result.diagnostics {
//!     println!("{}: {}", tu.display_loc(diag.loc), diag.message);
//! }
//! ```
//!
//! The two passes always run in the same order: functions first (which may
//! mark declarations constexpr in the arena), then variables (which reads
//! those flags to skip upgraded functions). Reordering is not exposed
//! because it would change the results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ast::{Standard, TranslationUnit};
use crate::diagnostics::{Diagnostic, DiagnosticsEngine, FixItHint, Severity};
use crate::passes::{run_function_pass, run_variable_pass};
use crate::semantics::{ModelSemantics, Semantics};

/// Builder for configuring an analysis run.
#[derive(Debug, Clone, Default)]
pub struct Constexprify {
    /// Override the unit's recorded language standard, if set.
    standard: Option<Standard>,

    /// Function names to leave alone.
    ignored: HashSet<String>,
}

impl Constexprify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze under the given language standard instead of the one recorded
    /// on the unit.
    pub fn with_standard(mut self, standard: Standard) -> Self {
        self.standard = Some(standard);
        self
    }

    /// Never suggest constexpr for the named functions.
    pub fn ignore_functions(
        mut self,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.ignored.extend(names.into_iter().map(Into::into));
        self
    }

    /// Run both passes with the table-driven default semantics.
    pub fn run(&self, tu: &mut TranslationUnit) -> AnalysisResult {
        self.run_with_semantics(tu, &ModelSemantics::new())
    }

    /// Run both passes with a caller-provided semantic model.
    pub fn run_with_semantics<S: Semantics>(
        &self,
        tu: &mut TranslationUnit,
        sema: &S,
    ) -> AnalysisResult {
        if let Some(standard) = self.standard {
            tu.standard = standard;
        }

        let diags = DiagnosticsEngine::new();
        let functions_upgraded = run_function_pass(tu, sema, &diags, &self.ignored);
        let variables_suggested = run_variable_pass(tu, sema, &diags);

        AnalysisResult {
            functions_upgraded,
            variables_suggested,
            diagnostics: diags.take(),
        }
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Functions newly marked constexpr.
    pub functions_upgraded: usize,
    /// Local variables suggested for constexpr.
    pub variables_suggested: usize,
    /// All emitted diagnostics, in emission order (functions before their
    /// own locals; declaration order otherwise).
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    /// Total positive findings.
    pub fn suggestions(&self) -> usize {
        self.functions_upgraded + self.variables_suggested
    }

    /// Warning-severity diagnostics only (the actionable findings).
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// All fix-it hints, in emission order.
    pub fn fix_its(&self) -> Vec<&FixItHint> {
        self.diagnostics
            .iter()
            .filter_map(|d| d.fix_it.as_ref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        Body, FileId, FunctionDecl, Initializer, LocalDecl, LocalDeclKind, SourceLoc, Stmt,
        StmtKind, TypeInfo, VarDecl,
    };

    fn loc(line: u32) -> SourceLoc {
        SourceLoc::new(FileId(0), line * 10, line, 1)
    }

    /// One trivially eligible function plus one function whose body mixes a
    /// constant local with runtime statements.
    fn sample_unit() -> TranslationUnit {
        let mut tu = TranslationUnit::new("main.cpp");
        let int_ty = tu.add_type(TypeInfo::literal("int"));

        let mut square = FunctionDecl::new("square", loc(1), int_ty);
        square.body = Some(Body {
            stmts: vec![Stmt::new(loc(2), StmtKind::Return)],
        });
        tu.add_function(square);

        let n = tu.add_local(LocalDecl::new(
            loc(6),
            LocalDeclKind::Var(VarDecl::new("n", int_ty).with_init(Initializer::constant(25))),
        ));
        let mut compute = FunctionDecl::new("compute", loc(5), int_ty);
        compute.body = Some(Body {
            stmts: vec![
                Stmt::new(loc(6), StmtKind::Decl { decls: vec![n] }),
                Stmt::new(loc(7), StmtKind::Expr),
                Stmt::new(loc(8), StmtKind::Return),
            ],
        });
        tu.add_function(compute);

        tu
    }

    #[test]
    fn test_upgraded_function_swallows_its_variable_suggestion() {
        let mut tu = sample_unit();
        // Under C++14 both functions upgrade, so the constant local in
        // `compute` must not be suggested afterwards.
        let result = Constexprify::new().run(&mut tu);
        assert_eq!(result.functions_upgraded, 2);
        assert_eq!(result.variables_suggested, 0);
    }

    #[test]
    fn test_variable_suggested_when_function_stays_runtime() {
        let mut tu = sample_unit();
        // Under C++11 the multi-statement body of `compute` is rejected, so
        // the constant local inside it is suggested instead.
        let result = Constexprify::new().with_standard(Standard::Cxx11).run(&mut tu);

        assert_eq!(result.functions_upgraded, 1);
        assert_eq!(result.variables_suggested, 1);
        assert_eq!(result.suggestions(), 2);

        let messages: Vec<_> = result.warnings().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["function can be constexpr", "variable can be constexpr"]
        );
    }

    #[test]
    fn test_ignore_list_suppresses_function() {
        let mut tu = sample_unit();
        let result = Constexprify::new()
            .ignore_functions(["square", "compute"])
            .run(&mut tu);
        assert_eq!(result.functions_upgraded, 0);
    }

    #[test]
    fn test_fix_its_collects_insertions() {
        let mut tu = sample_unit();
        let result = Constexprify::new().run(&mut tu);
        let fixes = result.fix_its();
        assert_eq!(fixes.len(), 2);
        assert!(fixes.iter().all(|f| f.insertion == "constexpr "));
    }

    #[test]
    fn test_emission_order_functions_before_variables() {
        let mut tu = sample_unit();
        let result = Constexprify::new().with_standard(Standard::Cxx11).run(&mut tu);
        let warnings: Vec<_> = result.warnings().collect();
        assert_eq!(warnings[0].loc, loc(1));
        assert_eq!(warnings[1].loc, loc(6));
    }
}
