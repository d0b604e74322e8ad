//! Semantic-query seam between the eligibility passes and a front end.
//!
//! The passes never inspect expressions or resolve types themselves; every
//! language-legality question goes through [`Semantics`]. The shipped
//! [`ModelSemantics`] answers each query from facts recorded on the
//! translation unit (type table flags, initializer facts), which keeps the
//! crate self-contained for the CLI and for tests. A real front end plugs in
//! behind the same trait.
//!
//! Check failures are expected outcomes, not errors: each check reports its
//! reason through the [`DiagnosticsEngine`] (which is suppressed during
//! speculative probes) and returns [`Ineligible`].

use crate::ast::{FuncId, SourceLoc, SourceRange, Standard, StmtKind, TranslationUnit, TypeId, VarDecl};
use crate::diagnostics::DiagnosticsEngine;

/// Marker for a failed legality check. The reason has already been reported
/// through the diagnostics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ineligible;

/// Outcome of a legality check.
pub type RuleCheck = Result<(), Ineligible>;

/// Position a literal-type requirement applies to, for diagnostic wording.
#[derive(Debug, Clone, Copy)]
pub enum LiteralContext {
    /// A function parameter; `index` is 1-based.
    Parameter { index: usize, range: SourceRange },
    /// A local variable definition inside a constexpr-candidate body.
    LocalVariable,
}

/// Language-legality queries the eligibility passes depend on.
///
/// Implementations may cache internally (e.g. memoize a constant evaluation)
/// as long as repeated queries stay idempotent; the passes call each check at
/// most once per declaration per run.
pub trait Semantics {
    /// Whether `ty` is eligible for constant-expression evaluation.
    fn is_literal_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool;

    /// Whether `ty` depends on a template parameter.
    fn is_dependent_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool;

    /// Whether `ty` is a runtime-sized array type or similar.
    fn is_variably_modified_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool;

    /// Constexpr rules that apply to the declaration itself (return type
    /// literalness, virtual conflicts, presence of a definition).
    fn check_function_decl_rules(
        &self,
        tu: &TranslationUnit,
        func: FuncId,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck;

    /// Whole-body statement rules beyond the per-declaration policy the
    /// body checker applies.
    fn check_function_body_rules(
        &self,
        tu: &TranslationUnit,
        func: FuncId,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck;

    /// Require `ty` to be a literal type, reporting a position-specific
    /// diagnostic on failure.
    fn require_literal_type(
        &self,
        tu: &TranslationUnit,
        loc: SourceLoc,
        ty: TypeId,
        context: LiteralContext,
        in_constructor: bool,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck;

    /// Pre-check: could this variable's initializer be an integral constant
    /// expression?
    fn is_ice_candidate(&self, tu: &TranslationUnit, var: &VarDecl) -> bool;

    /// Attempt constant evaluation of the initializer. The value itself is
    /// not reused by the analysis; only success matters.
    fn evaluate_constant(&self, tu: &TranslationUnit, var: &VarDecl) -> Option<i64>;

    /// Final classification: is the initializer a valid constant
    /// initializer?
    fn is_initializer_constant_expression(&self, tu: &TranslationUnit, var: &VarDecl) -> bool;
}

/// Table-driven [`Semantics`]: every answer comes from facts the front end
/// recorded on the unit. Pure reads, no caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSemantics;

impl ModelSemantics {
    pub fn new() -> Self {
        Self
    }
}

impl Semantics for ModelSemantics {
    fn is_literal_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool {
        tu.type_info(ty).is_literal
    }

    fn is_dependent_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool {
        tu.type_info(ty).is_dependent
    }

    fn is_variably_modified_type(&self, tu: &TranslationUnit, ty: TypeId) -> bool {
        tu.type_info(ty).is_variably_modified
    }

    fn check_function_decl_rules(
        &self,
        tu: &TranslationUnit,
        func: FuncId,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck {
        let f = tu.function(func);

        if f.is_virtual {
            diags.error(f.loc, format!("virtual {} cannot be constexpr", f.entity()));
            return Err(Ineligible);
        }

        // Constructors have no meaningful return type to check.
        if !f.is_constructor
            && !self.is_dependent_type(tu, f.return_type)
            && !self.is_literal_type(tu, f.return_type)
        {
            diags.error(
                f.loc,
                format!(
                    "constexpr function's return type '{}' is not a literal type",
                    tu.type_name(f.return_type)
                ),
            );
            return Err(Ineligible);
        }

        Ok(())
    }

    fn check_function_body_rules(
        &self,
        tu: &TranslationUnit,
        func: FuncId,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck {
        let f = tu.function(func);
        let Some(body) = &f.body else {
            diags.error(f.loc, format!("constexpr {} must have a definition", f.entity()));
            return Err(Ineligible);
        };

        let mut returns = 0usize;
        for stmt in &body.stmts {
            match stmt.kind {
                // Never allowed in a constexpr body, under any standard.
                StmtKind::Goto | StmtKind::Try | StmtKind::Asm => {
                    diags.error(
                        stmt.loc,
                        format!("statement not allowed in constexpr {}", f.entity()),
                    );
                    return Err(Ineligible);
                }
                StmtKind::Return => returns += 1,
                // C++11 [dcl.constexpr]p3: the body is essentially a single
                // return statement plus declarations.
                StmtKind::Expr
                | StmtKind::If
                | StmtKind::Loop
                | StmtKind::Switch
                | StmtKind::Compound
                    if tu.standard == Standard::Cxx11 =>
                {
                    diags.error(
                        stmt.loc,
                        format!("statement not allowed in constexpr {}", f.entity()),
                    );
                    return Err(Ineligible);
                }
                StmtKind::Decl { .. }
                | StmtKind::Expr
                | StmtKind::If
                | StmtKind::Loop
                | StmtKind::Switch
                | StmtKind::Compound
                | StmtKind::Null => {}
            }
        }

        if tu.standard == Standard::Cxx11 && returns > 1 {
            diags.error(
                f.loc,
                format!(
                    "multiple return statements in constexpr {}",
                    f.entity()
                ),
            );
            return Err(Ineligible);
        }

        Ok(())
    }

    fn require_literal_type(
        &self,
        tu: &TranslationUnit,
        loc: SourceLoc,
        ty: TypeId,
        context: LiteralContext,
        in_constructor: bool,
        diags: &DiagnosticsEngine,
    ) -> RuleCheck {
        if self.is_literal_type(tu, ty) {
            return Ok(());
        }

        let entity = if in_constructor { "constructor" } else { "function" };
        let message = match context {
            LiteralContext::Parameter { index, .. } => format!(
                "constexpr {}'s {} parameter type '{}' is not a literal type",
                entity,
                ordinal(index),
                tu.type_name(ty)
            ),
            LiteralContext::LocalVariable => format!(
                "variable of non-literal type '{}' cannot be defined in a constexpr {}",
                tu.type_name(ty),
                entity
            ),
        };
        diags.error(loc, message);
        Err(Ineligible)
    }

    fn is_ice_candidate(&self, _tu: &TranslationUnit, var: &VarDecl) -> bool {
        var.init.as_ref().is_some_and(|init| init.is_ice_candidate)
    }

    fn evaluate_constant(&self, _tu: &TranslationUnit, var: &VarDecl) -> Option<i64> {
        var.init.as_ref().and_then(|init| init.evaluated)
    }

    fn is_initializer_constant_expression(&self, _tu: &TranslationUnit, var: &VarDecl) -> bool {
        var.init
            .as_ref()
            .is_some_and(|init| init.is_constant_initializer)
    }
}

/// 1st, 2nd, 3rd, 4th, ... 11th, 12th, 13th, 21st, ...
fn ordinal(n: usize) -> String {
    let suffix = match n % 100 {
        11..=13 => "th",
        _ => match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{n}{suffix}")
}
