//! Variable eligibility pass.
//!
//! Runs after the function pass and only descends into functions whose
//! constexpr flag is still false: a function upgraded moments ago already
//! satisfies whole-body rules, so its locals can hold no further
//! suggestions. Within a body, only single-declaration statements declaring
//! one plain, not-yet-constexpr variable are considered; multi-declarator
//! statements are skipped entirely.

use tracing::debug;

use crate::ast::{LocalDeclKind, SourceLoc, StmtKind, TranslationUnit, VarDecl};
use crate::diagnostics::{DiagnosticsEngine, FixItHint};
use crate::semantics::Semantics;

/// Run the pass. Returns the number of variable suggestions emitted.
pub fn run_variable_pass<S: Semantics>(
    tu: &TranslationUnit,
    sema: &S,
    diags: &DiagnosticsEngine,
) -> usize {
    let mut suggested = 0;
    for id in tu.function_ids() {
        let f = tu.function(id);
        if !tu.is_in_primary_file(f.loc) {
            continue;
        }
        // Skip functions that are (or just became) constexpr.
        if f.is_constexpr {
            continue;
        }
        let Some(body) = &f.body else {
            continue;
        };

        for stmt in &body.stmts {
            let StmtKind::Decl { decls } = &stmt.kind else {
                continue;
            };
            // `int a = 1, b = 2;` never produces a suggestion.
            let &[only] = decls.as_slice() else {
                continue;
            };
            let LocalDeclKind::Var(var) = &tu.local(only).kind else {
                continue;
            };
            if var.is_constexpr {
                continue;
            }
            if suggest(tu, var, stmt.loc, sema, diags) {
                suggested += 1;
            }
        }
    }
    suggested
}

/// The initializer gauntlet: every step that fails means "not eligible",
/// silently. The evaluated constant itself is not retained.
fn suggest<S: Semantics>(
    tu: &TranslationUnit,
    var: &VarDecl,
    stmt_loc: SourceLoc,
    sema: &S,
    diags: &DiagnosticsEngine,
) -> bool {
    let Some(init) = &var.init else {
        return false;
    };
    if !sema.is_ice_candidate(tu, var) {
        return false;
    }
    if init.is_value_dependent {
        return false;
    }
    if sema.evaluate_constant(tu, var).is_none() {
        return false;
    }
    if !sema.is_initializer_constant_expression(tu, var) {
        return false;
    }

    diags.warn(
        stmt_loc,
        "variable can be constexpr",
        Some(FixItHint::insertion(stmt_loc, "constexpr ")),
    );
    debug!(variable = %var.name, "suggested constexpr");
    true
}
