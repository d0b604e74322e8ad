//! Function eligibility pass.
//!
//! Walks every function declaration in the unit, in declaration order, and
//! decides whether adding `constexpr` would be legal. Eligible functions are
//! marked constexpr in the arena (so the variable pass skips them) and get a
//! warning with a `constexpr ` insertion fix-it at their start location.
//!
//! The eligibility test is a speculative probe: the legality machinery
//! reports its reasons through the diagnostics engine, and those reports
//! must not leak when the probe fails, so the whole probe runs under a
//! suppression guard that is released on every exit path.

use std::collections::HashSet;

use tracing::debug;

use crate::ast::{FuncId, TranslationUnit};
use crate::check::{check_body_declarations, check_parameter_types, BodyCheckReport};
use crate::diagnostics::{DiagnosticsEngine, FixItHint};
use crate::semantics::{Ineligible, Semantics};

/// Run the pass. Returns the number of functions marked constexpr.
pub fn run_function_pass<S: Semantics>(
    tu: &mut TranslationUnit,
    sema: &S,
    diags: &DiagnosticsEngine,
    ignored: &HashSet<String>,
) -> usize {
    let mut upgraded = 0;
    let ids: Vec<FuncId> = tu.function_ids().collect();
    for id in ids {
        let f = tu.function(id);

        // Only declarations written in the primary file.
        if !tu.is_in_primary_file(f.loc) {
            continue;
        }
        // Already constexpr: nothing to suggest.
        if f.is_constexpr {
            continue;
        }
        // The entry point can never be constexpr.
        if f.is_entry_point {
            continue;
        }
        if ignored.contains(&f.name) {
            continue;
        }

        let Ok(report) = probe(tu, id, sema, diags) else {
            continue;
        };

        // Mark in the arena first; the variable pass reads this flag.
        let f = tu.function_mut(id);
        f.is_constexpr = true;
        let loc = f.loc;
        let name = f.name.clone();

        diags.warn(
            loc,
            "function can be constexpr",
            Some(FixItHint::insertion(loc, "constexpr ")),
        );
        // Advisory notes surface only alongside a successful suggestion.
        for note in report.notes {
            diags.report(note);
        }

        debug!(function = %name, "marked constexpr");
        upgraded += 1;
    }
    upgraded
}

/// The three-part eligibility test, with all diagnostics suppressed.
/// Failure is an expected outcome and produces no user-visible output.
fn probe<S: Semantics>(
    tu: &TranslationUnit,
    id: FuncId,
    sema: &S,
    diags: &DiagnosticsEngine,
) -> Result<BodyCheckReport, Ineligible> {
    let _quiet = diags.suppress();

    sema.check_function_decl_rules(tu, id, diags)?;
    sema.check_function_body_rules(tu, id, diags)?;
    let report = check_body_declarations(tu, id, sema, diags)?;
    check_parameter_types(tu, id, sema, diags)?;

    Ok(report)
}
