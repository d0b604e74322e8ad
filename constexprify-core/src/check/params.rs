//! Parameter literalness: every parameter type of a constexpr candidate must
//! be a literal type. Dependent types are deferred (they may become literal
//! after instantiation) and never count as failure.

use crate::ast::{FuncId, TranslationUnit};
use crate::diagnostics::DiagnosticsEngine;
use crate::semantics::{Ineligible, LiteralContext, Semantics};

/// Check all parameter types of `func`, aborting on the first non-literal
/// one. The failure diagnostic carries the 1-based parameter index and the
/// parameter's source range.
pub fn check_parameter_types<S: Semantics>(
    tu: &TranslationUnit,
    func: FuncId,
    sema: &S,
    diags: &DiagnosticsEngine,
) -> Result<(), Ineligible> {
    let f = tu.function(func);
    for (index, param) in f.params.iter().enumerate() {
        if sema.is_dependent_type(tu, param.ty) {
            continue;
        }
        sema.require_literal_type(
            tu,
            param.loc,
            param.ty,
            LiteralContext::Parameter {
                index: index + 1,
                range: param.range,
            },
            f.is_constructor,
            diags,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FileId, FunctionDecl, ParamDecl, SourceLoc, TypeInfo};
    use crate::semantics::ModelSemantics;

    fn loc(col: u32) -> SourceLoc {
        SourceLoc::new(FileId(0), col, 1, col)
    }

    #[test]
    fn test_all_literal_parameters_pass() {
        let mut tu = TranslationUnit::new("main.cpp");
        let int_ty = tu.add_type(TypeInfo::literal("int"));
        let mut f = FunctionDecl::new("add", loc(1), int_ty);
        f.params = vec![
            ParamDecl::new("a", int_ty, loc(15)),
            ParamDecl::new("b", int_ty, loc(22)),
        ];
        let id = tu.add_function(f);

        let diags = DiagnosticsEngine::new();
        assert!(check_parameter_types(&tu, id, &ModelSemantics::new(), &diags).is_ok());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_first_non_literal_parameter_aborts() {
        let mut tu = TranslationUnit::new("main.cpp");
        let int_ty = tu.add_type(TypeInfo::literal("int"));
        let widget = tu.add_type(TypeInfo::non_literal("Widget"));
        let mut f = FunctionDecl::new("render", loc(1), int_ty);
        f.params = vec![
            ParamDecl::new("a", int_ty, loc(15)),
            ParamDecl::new("w", widget, loc(25)),
            ParamDecl::new("v", widget, loc(40)),
        ];
        let id = tu.add_function(f);

        let diags = DiagnosticsEngine::new();
        assert!(check_parameter_types(&tu, id, &ModelSemantics::new(), &diags).is_err());

        // Only the first offender is reported, with its 1-based index.
        let records = diags.take();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].message,
            "constexpr function's 2nd parameter type 'Widget' is not a literal type"
        );
        assert_eq!(records[0].loc, loc(25));
    }

    #[test]
    fn test_dependent_parameter_is_deferred() {
        let mut tu = TranslationUnit::new("main.cpp");
        let int_ty = tu.add_type(TypeInfo::literal("int"));
        let t = tu.add_type(TypeInfo::dependent("T"));
        let mut f = FunctionDecl::new("forward", loc(1), int_ty);
        f.params = vec![ParamDecl::new("value", t, loc(18))];
        let id = tu.add_function(f);

        let diags = DiagnosticsEngine::new();
        assert!(check_parameter_types(&tu, id, &ModelSemantics::new(), &diags).is_ok());
    }

    #[test]
    fn test_no_parameters_passes() {
        let mut tu = TranslationUnit::new("main.cpp");
        let int_ty = tu.add_type(TypeInfo::literal("int"));
        let id = tu.add_function(FunctionDecl::new("answer", loc(1), int_ty));

        let diags = DiagnosticsEngine::new();
        assert!(check_parameter_types(&tu, id, &ModelSemantics::new(), &diags).is_ok());
    }
}
