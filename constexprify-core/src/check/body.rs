//! Statement-body legality: the per-declaration-kind policy.
//!
//! C++11 [dcl.constexpr]p3 and p4 restrict what a constexpr function or
//! constructor body may declare; C++14 relaxes most of it. The checker walks
//! every declaration statement directly inside the body, classifies each
//! declaration by kind, and short-circuits on the first hard failure.
//! Always-legal-but-noteworthy constructs (inline type definitions, local
//! variables, extension-only declaration kinds) produce advisory notes that
//! the caller surfaces only alongside a successful suggestion.

use crate::ast::{FuncId, LocalDeclKind, SourceLoc, Standard, StmtKind, StorageDuration, TranslationUnit};
use crate::diagnostics::{Diagnostic, DiagnosticsEngine};
use crate::semantics::{Ineligible, LiteralContext, Semantics};

/// What a successful body scan learned.
#[derive(Debug, Default)]
pub struct BodyCheckReport {
    /// Advisory note-level diagnostics, in body order. Not yet emitted: the
    /// function pass forwards them when (and only when) the suggestion
    /// succeeds.
    pub notes: Vec<Diagnostic>,
    /// First statement that relies on a newer-standard extension
    /// (namespace-alias or nested function declaration), if any.
    pub extension_anchor: Option<SourceLoc>,
}

/// Check every declaration introduced directly in the body of `func`.
///
/// Returns the advisory report on success; hard failures are reported
/// through `diags` and surface as `Err(Ineligible)`.
pub fn check_body_declarations<S: Semantics>(
    tu: &TranslationUnit,
    func: FuncId,
    sema: &S,
    diags: &DiagnosticsEngine,
) -> Result<BodyCheckReport, Ineligible> {
    let f = tu.function(func);
    let entity = f.entity();
    let mut report = BodyCheckReport::default();

    let Some(body) = &f.body else {
        // Nothing to scan; the declaration-level rules decide this case.
        return Ok(report);
    };

    for stmt in &body.stmts {
        let StmtKind::Decl { decls } = &stmt.kind else {
            continue;
        };
        for &id in decls {
            let decl = tu.local(id);
            match &decl.kind {
                // static_assert-declarations, using-declarations and
                // using-directives are always permitted.
                LocalDeclKind::StaticAssert
                | LocalDeclKind::UsingDeclaration
                | LocalDeclKind::UsingDirective
                | LocalDeclKind::UnresolvedUsing => {}

                // typedefs and alias-declarations, unless they name a
                // variably-modified type.
                LocalDeclKind::TypeAlias { underlying, type_loc } => {
                    if sema.is_variably_modified_type(tu, *underlying) {
                        diags.error(
                            *type_loc,
                            format!(
                                "variably-modified type '{}' cannot be used in a constexpr {}",
                                tu.type_name(*underlying),
                                entity
                            ),
                        );
                        return Err(Ineligible);
                    }
                }

                // C++14 allows types to be defined, not just declared.
                LocalDeclKind::TagType { is_definition, .. } => {
                    if *is_definition {
                        report.notes.push(Diagnostic::note(
                            stmt.loc,
                            newer_standard_wording(tu.standard, "type definition", entity),
                        ));
                    }
                }

                // These only appear accompanying other declarations that are
                // classified above.
                LocalDeclKind::EnumConstant
                | LocalDeclKind::IndirectField
                | LocalDeclKind::Parameter => {}

                // C++14 [dcl.constexpr]p3 allows anything except a definition
                // of a variable of non-literal type, of static or thread
                // storage duration, or with no initialization.
                LocalDeclKind::Var(var) => {
                    if var.is_definition {
                        match var.storage {
                            StorageDuration::Static | StorageDuration::Thread => {
                                let duration = if var.storage == StorageDuration::Thread {
                                    "thread_local"
                                } else {
                                    "static"
                                };
                                diags.error(
                                    decl.loc,
                                    format!(
                                        "{} variable not permitted in a constexpr {}",
                                        duration, entity
                                    ),
                                );
                                return Err(Ineligible);
                            }
                            StorageDuration::Automatic => {}
                        }
                        if !sema.is_dependent_type(tu, var.ty) {
                            sema.require_literal_type(
                                tu,
                                decl.loc,
                                var.ty,
                                LiteralContext::LocalVariable,
                                f.is_constructor,
                                diags,
                            )?;
                            if var.init.is_none() && !var.is_for_range {
                                diags.error(
                                    decl.loc,
                                    format!("uninitialized variable in a constexpr {}", entity),
                                );
                                return Err(Ineligible);
                            }
                        }
                    }
                    report.notes.push(Diagnostic::note(
                        decl.loc,
                        newer_standard_wording(tu.standard, "variable declaration", entity),
                    ));
                }

                // Disallowed in C++11, permitted in C++14; allowed everywhere
                // here as an extension, anchored for the advisory note.
                LocalDeclKind::NamespaceAlias | LocalDeclKind::Function => {
                    if report.extension_anchor.is_none() {
                        report.extension_anchor = Some(stmt.loc);
                    }
                }

                LocalDeclKind::Other => {
                    diags.error(
                        stmt.loc,
                        format!("statement not allowed in constexpr {}", entity),
                    );
                    return Err(Ineligible);
                }
            }
        }
    }

    if let Some(anchor) = report.extension_anchor {
        report.notes.push(Diagnostic::note(
            anchor,
            newer_standard_wording(tu.standard, "use of this statement", entity),
        ));
    }

    Ok(report)
}

/// Compatibility wording under C++14 rules, extension wording under C++11.
fn newer_standard_wording(standard: Standard, what: &str, entity: &str) -> String {
    match standard {
        Standard::Cxx14 => format!("{what} in a constexpr {entity} is incompatible with C++11"),
        Standard::Cxx11 => format!("{what} in a constexpr {entity} is a C++14 extension"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        Body, FileId, FunctionDecl, Initializer, LocalDecl, SourceLoc, Stmt, TypeInfo, VarDecl,
    };
    use crate::semantics::ModelSemantics;

    fn loc(line: u32) -> SourceLoc {
        SourceLoc::new(FileId(0), line * 10, line, 1)
    }

    struct Fixture {
        tu: TranslationUnit,
        int_ty: crate::ast::TypeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tu = TranslationUnit::new("main.cpp");
            let int_ty = tu.add_type(TypeInfo::literal("int"));
            Self { tu, int_ty }
        }

        /// A function whose body consists of one declaration statement
        /// holding the given locals.
        fn with_decl_stmt(&mut self, kinds: Vec<LocalDeclKind>) -> FuncId {
            let decls = kinds
                .into_iter()
                .enumerate()
                .map(|(i, kind)| {
                    self.tu.add_local(LocalDecl::new(loc(10 + i as u32), kind))
                })
                .collect();
            let mut f = FunctionDecl::new("candidate", loc(1), self.int_ty);
            f.body = Some(Body {
                stmts: vec![
                    Stmt::new(loc(2), StmtKind::Decl { decls }),
                    Stmt::new(loc(3), StmtKind::Return),
                ],
            });
            self.tu.add_function(f)
        }
    }

    #[test]
    fn test_always_allowed_kinds() {
        let mut fx = Fixture::new();
        let id = fx.with_decl_stmt(vec![
            LocalDeclKind::StaticAssert,
            LocalDeclKind::UsingDeclaration,
            LocalDeclKind::UsingDirective,
            LocalDeclKind::UnresolvedUsing,
            LocalDeclKind::EnumConstant,
            LocalDeclKind::IndirectField,
            LocalDeclKind::Parameter,
        ]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        assert!(report.notes.is_empty());
        assert!(report.extension_anchor.is_none());
    }

    #[test]
    fn test_variably_modified_alias_is_hard_failure() {
        let mut fx = Fixture::new();
        let vla = fx.tu.add_type(TypeInfo {
            name: "int[n]".into(),
            is_literal: false,
            is_dependent: false,
            is_variably_modified: true,
        });
        let id = fx.with_decl_stmt(vec![LocalDeclKind::TypeAlias {
            underlying: vla,
            type_loc: loc(10),
        }]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        let records = diags.take();
        assert!(records[0].message.contains("variably-modified type 'int[n]'"));
    }

    #[test]
    fn test_plain_alias_is_allowed() {
        let mut fx = Fixture::new();
        let underlying = fx.int_ty;
        let id = fx.with_decl_stmt(vec![LocalDeclKind::TypeAlias {
            underlying,
            type_loc: loc(10),
        }]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_ok());
    }

    #[test]
    fn test_tag_definition_notes_but_passes() {
        let mut fx = Fixture::new();
        let id = fx.with_decl_stmt(vec![LocalDeclKind::TagType {
            name: "Local".into(),
            is_definition: true,
        }]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        assert_eq!(report.notes.len(), 1);
        assert_eq!(
            report.notes[0].message,
            "type definition in a constexpr function is incompatible with C++11"
        );
        // Nothing reaches the engine from an advisory case.
        assert!(diags.is_empty());
    }

    #[test]
    fn test_tag_forward_declaration_is_silent() {
        let mut fx = Fixture::new();
        let id = fx.with_decl_stmt(vec![LocalDeclKind::TagType {
            name: "Fwd".into(),
            is_definition: false,
        }]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        assert!(report.notes.is_empty());
    }

    #[test]
    fn test_extension_wording_under_cxx11() {
        let mut fx = Fixture::new();
        fx.tu.standard = Standard::Cxx11;
        let id = fx.with_decl_stmt(vec![LocalDeclKind::TagType {
            name: "Local".into(),
            is_definition: true,
        }]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        assert_eq!(
            report.notes[0].message,
            "type definition in a constexpr function is a C++14 extension"
        );
    }

    #[test]
    fn test_static_local_is_hard_failure() {
        let mut fx = Fixture::new();
        let var = VarDecl::new("calls", fx.int_ty)
            .with_storage(StorageDuration::Static)
            .with_init(Initializer::constant(0));
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        assert!(diags.take()[0]
            .message
            .starts_with("static variable not permitted"));
    }

    #[test]
    fn test_thread_local_wording() {
        let mut fx = Fixture::new();
        let var = VarDecl::new("slot", fx.int_ty)
            .with_storage(StorageDuration::Thread)
            .with_init(Initializer::constant(0));
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        assert!(diags.take()[0]
            .message
            .starts_with("thread_local variable not permitted"));
    }

    #[test]
    fn test_non_literal_local_is_hard_failure() {
        let mut fx = Fixture::new();
        let guard_ty = fx.tu.add_type(TypeInfo::non_literal("std::lock_guard"));
        let var = VarDecl::new("guard", guard_ty).with_init(Initializer::runtime());
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
    }

    #[test]
    fn test_uninitialized_local_is_hard_failure() {
        let mut fx = Fixture::new();
        let var = VarDecl::new("x", fx.int_ty);
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        assert_eq!(
            diags.take()[0].message,
            "uninitialized variable in a constexpr function"
        );
    }

    #[test]
    fn test_dependent_local_defers_both_checks() {
        let mut fx = Fixture::new();
        let t = fx.tu.add_type(TypeInfo::dependent("T"));
        // Dependent type, no initializer: still fine until instantiation.
        let var = VarDecl::new("value", t);
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_ok());
    }

    #[test]
    fn test_for_range_local_needs_no_initializer() {
        let mut fx = Fixture::new();
        let mut var = VarDecl::new("element", fx.int_ty);
        var.is_for_range = true;
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_ok());
    }

    #[test]
    fn test_valid_local_still_gets_advisory_note() {
        let mut fx = Fixture::new();
        let var = VarDecl::new("n", fx.int_ty).with_init(Initializer::constant(25));
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Var(var)]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].message.starts_with("variable declaration"));
    }

    #[test]
    fn test_extension_anchor_records_first_site_only() {
        let mut fx = Fixture::new();
        let id = fx.with_decl_stmt(vec![
            LocalDeclKind::NamespaceAlias,
            LocalDeclKind::Function,
        ]);
        let diags = DiagnosticsEngine::new();
        let report =
            check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).unwrap();
        // Both locals sit in the same statement; the anchor is its start.
        assert_eq!(report.extension_anchor, Some(loc(2)));
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].message.starts_with("use of this statement"));
    }

    #[test]
    fn test_unclassified_declaration_is_hard_failure() {
        let mut fx = Fixture::new();
        let id = fx.with_decl_stmt(vec![LocalDeclKind::Other]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        assert_eq!(
            diags.take()[0].message,
            "statement not allowed in constexpr function"
        );
    }

    #[test]
    fn test_short_circuit_on_first_failure() {
        let mut fx = Fixture::new();
        let bad = VarDecl::new("calls", fx.int_ty).with_storage(StorageDuration::Static);
        let id = fx.with_decl_stmt(vec![
            LocalDeclKind::Var(bad),
            LocalDeclKind::Other, // never reached
        ]);
        let diags = DiagnosticsEngine::new();
        assert!(check_body_declarations(&fx.tu, id, &ModelSemantics::new(), &diags).is_err());
        assert_eq!(diags.len(), 1);
    }
}
