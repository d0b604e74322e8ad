//! Diagnostic records, fix-it hints, and the collection engine.
//!
//! The engine is the single sink for everything the analysis says:
//! user-facing warnings, advisory notes, and the error-severity records the
//! legality machinery produces while probing. Probes run with diagnostics
//! suppressed; suppression is a scoped resource ([`SuppressionGuard`]) whose
//! `Drop` restores the prior state on every exit path, so an early return out
//! of a failed check can never leave the engine muted.
//!
//! Single-threaded by design: the analysis is one synchronous walk over one
//! unit, so interior mutability is `Cell`/`RefCell`, not locks.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use crate::ast::SourceLoc;

/// How severe a diagnostic is. Only `Warning` and `Note` records ever reach
/// the user; `Error` records exist for the suppressed probe machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Note,
    Error,
}

/// A textual insertion a rewriting engine can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixItHint {
    pub loc: SourceLoc,
    pub insertion: String,
}

impl FixItHint {
    /// Insert `text` immediately before `loc`.
    pub fn insertion(loc: SourceLoc, text: impl Into<String>) -> Self {
        Self {
            loc,
            insertion: text.into(),
        }
    }
}

/// An immutable diagnostic record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub loc: SourceLoc,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub fix_it: Option<FixItHint>,
}

impl Diagnostic {
    pub fn warning(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            loc,
            severity: Severity::Warning,
            message: message.into(),
            fix_it: None,
        }
    }

    pub fn note(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            loc,
            severity: Severity::Note,
            message: message.into(),
            fix_it: None,
        }
    }

    pub fn error(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            loc,
            severity: Severity::Error,
            message: message.into(),
            fix_it: None,
        }
    }

    pub fn with_fix_it(mut self, fix_it: FixItHint) -> Self {
        self.fix_it = Some(fix_it);
        self
    }
}

/// Collects diagnostics for one analysis run.
#[derive(Debug, Default)]
pub struct DiagnosticsEngine {
    records: RefCell<Vec<Diagnostic>>,
    /// Suppression depth; nesting-safe so a probe inside a probe still
    /// restores correctly.
    suppressed: Cell<u32>,
}

impl DiagnosticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Dropped silently while suppressed.
    pub fn report(&self, diag: Diagnostic) {
        if self.is_suppressed() {
            return;
        }
        self.records.borrow_mut().push(diag);
    }

    pub fn warn(&self, loc: SourceLoc, message: impl Into<String>, fix_it: Option<FixItHint>) {
        let mut diag = Diagnostic::warning(loc, message);
        diag.fix_it = fix_it;
        self.report(diag);
    }

    pub fn note(&self, loc: SourceLoc, message: impl Into<String>) {
        self.report(Diagnostic::note(loc, message));
    }

    pub fn error(&self, loc: SourceLoc, message: impl Into<String>) {
        self.report(Diagnostic::error(loc, message));
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed.get() > 0
    }

    /// Begin a speculative probe: diagnostics are discarded until the
    /// returned guard is dropped. The guard exposes no other operations.
    #[must_use = "suppression ends when the guard is dropped"]
    pub fn suppress(&self) -> SuppressionGuard<'_> {
        self.suppressed.set(self.suppressed.get() + 1);
        SuppressionGuard { engine: self }
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Drain all recorded diagnostics, in emission order.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

/// Scoped diagnostic suppression. Restores the previous state on drop,
/// including early-return and panic unwinding paths.
#[derive(Debug)]
pub struct SuppressionGuard<'a> {
    engine: &'a DiagnosticsEngine,
}

impl Drop for SuppressionGuard<'_> {
    fn drop(&mut self) {
        let depth = self.engine.suppressed.get();
        debug_assert!(depth > 0, "unbalanced suppression guard");
        self.engine.suppressed.set(depth.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FileId, SourceLoc};

    fn loc() -> SourceLoc {
        SourceLoc::new(FileId(0), 0, 1, 1)
    }

    #[test]
    fn test_report_and_take_preserves_order() {
        let engine = DiagnosticsEngine::new();
        engine.warn(loc(), "first", None);
        engine.note(loc(), "second");

        let records = engine.take();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].message, "second");
        assert!(engine.is_empty());
    }

    #[test]
    fn test_suppression_drops_records() {
        let engine = DiagnosticsEngine::new();
        {
            let _quiet = engine.suppress();
            engine.error(loc(), "probe failure detail");
            assert!(engine.is_suppressed());
        }
        assert!(!engine.is_suppressed());
        assert!(engine.is_empty());

        engine.warn(loc(), "visible", None);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_suppression_restored_on_early_return() {
        fn probe(engine: &DiagnosticsEngine, fail: bool) -> Result<(), ()> {
            let _quiet = engine.suppress();
            if fail {
                return Err(());
            }
            Ok(())
        }

        let engine = DiagnosticsEngine::new();
        assert!(probe(&engine, true).is_err());
        assert!(!engine.is_suppressed());
        assert!(probe(&engine, false).is_ok());
        assert!(!engine.is_suppressed());
    }

    #[test]
    fn test_nested_suppression() {
        let engine = DiagnosticsEngine::new();
        let outer = engine.suppress();
        {
            let _inner = engine.suppress();
            assert!(engine.is_suppressed());
        }
        // Still suppressed: the outer scope has not ended.
        assert!(engine.is_suppressed());
        drop(outer);
        assert!(!engine.is_suppressed());
    }

    #[test]
    fn test_fix_it_attaches_to_warning() {
        let engine = DiagnosticsEngine::new();
        engine.warn(
            loc(),
            "function can be constexpr",
            Some(FixItHint::insertion(loc(), "constexpr ")),
        );
        let records = engine.take();
        let fix = records[0].fix_it.as_ref().unwrap();
        assert_eq!(fix.insertion, "constexpr ");
    }
}
