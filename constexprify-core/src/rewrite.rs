//! Fix-it application: turn accumulated insertion hints into edited source.
//!
//! Insertions are applied largest byte offset first so earlier offsets stay
//! valid while editing. Only hints targeting the primary file are applied;
//! a hint pointing past the end of the text is an error rather than a silent
//! skip.
//!
//! Safe file handling: dry-run support, refusal to edit through symlinks.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ast::TranslationUnit;
use crate::builder::AnalysisResult;
use crate::diagnostics::FixItHint;
use crate::error::ConstexprifyError;

/// Result of a fix operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResult {
    pub file: String,
    pub insertions_applied: usize,
    pub dry_run: bool,
}

/// Apply insertion hints to `source`, returning the edited text.
///
/// Hints at the same offset keep their emission order in the output.
pub fn apply_fix_its(source: &str, fix_its: &[&FixItHint]) -> Result<String, ConstexprifyError> {
    let mut ordered: Vec<&FixItHint> = fix_its.to_vec();
    // Stable sort: equal offsets preserve emission order.
    ordered.sort_by_key(|f| f.loc.offset);

    let mut edited = String::from(source);
    for fix in ordered.iter().rev() {
        let offset = fix.loc.offset as usize;
        if offset > edited.len() {
            return Err(ConstexprifyError::fix(format!(
                "insertion offset {} is past the end of the file ({} bytes)",
                offset,
                edited.len()
            )));
        }
        if !edited.is_char_boundary(offset) {
            return Err(ConstexprifyError::fix(format!(
                "insertion offset {} is not a character boundary",
                offset
            )));
        }
        edited.insert_str(offset, &fix.insertion);
    }
    Ok(edited)
}

/// Apply the run's fix-its to the unit's primary source file.
///
/// In dry-run mode the edited text is computed but not written. Returns the
/// outcome, or `Ok` with zero insertions when there is nothing to apply.
pub fn fix_primary_file(
    tu: &TranslationUnit,
    result: &AnalysisResult,
    dry_run: bool,
) -> Result<FixResult> {
    let path_str = &tu.file(tu.primary_file).path;
    let path = Path::new(path_str);

    let fixes: Vec<&FixItHint> = result
        .fix_its()
        .into_iter()
        .filter(|f| f.loc.file == tu.primary_file)
        .collect();

    if fixes.is_empty() {
        return Ok(FixResult {
            file: path_str.clone(),
            insertions_applied: 0,
            dry_run,
        });
    }

    // Refuse to edit through symlinks.
    let metadata = path
        .symlink_metadata()
        .with_context(|| format!("Failed to stat: {}", path.display()))?;
    if metadata.file_type().is_symlink() {
        anyhow::bail!("Refusing to edit symlink: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    let edited = apply_fix_its(&source, &fixes)
        .with_context(|| format!("Failed to apply fix-its to {}", path.display()))?;

    if dry_run {
        println!(
            "[DRY-RUN] Would apply {} insertion(s) to {}",
            fixes.len(),
            path.display()
        );
    } else {
        fs::write(path, edited)
            .with_context(|| format!("Failed to write source file: {}", path.display()))?;
        println!("[FIX] Applied {} insertion(s) to {}", fixes.len(), path.display());
    }

    Ok(FixResult {
        file: path_str.clone(),
        insertions_applied: fixes.len(),
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FileId, SourceLoc};

    fn hint(offset: u32, text: &str) -> FixItHint {
        FixItHint::insertion(SourceLoc::new(FileId(0), offset, 1, offset + 1), text)
    }

    #[test]
    fn test_single_insertion() {
        let source = "int square(int x) { return x * x; }";
        let fix = hint(0, "constexpr ");
        let edited = apply_fix_its(source, &[&fix]).unwrap();
        assert_eq!(edited, "constexpr int square(int x) { return x * x; }");
    }

    #[test]
    fn test_multiple_insertions_keep_offsets_valid() {
        let source = "int f() { return 1; }\nint g() { return 2; }\n";
        let f = hint(0, "constexpr ");
        let g = hint(22, "constexpr ");
        let edited = apply_fix_its(source, &[&f, &g]).unwrap();
        assert_eq!(
            edited,
            "constexpr int f() { return 1; }\nconstexpr int g() { return 2; }\n"
        );
    }

    #[test]
    fn test_insertion_order_is_independent_of_hint_order() {
        let source = "ab";
        let early = hint(0, "x");
        let late = hint(2, "y");
        // Reversed hint order must not change the result.
        let edited = apply_fix_its(source, &[&late, &early]).unwrap();
        assert_eq!(edited, "xaby");
    }

    #[test]
    fn test_offset_past_end_is_error() {
        let fix = hint(10, "constexpr ");
        let err = apply_fix_its("short", &[&fix]).unwrap_err();
        assert!(matches!(err, ConstexprifyError::Fix { .. }));
    }

    #[test]
    fn test_no_fixes_is_identity() {
        let source = "unchanged";
        assert_eq!(apply_fix_its(source, &[]).unwrap(), "unchanged");
    }
}
