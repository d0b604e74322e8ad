//! Output formatting - plaintext and JSON.

use crate::ast::TranslationUnit;
use crate::builder::AnalysisResult;
use crate::diagnostics::Severity;

/// Prints findings in plain text format, one line per diagnostic plus a
/// trailing line per fix-it.
pub fn print_plain(tu: &TranslationUnit, result: &AnalysisResult) {
    if result.diagnostics.is_empty() {
        println!("No constexpr suggestions.");
        return;
    }

    for diag in &result.diagnostics {
        let severity = match diag.severity {
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Error => "error",
        };
        println!("{}: {}: {}", tu.display_loc(diag.loc), severity, diag.message);
        if let Some(fix) = &diag.fix_it {
            println!(
                "{}: fix-it: insert '{}'",
                tu.display_loc(fix.loc),
                fix.insertion
            );
        }
    }

    println!(
        "SUGGESTIONS ({}): {} function(s), {} variable(s)",
        result.suggestions(),
        result.functions_upgraded,
        result.variables_suggested
    );
}

/// Prints the full result in JSON format.
///
/// Falls back to a summary line if serialization fails (should never happen
/// with these types, but handle all cases).
pub fn print_json(result: &AnalysisResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"functions_upgraded\": {}, \"variables_suggested\": {}}}",
                result.functions_upgraded, result.variables_suggested
            );
        }
    }
}
