//! constexprify CLI - constexpr suggestion tool for parsed C++ units.
//!
//! Takes a JSON-serialized translation unit (parse tree + resolved semantic
//! facts, as produced by a front end), finds functions and local variables
//! that can be constexpr, and reports a warning + fix-it for each. With
//! `--fix` the insertions are applied to the primary source file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use constexprify_core::{
    init_structured_logging, load_config, load_translation_unit, log_info, print_json,
    print_plain, Constexprify, Standard,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Suggest constexpr for eligible functions and variables")]
pub struct Cli {
    /// Path to a JSON-serialized translation unit
    unit: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Language standard to analyze under (c++11 or c++14)
    #[arg(long, value_name = "STD")]
    std: Option<String>,

    /// Function names to never suggest for
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Apply the fix-its to the primary source file
    #[arg(long)]
    fix: bool,

    /// Show what would be edited without writing anything
    #[arg(long)]
    fix_dry_run: bool,
}

/// "c++11" / "11" / "c++14" / "14" → Standard.
fn parse_standard(value: &str) -> Result<Standard> {
    match value {
        "c++11" | "11" => Ok(Standard::Cxx11),
        "c++14" | "14" => Ok(Standard::Cxx14),
        other => anyhow::bail!("unsupported standard '{}' (expected c++11 or c++14)", other),
    }
}

fn main() -> Result<()> {
    init_structured_logging();
    let cli = Cli::parse();

    let mut tu = load_translation_unit(&cli.unit)
        .with_context(|| format!("Failed to load translation unit {}", cli.unit.display()))?;

    // constexprify.toml next to the unit, if present. CLI flags win.
    let config_root = cli.unit.parent().unwrap_or(Path::new("."));
    let config = load_config(config_root)?.unwrap_or_default();

    let mut builder = Constexprify::new();
    if let Some(ignore) = config.ignore {
        builder = builder.ignore_functions(ignore);
    }
    if !cli.ignore.is_empty() {
        builder = builder.ignore_functions(cli.ignore.iter().cloned());
    }
    if let Some(standard) = config.standard {
        builder = builder.with_standard(standard);
    }
    if let Some(std_arg) = &cli.std {
        builder = builder.with_standard(parse_standard(std_arg)?);
    }

    let result = builder.run(&mut tu);
    log_info(&format!(
        "analysis complete: {} function(s), {} variable(s)",
        result.functions_upgraded, result.variables_suggested
    ));

    let json_output = cli.json
        || config
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f == "json");
    if json_output {
        print_json(&result);
    } else {
        print_plain(&tu, &result);
    }

    if cli.fix || cli.fix_dry_run {
        let outcome = constexprify_core::fix_primary_file(&tu, &result, cli.fix_dry_run)?;
        if outcome.insertions_applied == 0 {
            println!("Nothing to fix.");
        }
    }

    Ok(())
}
