//! `classlens check`: report stylesheets that could not be fully indexed.

use std::path::{Path, PathBuf};

use classlens_diagnostics::{DiagnosticRenderer, TerminalRenderer};
use classlens_engine::{Engine, Outcome};
use indexmap::IndexSet;

use crate::inputs;
use crate::{FilesArgs, GlobalArgs};

/// Totals gathered by a check.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Files checked.
    pub files: usize,
    /// Files that could not be read.
    pub unreadable: usize,
    /// Diagnostics reported across all files.
    pub diagnostics: usize,
}

impl CheckReport {
    /// Exit code 1 if any file was unreadable.
    pub fn exit_code(&self) -> i32 {
        if self.unreadable > 0 {
            1
        } else {
            0
        }
    }
}

/// Runs the `classlens check` command.
///
/// Renders every diagnostic to stderr. Returns exit code 1 if any stylesheet
/// could not be read; malformed rules are reported but do not fail the check.
pub fn run(args: &FilesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = inputs::resolve(args, global)?;
    let mut engine = inputs.engine();
    let renderer = TerminalRenderer::new(global.color);

    let mut rendered = String::new();
    let report = check(&mut engine, &inputs.paths, &renderer, &mut rendered);
    eprint!("{rendered}");

    if !global.quiet {
        eprintln!(
            "checked {} file(s): {} unreadable, {} diagnostic(s)",
            report.files, report.unreadable, report.diagnostics
        );
    }
    Ok(report.exit_code())
}

/// Indexes `paths` and renders their diagnostics into `out`.
///
/// A path listed more than once is checked once, at its first position.
pub fn check(
    engine: &mut Engine,
    paths: &[PathBuf],
    renderer: &dyn DiagnosticRenderer,
    out: &mut String,
) -> CheckReport {
    engine.query_all(paths);

    let unique: IndexSet<&Path> = paths.iter().map(PathBuf::as_path).collect();
    let mut report = CheckReport::default();
    for path in unique {
        report.files += 1;
        if engine.outcome(path) == Some(Outcome::Failed) {
            report.unreadable += 1;
        }
        let Some(index) = engine.index(path) else {
            continue;
        };
        for diag in engine.diagnostics(path) {
            report.diagnostics += 1;
            out.push_str(&renderer.render(&diag, index.source()));
            out.push('\n');
        }
    }
    report
}
