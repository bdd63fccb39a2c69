//! `classlens query`: print classes with the rules that reference them.

use std::io::Write;

use classlens_engine::Completions;

use crate::inputs;
use crate::{GlobalArgs, OutputFormat, QueryArgs};

/// Runs the `classlens query` command.
///
/// Returns exit code 1 when `--class` names a class no rule references.
pub fn run(args: &QueryArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = inputs::resolve(&args.inputs, global)?;
    let mut engine = inputs.engine();

    let completions: Completions = match &args.class {
        Some(class) => match engine.lookup(&inputs.paths, class) {
            Some(text) => vec![(class.clone(), text)],
            None => {
                if !global.quiet {
                    eprintln!("no rules reference class `{class}`");
                }
                return Ok(1);
            }
        },
        None => engine.query_all(&inputs.paths),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_text(&mut out, &completions)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&completions)?)?,
    }
    Ok(0)
}

/// Writes each class as `.name` followed by its rule text, indented.
pub fn write_text(out: &mut impl Write, completions: &Completions) -> std::io::Result<()> {
    for (class, text) in completions {
        writeln!(out, ".{class}")?;
        for line in text.lines() {
            if line.is_empty() {
                writeln!(out)?;
            } else {
                writeln!(out, "    {line}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
