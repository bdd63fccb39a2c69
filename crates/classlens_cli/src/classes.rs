//! `classlens classes`: list class names in aggregate order.

use crate::inputs;
use crate::{FilesArgs, GlobalArgs};

/// Runs the `classlens classes` command.
pub fn run(args: &FilesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let inputs = inputs::resolve(args, global)?;
    let mut engine = inputs.engine();
    for (class, _) in engine.query_all(&inputs.paths) {
        println!("{class}");
    }
    Ok(0)
}
