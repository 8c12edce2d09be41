//! Shell-out wrapper around the Graphviz layout engine. Rendering is
//! opt-in; a missing `dot` binary surfaces as a warning, never a failure of
//! the analysis run.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Result;

pub fn render_svg(dot_path: &Path) -> Result<PathBuf> {
    let out = dot_path.with_extension("svg");
    let status = Command::new("dot")
        .arg("-Tsvg")
        .arg(dot_path)
        .arg("-o")
        .arg(&out)
        .status()?;
    if !status.success() {
        return Err(io::Error::other(format!("dot exited with {status}")).into());
    }
    Ok(out)
}
