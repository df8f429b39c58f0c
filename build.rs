//! Emits `VERGEN_GIT_SHA`, logged by the CLI at start-up

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Short SHA; outside a git checkout vergen emits a placeholder instead
    EmitBuilder::builder().git_sha(true).emit()?;
    Ok(())
}
