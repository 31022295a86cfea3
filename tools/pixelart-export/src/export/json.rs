//! JSON scene dump

use anyhow::Result;
use std::io::Write;

use pixelart_common::MemoryScene;

/// Pretty-print the whole scene (objects, meshes, materials)
pub fn write_json<W: Write>(scene: &MemoryScene, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, scene)?;
    writeln!(writer)?;
    Ok(())
}
