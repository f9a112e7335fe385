use crate::model::{InputBundle, OutputBundle};
use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Charge un lot d'entrée JSON ; champs inconnus ou manquants refusés.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> anyhow::Result<InputBundle> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let bundle: InputBundle = serde_json::from_slice(&data)
        .with_context(|| format!("parsing input bundle {}", path.display()))?;
    Ok(bundle)
}

/// Export JSON du résultat (jolie mise en forme), écrit de manière atomique.
pub fn export_output_json<P: AsRef<Path>>(path: P, output: &OutputBundle) -> anyhow::Result<()> {
    write_json_atomic(path.as_ref(), output)
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
