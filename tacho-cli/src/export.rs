use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use tacho_nav::{ExportFile, GenerationTag};

use crate::Options;
use crate::load::open;

/// Export the whole record, or the part `(key, generation)`, into `out_dir`.
pub fn run_export(
    input: &Path,
    part: Option<(&str, &str)>,
    out_dir: &Path,
    options: &Options,
) -> Result<()> {
    let mut engine = open(input, options)?.engine;

    let file = match part {
        Some((key, generation)) => {
            let tag = GenerationTag::parse(generation);
            if engine.on_select(key, &tag).is_none() {
                bail!("{}: no part '{key}' for {tag}", input.display());
            }
            engine.export_selected().context("serializing selection")?
        }
        None => engine.export_all().context("serializing record")?,
    };
    let Some(file) = file else {
        bail!("{}: nothing to export", input.display());
    };

    let path = write_export(&file, out_dir)?;
    log::info!("Written: {} ({} bytes)", path.display(), file.contents.len());
    println!("Exported {} -> {}", input.display(), path.display());
    Ok(())
}

fn write_export(file: &ExportFile, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let path = out_dir.join(&file.file_name);
    std::fs::write(&path, file.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let file = ExportFile {
            file_name: "C-all.json".into(),
            contents: "{}".into(),
        };
        let path = write_export(&file, &out).unwrap();
        assert_eq!(path, out.join("C-all.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
