use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tacho_model::{CardGeneration, JsonRecordParser};
use tacho_nav::verify::check_key;
use tacho_nav::{DeferredQueue, Engine, ErcaKeys, MenuItem, NullSink, VerificationDispatcher};

use crate::Options;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    /// Record already decoded to JSON
    Json,
}

pub fn detect_format(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some(ext) if is_raw_download(ext) => {
            bail!("Raw .{ext} downloads must be decoded to JSON first")
        }
        Some(ext) => bail!("Unknown file extension: .{ext}"),
        None => bail!("Cannot detect format: file has no extension"),
    }
}

fn is_raw_download(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "ddd" | "esm" | "tgd" | "c1b" | "v1b"
    )
}

/// Read the configured ERCA keys and check their sizes.
pub fn erca_keys(options: &Options) -> Result<ErcaKeys> {
    let keys = ErcaKeys::from_files(options.erca_gen1.as_deref(), options.erca_gen2.as_deref())
        .context("reading ERCA public keys")?;
    for generation in [CardGeneration::Gen1, CardGeneration::Gen2] {
        if let Some(key) = keys.key(generation) {
            check_key(generation, key)?;
        }
    }
    Ok(keys)
}

/// A record loaded into a fresh engine.
pub struct Loaded {
    pub engine: Engine<NullSink>,
    pub menu: Vec<MenuItem>,
    /// The checked ERCA keys the engine was built with.
    pub keys: ErcaKeys,
}

/// Parse `input` and load it into a fresh engine.
pub fn open(input: &Path, options: &Options) -> Result<Loaded> {
    detect_format(input).context("input file")?;
    let start = Instant::now();

    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let file_name = input
        .file_name()
        .map_or_else(|| input.display().to_string(), |n| n.to_string_lossy().into_owned());

    let queue = Arc::new(DeferredQueue::new());
    let keys = erca_keys(options)?;
    let dispatcher = VerificationDispatcher::new(queue.clone()).with_keys(keys.clone());
    let mut engine = Engine::with_options(NullSink, dispatcher, options.engine);

    let menu = engine
        .load_bytes(&file_name, &bytes, &JsonRecordParser)
        .with_context(|| format!("parsing record from {}", input.display()))?;
    let verified = queue.run_pending();

    log::info!(
        "Loaded {} in {:.1}ms: {} menu items, {} verification tasks",
        input.display(),
        start.elapsed().as_secs_f64() * 1000.0,
        menu.len(),
        verified
    );
    Ok(Loaded { engine, menu, keys })
}
