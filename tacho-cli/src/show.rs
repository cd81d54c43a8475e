use anyhow::{Context, Result, bail};
use std::path::Path;

use tacho_model::to_json_string;
use tacho_nav::GenerationTag;

use crate::Options;
use crate::load::open;

pub fn run_show(input: &Path, key: &str, generation: &str, options: &Options) -> Result<()> {
    let mut engine = open(input, options)?.engine;
    let tag = GenerationTag::parse(generation);

    let Some(data) = engine.on_select(key, &tag) else {
        bail!("{}: no part '{key}' for {tag}", input.display());
    };
    let text = to_json_string(&data, options.engine.display_indent)
        .with_context(|| format!("rendering {key}"))?;
    println!("{text}");
    Ok(())
}
