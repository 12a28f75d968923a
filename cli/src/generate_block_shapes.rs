use anyhow::Result;

use block_model::{write_geojson, Pipeline, PipelineConfig, PipelineInputs};
use blockutil::{prettyprint_usize, read_json, write_json, Timer};

pub fn run(
    streets: String,
    widths: String,
    buildings: String,
    output: String,
    config: Option<String>,
    geojson: Option<String>,
) -> Result<()> {
    let mut timer = Timer::new("generate-block-shapes");
    let cfg: PipelineConfig = match config {
        Some(path) => read_json(path)?,
        None => PipelineConfig::default(),
    };
    let inputs = PipelineInputs {
        streets: read_json(&streets)?,
        widths: read_json(&widths)?,
        buildings: read_json(&buildings)?,
    };

    let result = Pipeline::new(cfg).run(inputs, &mut timer);
    let doc = result.to_document();
    write_json(&output, &doc)?;
    if let Some(path) = geojson {
        write_geojson(&path, &result)?;
    }

    info!(
        "{} blocks, {} alley fills, {} streets",
        prettyprint_usize(doc.blocks.len()),
        prettyprint_usize(doc.alley_fills.len()),
        prettyprint_usize(doc.streets.len())
    );
    Ok(())
}
