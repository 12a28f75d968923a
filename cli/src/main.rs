//! Command-line tools for deriving city blocks from a street network.

#[macro_use]
extern crate log;

mod generate_block_shapes;
mod trace_faces;

use anyhow::Result;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "blockcli", about = "Derives city blocks from street centerlines")]
enum Command {
    /// Buffers every street by its right-of-way, unions the footprints, and turns the enclosed
    /// voids into blocks with sidewalks. Also produces alley fills and edge blocks for buildings
    /// that no enclosed block covers.
    GenerateBlockShapes {
        /// The path to a JSON street network
        #[structopt(long)]
        streets: String,
        /// The path to a JSON table of right-of-way widths by street name
        #[structopt(long)]
        widths: String,
        /// The path to a JSON list of building footprints
        #[structopt(long)]
        buildings: String,
        /// The path to write the block shapes document
        #[structopt(long)]
        output: String,
        /// The path to a JSON file overriding some pipeline settings. Anything missing takes the
        /// default.
        #[structopt(long)]
        config: Option<String>,
        /// Also write a GeoJSON file with every output polygon, for debugging
        #[structopt(long)]
        geojson: Option<String>,
    },
    /// Traces blocks directly from the planar graph formed by street centerlines. Simpler but
    /// less robust than generate-block-shapes.
    TraceFaces {
        /// The path to a JSON street network
        #[structopt(long)]
        streets: String,
        /// The path to write the blocks document
        #[structopt(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    blockutil::logger::setup();

    match Command::from_args() {
        Command::GenerateBlockShapes {
            streets,
            widths,
            buildings,
            output,
            config,
            geojson,
        } => generate_block_shapes::run(streets, widths, buildings, output, config, geojson)?,
        Command::TraceFaces { streets, output } => trace_faces::run(streets, output)?,
    }
    Ok(())
}
