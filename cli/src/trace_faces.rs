use anyhow::Result;

use block_model::{trace_faces, StreetNetwork};
use blockutil::{read_json, write_json, Timer};

pub fn run(streets: String, output: String) -> Result<()> {
    let mut timer = Timer::new("trace-faces");
    let network: StreetNetwork = read_json(&streets)?;
    let blocks = trace_faces(&network.validate().streets, &mut timer);
    write_json(&output, &blocks)?;
    Ok(())
}
