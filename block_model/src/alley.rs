use blockutil::Timer;
use geom::{difference, union_all_flat, Ring};

use crate::documents::ring_record;
use crate::{AlleyFillRecord, PipelineConfig, StreetBuffer};

/// Alley pavement that isn't already part of some other street's footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct AlleyFill {
    pub name: String,
    pub polygon: Ring,
}

impl AlleyFill {
    pub fn to_record(&self) -> AlleyFillRecord {
        AlleyFillRecord {
            name: self.name.clone(),
            polygon: ring_record(&self.polygon),
        }
    }
}

/// The flat union of every footprint that isn't an alley.
pub fn non_alley_union(buffers: &[StreetBuffer]) -> Vec<Ring> {
    union_all_flat(
        buffers
            .iter()
            .filter(|b| !b.is_alley)
            .map(|b| b.rings.clone())
            .collect(),
    )
}

/// Subtracts the union of every non-alley footprint from each alley's footprint. Slivers are
/// dropped.
pub fn alley_fills(
    buffers: &[StreetBuffer],
    cfg: &PipelineConfig,
    timer: &mut Timer,
) -> Vec<AlleyFill> {
    timer.start("compute alley fills");
    let others = non_alley_union(buffers);

    let mut fills = Vec::new();
    let mut slivers = 0;
    for alley in buffers.iter().filter(|b| b.is_alley) {
        let name = alley.name.clone().unwrap_or_default();
        for piece in difference(&alley.rings, &others) {
            if piece.area() <= cfg.alley_sliver_area {
                slivers += 1;
                continue;
            }
            // The output format has no room for holes. A hole here means some other street sits
            // entirely inside the alley's footprint, so filling the outer ring would cover it.
            if !piece.holes().is_empty() {
                timer.warn(format!(
                    "Skipping a piece of {} that surrounds another street",
                    name
                ));
                continue;
            }
            fills.push(AlleyFill {
                name: name.clone(),
                polygon: piece.into_outer(),
            });
        }
    }

    timer.note(format!(
        "{} alley fills ({} slivers dropped)",
        fills.len(),
        slivers
    ));
    timer.stop("compute alley fills");
    fills
}
