use blockutil::Timer;
use geom::{buffer_polyline, Distance, Ring};

use crate::{JoinedPolyline, PipelineConfig, RightOfWay};

/// The physical footprint of one street.
pub struct StreetBuffer {
    pub name: Option<String>,
    pub is_alley: bool,
    pub rings: Vec<Ring>,
}

/// How far to extend each end of a polyline before buffering, so that T and L intersections
/// overlap fully. Short streets get a longer extension, never more than half their length.
pub fn extension_length(length: Distance) -> Distance {
    let base = if length < Distance::meters(400.0) {
        Distance::meters(100.0)
    } else {
        Distance::meters(20.0)
    };
    base.min(length * 0.5)
}

/// Extends and thickens every street by half its right-of-way. Degenerate results are skipped.
pub fn buffer_streets(
    streets: &[JoinedPolyline],
    row: &RightOfWay,
    cfg: &PipelineConfig,
    timer: &mut Timer,
) -> Vec<StreetBuffer> {
    timer.start("buffer streets");
    let mut buffers = Vec::new();
    for street in streets {
        let width = row.resolve(street.name.as_deref(), street.street_type);
        let extended = street
            .pl
            .extend_endpoints(extension_length(street.pl.length()));
        let rings = buffer_polyline(extended.points(), width / 2.0);
        if rings.is_empty() {
            timer.warn(format!(
                "Buffering {:?} with width {} produced nothing",
                street.name, width
            ));
            continue;
        }
        buffers.push(StreetBuffer {
            name: street.name.clone(),
            is_alley: cfg.is_alley(street.name.as_deref()),
            rings,
        });
    }

    let num_alleys = buffers.iter().filter(|b| b.is_alley).count();
    timer.note(format!(
        "{} buffered streets ({} alleys, {} others)",
        buffers.len(),
        num_alleys,
        buffers.len() - num_alleys
    ));
    timer.stop("buffer streets");
    buffers
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::{PolyLine, Pt2D};

    use crate::StreetType;

    #[test]
    fn extension_by_length() {
        assert_eq!(
            extension_length(Distance::meters(50.0)),
            Distance::meters(25.0)
        );
        assert_eq!(
            extension_length(Distance::meters(399.0)),
            Distance::meters(100.0)
        );
        assert_eq!(
            extension_length(Distance::meters(1000.0)),
            Distance::meters(20.0)
        );
    }

    #[test]
    fn alleys_are_tagged() {
        let street = |name: &str| JoinedPolyline {
            name: Some(name.to_string()),
            street_type: StreetType::Service,
            pl: PolyLine::must_new(vec![Pt2D::new(0.0, 0.0), Pt2D::new(1000.0, 0.0)]),
        };
        let buffers = buffer_streets(
            &[street("Hickory Lane"), street("Shenandoah Avenue")],
            &RightOfWay::without_table(),
            &PipelineConfig::default(),
            &mut Timer::throwaway(),
        );
        assert_eq!(buffers.len(), 2);
        assert!(buffers[0].is_alley);
        assert!(!buffers[1].is_alley);
        // Not in the override table, so the service default applies. 1000m plus 20m extensions
        // plus 5m square caps on each end, 10m wide
        let area: f64 = buffers[1].rings.iter().map(|r| r.area()).sum();
        assert!((area - 1050.0 * 10.0).abs() < 1.0);
    }
}
