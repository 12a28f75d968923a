use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use geom::{Angle, Bounds, Distance, Pt2D, Ring};

/// Every tunable of the pipeline. Any field missing from a config file takes its default.
///
/// Rectangles (`core_bounds`, `orphan_region`, `viewport`) use `min_x`/`min_y`/`max_x`/`max_y`,
/// where y is the second coordinate (z in the input documents).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fragment endpoints this close are chained together.
    pub snap_tolerance: Distance,
    /// Chains of the same street whose facing ends are this close, and whose bearings agree
    /// within `bridge_angle_degrees`, are bridged.
    pub bridge_distance: Distance,
    pub bridge_angle_degrees: f64,
    /// Joined chains shorter than this are dropped.
    pub min_stub_length: Distance,
    /// Also buffer segments without a name, using their type's width.
    pub buffer_unnamed: bool,

    /// In m^2
    pub min_block_area: f64,
    pub corner_round: Distance,
    pub sidewalk_width: Distance,

    pub alley_names: BTreeSet<String>,
    /// Alley fill pieces smaller than this (in m^2) are slivers and get dropped.
    pub alley_sliver_area: f64,

    pub orphan_cluster_radius: Distance,
    /// How far an edge block extends past buildings on a side with no bounding street.
    pub orphan_open_pad: Distance,
    /// Streets this far outside a cluster's extent can still bound it.
    pub orphan_search_pad: Distance,
    pub orphan_search_pad_z: Distance,
    /// Only orphan buildings inside this rectangle get edge blocks.
    pub orphan_region: Option<Bounds>,
    /// Edge blocks are trimmed to this polygon.
    pub orphan_clip: Option<Vec<[f64; 2]>>,

    pub park: Option<ParkConfig>,
    /// Holes centered outside this rectangle aren't blocks.
    pub core_bounds: Option<Bounds>,
    /// The border and output streets are clipped to this rectangle.
    pub viewport: Option<Bounds>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            snap_tolerance: Distance::meters(8.0),
            bridge_distance: Distance::meters(50.0),
            bridge_angle_degrees: 45.0,
            min_stub_length: Distance::meters(15.0),
            buffer_unnamed: true,

            min_block_area: 800.0,
            corner_round: Distance::meters(3.0),
            sidewalk_width: Distance::meters(2.0),

            alley_names: ["Mississippi Alley", "Hickory Lane", "Rutger Lane"]
                .iter()
                .map(|x| x.to_string())
                .collect(),
            alley_sliver_area: 10.0,

            orphan_cluster_radius: Distance::meters(120.0),
            orphan_open_pad: Distance::meters(30.0),
            orphan_search_pad: Distance::meters(80.0),
            orphan_search_pad_z: Distance::meters(50.0),
            orphan_region: None,
            orphan_clip: None,

            park: Some(ParkConfig::default()),
            core_bounds: None,
            viewport: None,
        }
    }
}

impl PipelineConfig {
    pub fn is_alley(&self, name: Option<&str>) -> bool {
        name.map(|n| self.alley_names.contains(n)).unwrap_or(false)
    }

    pub fn in_park(&self, pt: Pt2D) -> bool {
        self.park.as_ref().map(|p| p.contains(pt)).unwrap_or(false)
    }

    pub fn orphan_clip_ring(&self) -> Option<Ring> {
        let pts = self.orphan_clip.as_ref()?;
        match Ring::deduping_new(pts.iter().map(|pt| Pt2D::from(*pt)).collect()) {
            Ok(ring) => Some(ring),
            Err(err) => {
                warn!("Ignoring orphan_clip: {}", err);
                None
            }
        }
    }
}

/// A square park aligned to the street grid, which is skewed from the coordinate axes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    pub center: [f64; 2],
    pub grid_angle_degrees: f64,
    /// Holes and buildings centered within this half-size are part of the park.
    pub exclusion_half_extent: f64,
    /// Half the side of the park's own lot.
    pub lot_half_size: f64,
    pub corner_radius: f64,
    pub corner_segments: usize,
    pub sidewalk_width: Distance,
}

impl Default for ParkConfig {
    fn default() -> Self {
        ParkConfig {
            center: [0.0, 0.0],
            grid_angle_degrees: 9.2,
            exclusion_half_extent: 185.0,
            lot_half_size: 175.0,
            corner_radius: 4.0,
            corner_segments: 8,
            sidewalk_width: Distance::meters(4.0),
        }
    }
}

impl ParkConfig {
    fn center(&self) -> Pt2D {
        Pt2D::from(self.center)
    }

    /// Rotates the point into the grid's frame and compares against the exclusion half-extent.
    pub fn contains(&self, pt: Pt2D) -> bool {
        let center = self.center();
        let local = Pt2D::new(pt.x() - center.x(), pt.y() - center.y())
            .rotate_around_origin(Angle::degrees(-self.grid_angle_degrees));
        local.x().abs() < self.exclusion_half_extent && local.y().abs() < self.exclusion_half_extent
    }

    /// The park's own lot: a square with rounded corners, rotated onto the grid.
    pub fn lot(&self) -> Option<Ring> {
        let half = self.lot_half_size;
        let r = self.corner_radius.min(half);
        let segs = self.corner_segments.max(1);

        let mut pts = Vec::new();
        // Each corner: the center of its arc and the starting angle
        let corners = [
            (half - r, -half + r, -90.0),
            (half - r, half - r, 0.0),
            (-half + r, half - r, 90.0),
            (-half + r, -half + r, 180.0),
        ];
        for (cx, cy, start) in corners {
            for i in 0..=segs {
                let theta = Angle::degrees(start + 90.0 * (i as f64) / (segs as f64));
                let (sin, cos) = theta.normalized_radians().sin_cos();
                pts.push(Pt2D::new(cx + r * cos, cy + r * sin));
            }
        }

        let center = self.center();
        let rotation = Angle::degrees(self.grid_angle_degrees);
        let pts = pts
            .into_iter()
            .map(|pt| {
                let rotated = pt.rotate_around_origin(rotation);
                Pt2D::new(rotated.x() + center.x(), rotated.y() + center.y())
            })
            .collect();
        Ring::deduping_new(pts).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_file() {
        let cfg: PipelineConfig = serde_json::from_value(json!({
            "min_block_area": 500.0,
            "park": null,
            "viewport": { "min_x": -10.0, "min_y": -10.0, "max_x": 10.0, "max_y": 10.0 }
        }))
        .unwrap();
        assert_eq!(cfg.min_block_area, 500.0);
        assert!(cfg.park.is_none());
        assert_eq!(cfg.viewport.as_ref().unwrap().width(), 20.0);
        assert_eq!(cfg.snap_tolerance, Distance::meters(8.0));
        assert!(cfg.is_alley(Some("Hickory Lane")));
        assert!(!cfg.is_alley(None));
    }

    #[test]
    fn park_exclusion_is_rotated() {
        let park = ParkConfig::default();
        assert!(park.contains(Pt2D::new(0.0, 0.0)));
        assert!(park.contains(Pt2D::new(180.0, 0.0)));
        // On the axis, 190 is past the half-extent no matter the rotation
        assert!(!park.contains(Pt2D::new(190.0, 0.0)));
        // The corner of the unrotated square is outside once the grid is skewed
        assert!(!park.contains(Pt2D::new(-180.0, 180.0)));
    }

    #[test]
    fn park_lot() {
        let park = ParkConfig::default();
        let lot = park.lot().unwrap();
        // 8 segments per corner means 9 points per corner, 36 distinct
        assert_eq!(lot.open_points().len(), 36);
        let square = 350.0 * 350.0;
        let corner_loss = 4.0 * 16.0 - std::f64::consts::PI * 16.0;
        assert!((lot.area() - (square - corner_loss)).abs() < 5.0);
        assert!(lot.is_simple());
        assert_eq!(lot.center(), Pt2D::new(0.0, 0.0));
    }
}
