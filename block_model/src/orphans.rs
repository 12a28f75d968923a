//! Buildings on the edge of the map often fall outside every enclosed block, because the street
//! network doesn't close around them. This synthesizes rectangular "edge blocks" for them,
//! bounded by the nearest streets and trimmed by the street footprints.

use blockutil::Timer;
use geom::{difference, intersection, Bounds, Distance, Pt2D, Ring};

use crate::block::round_lot;
use crate::{Building, JoinedPolyline, PipelineConfig, RightOfWay};

// Edge rectangles narrower than this, in meters, aren't worth trying
const MIN_RECT_SIDE: f64 = 10.0;
// Open sides only get a column if buildings stick out this far past the street's edge
const OPEN_SIDE_MARGIN: f64 = 5.0;
// An edge block may touch an existing block, but not overlap it by more than this, in m^2
const MAX_OVERLAP_AREA: f64 = 1.0;

/// A named street reduced to a line along one axis.
#[derive(Clone, Debug)]
struct StreetAxis {
    name: String,
    /// The average x of a north-south street, or z of an east-west one
    position: f64,
    /// The extent along the street's own direction
    min: f64,
    max: f64,
    half_width: f64,
}

/// North-south streets sorted by x, and east-west streets sorted by z.
struct Axes {
    north_south: Vec<StreetAxis>,
    east_west: Vec<StreetAxis>,
}

impl Axes {
    fn new(streets: &[JoinedPolyline], row: &RightOfWay) -> Axes {
        let mut north_south = Vec::new();
        let mut east_west = Vec::new();
        for street in streets {
            let name = match street.name {
                Some(ref name) => name.clone(),
                None => continue,
            };
            let avg = Pt2D::center(street.pl.points());
            let bounds = street.pl.get_bounds();
            let half_width = (row.resolve(Some(&name), street.street_type) / 2.0).inner_meters();
            // Classify by overall extent
            if bounds.height() > bounds.width() {
                north_south.push(StreetAxis {
                    name,
                    position: avg.x(),
                    min: bounds.min_y,
                    max: bounds.max_y,
                    half_width,
                });
            } else {
                east_west.push(StreetAxis {
                    name,
                    position: avg.y(),
                    min: bounds.min_x,
                    max: bounds.max_x,
                    half_width,
                });
            }
        }
        north_south.sort_by(|a, b| a.position.total_cmp(&b.position));
        east_west.sort_by(|a, b| a.position.total_cmp(&b.position));
        Axes {
            north_south,
            east_west,
        }
    }
}

/// Centroids of buildings not covered by any lot. Buildings in the park or outside the orphan
/// region don't count.
pub fn find_orphans(buildings: &[Building], lots: &[Ring], cfg: &PipelineConfig) -> Vec<Pt2D> {
    buildings
        .iter()
        .filter_map(|b| b.centroid())
        .filter(|pt| !cfg.in_park(*pt))
        .filter(|pt| !lots.iter().any(|lot| lot.contains_pt(*pt)))
        .filter(|pt| {
            cfg.orphan_region
                .as_ref()
                .map(|region| region.contains(*pt))
                .unwrap_or(true)
        })
        .collect()
}

/// Single-linkage clustering: a point joins a cluster if it's within `radius` of any member, so
/// chains of nearby points all merge.
pub fn cluster_points(pts: &[Pt2D], radius: Distance) -> Vec<Vec<Pt2D>> {
    let mut visited = vec![false; pts.len()];
    let mut clusters = Vec::new();
    for i in 0..pts.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut cluster = vec![pts[i]];
        let mut changed = true;
        while changed {
            changed = false;
            for j in 0..pts.len() {
                if visited[j] {
                    continue;
                }
                if cluster
                    .iter()
                    .any(|c| c.raw_dist_to(pts[j]) < radius.inner_meters())
                {
                    cluster.push(pts[j]);
                    visited[j] = true;
                    changed = true;
                }
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Everything the synthesizer needs to know about the rest of the pipeline.
pub struct OrphanContext<'a> {
    pub streets: &'a [JoinedPolyline],
    pub row: &'a RightOfWay,
    /// The flat union of every street footprint
    pub street_union: &'a [Ring],
    pub cfg: &'a PipelineConfig,
}

/// Returns new, corner-rounded lots covering orphan buildings. `existing` lots are never
/// overlapped.
pub fn synthesize_edge_blocks(
    ctx: &OrphanContext,
    buildings: &[Building],
    existing: &[Ring],
    timer: &mut Timer,
) -> Vec<Ring> {
    timer.start("synthesize edge blocks");
    let cfg = ctx.cfg;
    let orphans = find_orphans(buildings, existing, cfg);
    let clusters = cluster_points(&orphans, cfg.orphan_cluster_radius);
    timer.note(format!(
        "{} orphan buildings in {} clusters",
        orphans.len(),
        clusters.len()
    ));

    let axes = Axes::new(ctx.streets, ctx.row);
    let clip = cfg.orphan_clip_ring();
    let mut synth = Synthesizer {
        ctx,
        clip,
        existing,
        added: Vec::new(),
    };

    timer.start_iter("cover orphan clusters", clusters.len());
    for cluster in clusters {
        timer.next();
        let before = synth.added.len();
        let names = synth.cover_cluster(&cluster, &axes);
        let num_added = synth.added.len() - before;
        if num_added > 0 {
            debug!(
                "Cluster of {} buildings bounded by {}: {} blocks added",
                cluster.len(),
                names.join(", "),
                num_added
            );
        }
    }

    let added = synth.added;
    timer.note(format!("{} edge blocks added", added.len()));
    timer.stop("synthesize edge blocks");
    added
}

struct Synthesizer<'a, 'b> {
    ctx: &'b OrphanContext<'a>,
    clip: Option<Ring>,
    existing: &'b [Ring],
    added: Vec<Ring>,
}

impl<'a, 'b> Synthesizer<'a, 'b> {
    /// Returns the names of the streets bounding the cluster.
    fn cover_cluster(&mut self, cluster: &[Pt2D], axes: &Axes) -> Vec<String> {
        let cfg = self.ctx.cfg;
        let pad_x = cfg.orphan_search_pad.inner_meters();
        let pad_z = cfg.orphan_search_pad_z.inner_meters();
        let open_pad = cfg.orphan_open_pad.inner_meters();
        let extent = Bounds::from(cluster);

        // North-south streets passing through the cluster
        let relevant: Vec<&StreetAxis> = axes
            .north_south
            .iter()
            .filter(|s| {
                s.position >= extent.min_x - pad_x
                    && s.position <= extent.max_x + pad_x
                    && s.max >= extent.min_y - pad_z
                    && s.min <= extent.max_y + pad_z
            })
            .collect();

        // The nearest east-west streets strictly north (smaller z) and south of every building
        let mut north: Option<&StreetAxis> = None;
        let mut south: Option<&StreetAxis> = None;
        for s in &axes.east_west {
            if s.max < extent.min_x - pad_x || s.min > extent.max_x + pad_x {
                continue;
            }
            if s.position < extent.min_y && north.map(|n| s.position > n.position).unwrap_or(true)
            {
                north = Some(s);
            }
            if s.position > extent.max_y && south.map(|n| s.position < n.position).unwrap_or(true)
            {
                south = Some(s);
            }
        }

        let z_min = match north {
            Some(s) => s.position + s.half_width,
            None => extent.min_y - open_pad,
        };
        let z_max = match south {
            Some(s) => s.position - s.half_width,
            None => extent.max_y + open_pad,
        };

        let mut names: Vec<String> = Vec::new();
        for s in relevant.iter().copied().chain(north).chain(south) {
            if !names.contains(&s.name) {
                names.push(s.name.clone());
            }
        }

        if z_max - z_min < MIN_RECT_SIDE {
            return names;
        }
        for (x_min, x_max) in columns(&extent, &relevant, open_pad) {
            self.try_add(x_min, z_min, x_max, z_max);
        }
        names
    }

    fn try_add(&mut self, x_min: f64, z_min: f64, x_max: f64, z_max: f64) {
        let cfg = self.ctx.cfg;
        if x_max - x_min < MIN_RECT_SIDE || z_max - z_min < MIN_RECT_SIDE {
            return;
        }
        if (x_max - x_min) * (z_max - z_min) < cfg.min_block_area {
            return;
        }
        let rect = match Bounds::from_corners(x_min, z_min, x_max, z_max).get_rectangle() {
            Some(rect) => rect,
            None => return,
        };

        let mut pieces: Vec<Ring> = difference(&[rect], self.ctx.street_union)
            .into_iter()
            .map(|p| p.into_outer())
            .collect();
        if let Some(ref clip) = self.clip {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| intersection(&[piece], &[clip.clone()]))
                .map(|p| p.into_outer())
                .collect();
        }

        for piece in pieces {
            if piece.area() < cfg.min_block_area {
                continue;
            }
            let lot = match round_lot(&piece, cfg) {
                Some(lot) => lot,
                None => continue,
            };
            let center = lot.center();
            if cfg.in_park(center) {
                continue;
            }
            if self.covered(&lot) {
                continue;
            }
            self.added.push(lot);
        }
    }

    /// Is the new lot centered inside, or overlapping, an existing or already added lot?
    fn covered(&self, lot: &Ring) -> bool {
        let center = lot.center();
        self.existing.iter().chain(self.added.iter()).any(|other| {
            if other.contains_pt(center) {
                return true;
            }
            let overlap: f64 = intersection(&[lot.clone()], &[other.clone()])
                .iter()
                .map(|p| p.area())
                .sum();
            overlap > MAX_OVERLAP_AREA
        })
    }
}

/// The x ranges of candidate edge blocks: one between each pair of adjacent north-south streets,
/// plus open-ended ones where buildings stick out past the outermost streets.
fn columns(extent: &Bounds, relevant: &[&StreetAxis], open_pad: f64) -> Vec<(f64, f64)> {
    let mut result = Vec::new();
    let (first, last) = match (relevant.first(), relevant.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            result.push((extent.min_x - open_pad, extent.max_x + open_pad));
            return result;
        }
    };

    let west_edge = first.position - first.half_width;
    if extent.min_x < west_edge - OPEN_SIDE_MARGIN {
        result.push((extent.min_x - open_pad, west_edge));
    }
    for pair in relevant.windows(2) {
        let left = pair[0].position + pair[0].half_width;
        let right = pair[1].position - pair[1].half_width;
        if right - left > MIN_RECT_SIDE {
            result.push((left, right));
        }
    }
    let east_edge = last.position + last.half_width;
    if extent.max_x > east_edge + OPEN_SIDE_MARGIN {
        result.push((east_edge, extent.max_x + open_pad));
    }
    result
}
