//! A simpler way to find blocks: build a planar graph straight from the street centerlines and
//! trace its faces. It needs every intersection to be detected, so it's less robust than
//! buffering and unioning, but it's handy as a cross-check.

use std::collections::{BTreeMap, BTreeSet};

use blockutil::Timer;
use geom::{Line, Pt2D};

use crate::{StreetSegment, StreetType, TracedBlock, TracedBlocks, TracedMeta};

// Endpoints of differently named streets closer than this are a junction
const ENDPOINT_SNAP: f64 = 10.0;
// Candidate junctions closer than this become one node
const NODE_MERGE: f64 = 12.0;
// How far a node may sit from a street's centerline and still be on it
const ON_STREET_PERP: f64 = 12.0;
const ON_STREET_OVERSHOOT: f64 = 8.0;
const MAX_EDGE_LENGTH: f64 = 250.0;
const MAX_FACE_STEPS: usize = 60;
const MIN_FACE_AREA: f64 = 500.0;
const MAX_FACE_AREA: f64 = 80_000.0;

pub type NodeIndex = usize;

#[derive(Debug)]
pub struct Node {
    pub pt: Pt2D,
    /// Neighbors, sorted by the angle of the edge leaving this node
    pub edges: Vec<NodeIndex>,
}

/// An arena of nodes with mutual, de-duplicated edges. Immutable once built.
pub struct StreetGraph {
    pub nodes: Vec<Node>,
}

impl StreetGraph {
    pub fn new(streets: &[StreetSegment], timer: &mut Timer) -> StreetGraph {
        let named: Vec<(&str, Vec<Pt2D>)> = streets
            .iter()
            .filter(|s| s.street_type != StreetType::Service)
            .filter_map(|s| {
                let name = s.get_name()?;
                Some((name, s.polyline()?.into_points()))
            })
            .collect();

        let candidates = find_candidates(&named);
        let mut nodes: Vec<Node> = merge_candidates(&candidates)
            .into_iter()
            .map(|pt| Node {
                pt,
                edges: Vec::new(),
            })
            .collect();

        // Group by name, preserving first appearance
        let mut by_name: Vec<(&str, Vec<&[Pt2D]>)> = Vec::new();
        for (name, pts) in &named {
            match by_name.iter().position(|(n, _)| *n == *name) {
                Some(idx) => by_name[idx].1.push(pts.as_slice()),
                None => by_name.push((*name, vec![pts.as_slice()])),
            }
        }

        for (_, segments) in by_name {
            let chain = nodes_along_street(&nodes, &segments);
            for pair in chain.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a != b && nodes[a].pt.raw_dist_to(nodes[b].pt) < MAX_EDGE_LENGTH {
                    connect(&mut nodes, a, b);
                }
            }
        }

        for idx in 0..nodes.len() {
            let from = nodes[idx].pt;
            let mut edges = std::mem::take(&mut nodes[idx].edges);
            edges.sort_by(|a, b| {
                edge_angle(from, nodes[*a].pt).total_cmp(&edge_angle(from, nodes[*b].pt))
            });
            nodes[idx].edges = edges;
        }

        let num_edges: usize = nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2;
        timer.note(format!(
            "Street graph: {} candidate junctions, {} nodes, {} edges",
            candidates.len(),
            nodes.len(),
            num_edges
        ));
        StreetGraph { nodes }
    }

    /// For the directed edge u->v, the next edge of the same face leaves v immediately clockwise
    /// from v->u.
    fn next_half_edge(&self, u: NodeIndex, v: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        let edges = &self.nodes[v].edges;
        let back = edges.iter().position(|x| *x == u)?;
        let prev = (back + edges.len() - 1) % edges.len();
        Some((v, edges[prev]))
    }

    /// Every closed walk found by starting from each unused directed edge.
    pub fn trace_faces(&self) -> Vec<Vec<Pt2D>> {
        let mut used: BTreeSet<(NodeIndex, NodeIndex)> = BTreeSet::new();
        let mut faces = Vec::new();
        for (start_node, node) in self.nodes.iter().enumerate() {
            for first_dest in &node.edges {
                let start = (start_node, *first_dest);
                if used.contains(&start) {
                    continue;
                }
                let mut face = Vec::new();
                let mut key = start;
                let mut steps = 0;
                while steps < MAX_FACE_STEPS {
                    if used.contains(&key) {
                        if key == start && steps >= 3 {
                            faces.push(face);
                        }
                        break;
                    }
                    used.insert(key);
                    face.push(self.nodes[key.0].pt);
                    key = match self.next_half_edge(key.0, key.1) {
                        Some(next) => next,
                        None => break,
                    };
                    steps += 1;
                }
            }
        }
        faces
    }
}

fn edge_angle(from: Pt2D, to: Pt2D) -> f64 {
    (to.y() - from.y()).atan2(to.x() - from.x())
}

fn connect(nodes: &mut [Node], a: NodeIndex, b: NodeIndex) {
    if !nodes[a].edges.contains(&b) {
        nodes[a].edges.push(b);
    }
    if !nodes[b].edges.contains(&a) {
        nodes[b].edges.push(a);
    }
}

/// Crossings between differently named streets, then nearby endpoints of differently named
/// streets.
fn find_candidates(named: &[(&str, Vec<Pt2D>)]) -> Vec<Pt2D> {
    let mut candidates = Vec::new();
    for (i, (name1, pts1)) in named.iter().enumerate() {
        for (name2, pts2) in &named[i + 1..] {
            if name1 == name2 {
                continue;
            }
            for pair1 in pts1.windows(2) {
                for pair2 in pts2.windows(2) {
                    if let (Some(l1), Some(l2)) =
                        (Line::new(pair1[0], pair1[1]), Line::new(pair2[0], pair2[1]))
                    {
                        if let Some(pt) = l1.intersection(&l2) {
                            candidates.push(pt);
                        }
                    }
                }
            }
        }
    }

    let mut endpoints = Vec::new();
    for (name, pts) in named {
        endpoints.push((*name, pts[0]));
        endpoints.push((*name, pts[pts.len() - 1]));
    }
    for (i, (name1, pt1)) in endpoints.iter().enumerate() {
        for (name2, pt2) in &endpoints[i + 1..] {
            if name1 != name2 && pt1.raw_dist_to(*pt2) < ENDPOINT_SNAP {
                candidates.push(Pt2D::center(&[*pt1, *pt2]));
            }
        }
    }
    candidates
}

/// Greedy: each unused candidate absorbs every later one close to it, and the node sits at their
/// average.
fn merge_candidates(candidates: &[Pt2D]) -> Vec<Pt2D> {
    let mut used = vec![false; candidates.len()];
    let mut nodes = Vec::new();
    for i in 0..candidates.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut group = vec![candidates[i]];
        for j in (i + 1)..candidates.len() {
            if !used[j] && candidates[i].raw_dist_to(candidates[j]) < NODE_MERGE {
                used[j] = true;
                group.push(candidates[j]);
            }
        }
        nodes.push(Pt2D::center(&group));
    }
    nodes
}

/// The principal axis of a point cloud, from the 2x2 covariance matrix. In radians.
fn principal_axis(pts: &[Pt2D]) -> f64 {
    let c = Pt2D::center(pts);
    let (mut sxx, mut sxz, mut szz) = (0.0, 0.0, 0.0);
    for pt in pts {
        let dx = pt.x() - c.x();
        let dz = pt.y() - c.y();
        sxx += dx * dx;
        sxz += dx * dz;
        szz += dz * dz;
    }
    0.5 * (2.0 * sxz).atan2(sxx - szz)
}

/// Nodes lying on any segment of one street, ordered along the street's principal axis.
fn nodes_along_street(nodes: &[Node], segments: &[&[Pt2D]]) -> Vec<NodeIndex> {
    let all_pts: Vec<Pt2D> = segments.iter().flat_map(|pts| pts.iter().cloned()).collect();
    let angle = principal_axis(&all_pts);
    let (ux, uz) = (angle.cos(), angle.sin());

    // Keyed by node, so each appears once
    let mut on_street: BTreeMap<NodeIndex, f64> = BTreeMap::new();
    for pts in segments {
        for (idx, node) in nodes.iter().enumerate() {
            if on_street.contains_key(&idx) {
                continue;
            }
            let hit = pts.windows(2).any(|pair| {
                let line = match Line::new(pair[0], pair[1]) {
                    Some(line) => line,
                    None => return false,
                };
                let len = line.length().inner_meters();
                if len < 0.1 {
                    return false;
                }
                let (along, perp) = line.project(node.pt);
                perp < ON_STREET_PERP
                    && along >= -ON_STREET_OVERSHOOT
                    && along <= len + ON_STREET_OVERSHOOT
            });
            if hit {
                on_street.insert(idx, node.pt.x() * ux + node.pt.y() * uz);
            }
        }
    }

    let mut sorted: Vec<(NodeIndex, f64)> = on_street.into_iter().collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    sorted.into_iter().map(|(idx, _)| idx).collect()
}

fn signed_area(pts: &[Pt2D]) -> f64 {
    let mut area = 0.0;
    for (i, pt) in pts.iter().enumerate() {
        let next = pts[(i + 1) % pts.len()];
        area += pt.x() * next.y() - next.x() * pt.y();
    }
    area / 2.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Traces blocks directly from street centerlines. Service streets are ignored. Faces are
/// filtered by area and wound with negative signed area.
pub fn trace_faces(streets: &[StreetSegment], timer: &mut Timer) -> TracedBlocks {
    timer.start("trace faces");
    let graph = StreetGraph::new(streets, timer);
    let faces = graph.trace_faces();
    let num_raw = faces.len();

    let blocks: Vec<TracedBlock> = faces
        .into_iter()
        .filter(|face| {
            let area = signed_area(face).abs();
            face.len() >= 3 && area > MIN_FACE_AREA && area < MAX_FACE_AREA
        })
        .map(|mut face| {
            if signed_area(&face) > 0.0 {
                face.reverse();
            }
            face
        })
        .enumerate()
        .map(|(idx, face)| TracedBlock {
            id: format!("block-{:03}", idx),
            points: face
                .into_iter()
                .map(|pt| [round1(pt.x()), round1(pt.y())])
                .collect(),
        })
        .collect();

    for block in &blocks {
        debug!("{}: {} vertices", block.id, block.points.len());
    }
    timer.note(format!("{} raw faces, {} blocks", num_raw, blocks.len()));
    timer.stop("trace faces");

    TracedBlocks {
        meta: TracedMeta {
            source: "computed from street centerlines".to_string(),
            count: blocks.len(),
        },
        blocks,
    }
}
