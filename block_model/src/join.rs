//! Streets arrive as many short fragments. Fragments sharing a name are chained back into
//! continuous polylines here.

use std::collections::BTreeMap;

use blockutil::Timer;
use geom::{Distance, PolyLine, Pt2D};

use crate::{PipelineConfig, StreetSegment, StreetType};

/// One continuous street, or an unnamed path passed through as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinedPolyline {
    pub name: Option<String>,
    pub street_type: StreetType,
    pub pl: PolyLine,
}

/// Groups named fragments by name and chains each group. Within a group, fragments whose ends
/// lie within the snap tolerance are greedily attached to the growing chain, reversing them as
/// needed. The resulting chains are then cleaned up: near-identical duplicate fragments are
/// dropped before chaining, aligned chains separated by a short gap are bridged, short stubs are
/// dropped, and everything is oriented west to east or north to south.
///
/// Unnamed segments are kept, one polyline each, only when `cfg.buffer_unnamed` is set.
pub fn join_segments(
    segments: &[StreetSegment],
    cfg: &PipelineConfig,
    timer: &mut Timer,
) -> Vec<JoinedPolyline> {
    timer.start("join street segments");

    // Group by name, in order of first appearance
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&StreetSegment>> = BTreeMap::new();
    let mut unnamed = Vec::new();
    for segment in segments {
        match segment.get_name() {
            Some(name) => {
                if !groups.contains_key(name) {
                    order.push(name);
                }
                groups.entry(name).or_insert_with(Vec::new).push(segment);
            }
            None => unnamed.push(segment),
        }
    }

    let mut results = Vec::new();
    let (mut raw, mut deduped, mut bridged, mut stubs) = (0, 0, 0, 0);
    for name in order {
        let group = &groups[name];
        raw += group.len();
        let fragments: Vec<Vec<Pt2D>> = group
            .iter()
            .filter_map(|s| s.polyline())
            .map(|pl| pl.into_points())
            .collect();

        let (fragments, num_dupes) = dedupe_fragments(fragments, cfg.snap_tolerance);
        deduped += num_dupes;
        let mut chains = chain_fragments(fragments, cfg.snap_tolerance);
        bridged += bridge_chains(
            &mut chains,
            cfg.bridge_distance,
            cfg.bridge_angle_degrees,
        );

        let num_chains = chains.len();
        for pts in chains {
            let pl = match PolyLine::deduping_new(pts) {
                Ok(pl) => pl,
                Err(_) => {
                    stubs += 1;
                    continue;
                }
            };
            if pl.length() < cfg.min_stub_length {
                stubs += 1;
                continue;
            }
            results.push(JoinedPolyline {
                name: Some(name.to_string()),
                street_type: group[0].street_type,
                pl: orient(pl),
            });
        }
        if num_chains > 1 {
            debug!("{} stays split into {} pieces", name, num_chains);
        }
    }
    let num_named = results.len();

    if cfg.buffer_unnamed {
        for segment in unnamed {
            if let Some(pl) = segment.polyline() {
                results.push(JoinedPolyline {
                    name: None,
                    street_type: segment.street_type,
                    pl,
                });
            }
        }
    }

    timer.note(format!(
        "Joined {} named fragments into {} polylines ({} duplicates dropped, {} gaps bridged, {} stubs dropped), plus {} unnamed paths",
        raw,
        num_named,
        deduped,
        bridged,
        stubs,
        results.len() - num_named
    ));
    timer.stop("join street segments");
    results
}

// Two fragments with the same pair of endpoints (in either direction) are usually the two
// carriageways of a divided street. Keep the one running closer to the origin.
fn dedupe_fragments(fragments: Vec<Vec<Pt2D>>, snap: Distance) -> (Vec<Vec<Pt2D>>, usize) {
    let close = |a: Pt2D, b: Pt2D| a.raw_dist_to(b) <= snap.inner_meters();
    let same_ends = |a: &[Pt2D], b: &[Pt2D]| {
        let (a1, a2) = (a[0], a[a.len() - 1]);
        let (b1, b2) = (b[0], b[b.len() - 1]);
        (close(a1, b1) && close(a2, b2)) || (close(a1, b2) && close(a2, b1))
    };
    let dist_to_origin = |pts: &[Pt2D]| {
        let mid = pts[pts.len() / 2];
        mid.x().hypot(mid.y())
    };

    let mut kept: Vec<Vec<Pt2D>> = Vec::new();
    let mut dropped = 0;
    for frag in fragments {
        match kept.iter_mut().find(|k| same_ends(k.as_slice(), frag.as_slice())) {
            Some(existing) => {
                if dist_to_origin(frag.as_slice()) < dist_to_origin(existing.as_slice()) {
                    *existing = frag;
                }
                dropped += 1;
            }
            None => kept.push(frag),
        }
    }
    (kept, dropped)
}

#[derive(Clone, Copy)]
enum Attach {
    TailToHead,
    TailToTail,
    HeadToTail,
    HeadToHead,
}

impl Attach {
    const ALL: [Attach; 4] = [
        Attach::TailToHead,
        Attach::TailToTail,
        Attach::HeadToTail,
        Attach::HeadToHead,
    ];

    fn gap(self, chain: &[Pt2D], frag: &[Pt2D]) -> f64 {
        let (head, tail) = (chain[0], chain[chain.len() - 1]);
        let (first, last) = (frag[0], frag[frag.len() - 1]);
        match self {
            Attach::TailToHead => tail.raw_dist_to(first),
            Attach::TailToTail => tail.raw_dist_to(last),
            Attach::HeadToTail => head.raw_dist_to(last),
            Attach::HeadToHead => head.raw_dist_to(first),
        }
    }

    // The touching point of the fragment is dropped in favor of the chain's.
    fn apply(self, chain: &mut Vec<Pt2D>, mut frag: Vec<Pt2D>) {
        match self {
            Attach::TailToHead => {
                chain.extend(frag.into_iter().skip(1));
            }
            Attach::TailToTail => {
                frag.reverse();
                chain.extend(frag.into_iter().skip(1));
            }
            Attach::HeadToTail => {
                frag.pop();
                frag.append(chain);
                *chain = frag;
            }
            Attach::HeadToHead => {
                frag.reverse();
                frag.pop();
                frag.append(chain);
                *chain = frag;
            }
        }
    }
}

fn chain_fragments(mut fragments: Vec<Vec<Pt2D>>, snap: Distance) -> Vec<Vec<Pt2D>> {
    let mut chains = Vec::new();
    while !fragments.is_empty() {
        let mut chain = fragments.remove(0);
        loop {
            let mut best: Option<(usize, Attach, f64)> = None;
            for (idx, frag) in fragments.iter().enumerate() {
                for attach in Attach::ALL {
                    let gap = attach.gap(&chain, frag);
                    if gap <= snap.inner_meters()
                        && best.map(|(_, _, best_gap)| gap < best_gap).unwrap_or(true)
                    {
                        best = Some((idx, attach, gap));
                    }
                }
            }
            match best {
                Some((idx, attach, _)) => {
                    let frag = fragments.remove(idx);
                    attach.apply(&mut chain, frag);
                }
                None => break,
            }
        }
        chain.dedup();
        chains.push(chain);
    }
    chains
}

/// The end of a chain, oriented so that travel continues out of it.
struct ChainEnd {
    pt: Pt2D,
    bearing: geom::Angle,
}

fn leaving_end(pts: &[Pt2D], reversed: bool) -> ChainEnd {
    let n = pts.len();
    if reversed {
        ChainEnd {
            pt: pts[0],
            bearing: pts[1].angle_to(pts[0]),
        }
    } else {
        ChainEnd {
            pt: pts[n - 1],
            bearing: pts[n - 2].angle_to(pts[n - 1]),
        }
    }
}

fn entering_end(pts: &[Pt2D], reversed: bool) -> ChainEnd {
    let n = pts.len();
    if reversed {
        ChainEnd {
            pt: pts[n - 1],
            bearing: pts[n - 1].angle_to(pts[n - 2]),
        }
    } else {
        ChainEnd {
            pt: pts[0],
            bearing: pts[0].angle_to(pts[1]),
        }
    }
}

/// Repeatedly joins the closest pair of chains whose facing ends are within `max_dist` and
/// whose directions agree. Returns the number of bridges made.
fn bridge_chains(chains: &mut Vec<Vec<Pt2D>>, max_dist: Distance, max_angle: f64) -> usize {
    let mut bridged = 0;
    loop {
        let mut best: Option<(usize, usize, bool, bool, f64)> = None;
        for i in 0..chains.len() {
            if chains[i].len() < 2 {
                continue;
            }
            for j in (i + 1)..chains.len() {
                if chains[j].len() < 2 {
                    continue;
                }
                for (rev_i, rev_j) in [(false, false), (false, true), (true, false), (true, true)]
                {
                    let from = leaving_end(&chains[i], rev_i);
                    let to = entering_end(&chains[j], rev_j);
                    let dist = from.pt.raw_dist_to(to.pt);
                    if dist < max_dist.inner_meters()
                        && from.bearing.approx_diff_degrees(to.bearing) < max_angle
                        && best.map(|b| dist < b.4).unwrap_or(true)
                    {
                        best = Some((i, j, rev_i, rev_j, dist));
                    }
                }
            }
        }

        let (i, j, rev_i, rev_j, _) = match best {
            Some(b) => b,
            None => return bridged,
        };
        let mut second = chains.remove(j);
        let mut first = chains.remove(i);
        if rev_i {
            first.reverse();
        }
        if rev_j {
            second.reverse();
        }
        first.extend(second);
        first.dedup();
        chains.push(first);
        bridged += 1;
    }
}

/// Mostly horizontal streets run west to east (increasing x); mostly vertical ones run north to
/// south (increasing z).
fn orient(pl: PolyLine) -> PolyLine {
    let backwards = if pl.is_mostly_vertical() {
        pl.last_pt().y() < pl.first_pt().y()
    } else {
        pl.last_pt().x() < pl.first_pt().x()
    };
    if backwards {
        pl.reversed()
    } else {
        pl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::StreetNetwork;

    fn join(streets: serde_json::Value, cfg: &PipelineConfig) -> Vec<JoinedPolyline> {
        let network: StreetNetwork = serde_json::from_value(json!({ "streets": streets })).unwrap();
        join_segments(&network.streets, cfg, &mut Timer::throwaway())
    }

    #[test]
    fn fragments_chain_in_any_direction() {
        let joined = join(
            json!([
                { "name": "Ann Avenue", "type": "residential", "points": [[100, 0], [200, 0]] },
                { "name": "Ann Avenue", "type": "residential", "points": [[-100, 0], [0, 0]] },
                // Reversed, and 3m short of the next fragment
                { "name": "Ann Avenue", "type": "residential", "points": [[97, 0], [50, 0], [3, 0]] },
                { "name": "Lemp Avenue", "type": "secondary", "points": [[50, 100], [50, -100]] }
            ]),
            &PipelineConfig::default(),
        );
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].name.as_deref(), Some("Ann Avenue"));
        assert_eq!(joined[0].pl.first_pt(), Pt2D::new(-100.0, 0.0));
        assert_eq!(joined[0].pl.last_pt(), Pt2D::new(200.0, 0.0));
        assert_eq!(joined[0].street_type, StreetType::Residential);

        // Oriented north to south
        assert_eq!(joined[1].pl.first_pt(), Pt2D::new(50.0, -100.0));
    }

    #[test]
    fn real_gaps_stay_split() {
        let joined = join(
            json!([
                { "name": "Ann Avenue", "points": [[0, 0], [100, 0]] },
                { "name": "Ann Avenue", "points": [[100, 400], [200, 400]] }
            ]),
            &PipelineConfig::default(),
        );
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn aligned_gaps_are_bridged() {
        let joined = join(
            json!([
                { "name": "Ann Avenue", "points": [[0, 0], [100, 0]] },
                { "name": "Ann Avenue", "points": [[130, 2], [230, 2]] }
            ]),
            &PipelineConfig::default(),
        );
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].pl.points().len(), 4);

        // Perpendicular pieces aren't
        let joined = join(
            json!([
                { "name": "Ann Avenue", "points": [[0, 0], [100, 0]] },
                { "name": "Ann Avenue", "points": [[130, 20], [130, 120]] }
            ]),
            &PipelineConfig::default(),
        );
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn duplicates_and_stubs() {
        let joined = join(
            json!([
                // Two carriageways between the same ends; the one nearer the origin wins
                { "name": "Gravois Avenue", "points": [[0, 10], [50, 15], [100, 10]] },
                { "name": "Gravois Avenue", "points": [[100, 11], [50, 5], [0, 11]] },
                { "name": "Tiny Court", "points": [[500, 500], [505, 500]] },
                { "type": "footway", "points": [[0, 0], [3, 3]] }
            ]),
            &PipelineConfig::default(),
        );
        assert_eq!(joined.len(), 2);
        assert!(joined[0].pl.points().contains(&Pt2D::new(50.0, 5.0)));
        assert_eq!(joined[1].name, None);
        assert_eq!(joined[1].street_type, StreetType::Footway);

        let mut cfg = PipelineConfig::default();
        cfg.buffer_unnamed = false;
        let joined = join(
            json!([{ "type": "footway", "points": [[0, 0], [3, 3]] }]),
            &cfg,
        );
        assert!(joined.is_empty());
    }
}
