//! Clipping against axis-aligned rectangles, in plain floating point. Polygons use
//! Sutherland-Hodgman, polylines use Cohen-Sutherland.

use crate::{Bounds, Pt2D};

/// Clips a polygon against one linear boundary. `inside` classifies points and `intersect`
/// finds where an edge crosses the boundary. The input may be open or closed; the output is
/// open, and empty when fewer than 3 points survive.
pub fn clip_polygon_to_half_plane<I, X>(pts: &[Pt2D], inside: I, intersect: X) -> Vec<Pt2D>
where
    I: Fn(Pt2D) -> bool,
    X: Fn(Pt2D, Pt2D) -> Pt2D,
{
    let pts = strip_closing_pt(pts);
    if pts.len() < 3 {
        return Vec::new();
    }

    let mut out = Vec::new();
    for i in 0..pts.len() {
        let cur = pts[i];
        let prev = pts[(i + pts.len() - 1) % pts.len()];
        match (inside(prev), inside(cur)) {
            (true, true) => out.push(cur),
            (true, false) => out.push(intersect(prev, cur)),
            (false, true) => {
                out.push(intersect(prev, cur));
                out.push(cur);
            }
            (false, false) => {}
        }
    }
    out.dedup();
    if out.len() < 3 {
        return Vec::new();
    }
    out
}

/// Four passes of `clip_polygon_to_half_plane`, one per side of the rectangle.
pub fn clip_polygon_to_rect(pts: &[Pt2D], rect: &Bounds) -> Vec<Pt2D> {
    let (min_x, max_x, min_y, max_y) = (rect.min_x, rect.max_x, rect.min_y, rect.max_y);
    let at_x = |x: f64| {
        move |a: Pt2D, b: Pt2D| {
            let t = (x - a.x()) / (b.x() - a.x());
            Pt2D::new(x, a.y() + t * (b.y() - a.y()))
        }
    };
    let at_y = |y: f64| {
        move |a: Pt2D, b: Pt2D| {
            let t = (y - a.y()) / (b.y() - a.y());
            Pt2D::new(a.x() + t * (b.x() - a.x()), y)
        }
    };

    let mut result = clip_polygon_to_half_plane(pts, |p| p.x() >= min_x, at_x(min_x));
    result = clip_polygon_to_half_plane(&result, |p| p.x() <= max_x, at_x(max_x));
    result = clip_polygon_to_half_plane(&result, |p| p.y() >= min_y, at_y(min_y));
    clip_polygon_to_half_plane(&result, |p| p.y() <= max_y, at_y(max_y))
}

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BELOW: u8 = 4;
const ABOVE: u8 = 8;

fn outcode(pt: Pt2D, rect: &Bounds) -> u8 {
    let mut code = INSIDE;
    if pt.x() < rect.min_x {
        code |= LEFT;
    } else if pt.x() > rect.max_x {
        code |= RIGHT;
    }
    if pt.y() < rect.min_y {
        code |= BELOW;
    } else if pt.y() > rect.max_y {
        code |= ABOVE;
    }
    code
}

/// Cohen-Sutherland for one segment. None if it's entirely outside.
fn clip_segment(mut p0: Pt2D, mut p1: Pt2D, rect: &Bounds) -> Option<(Pt2D, Pt2D)> {
    let mut c0 = outcode(p0, rect);
    let mut c1 = outcode(p1, rect);
    loop {
        if c0 | c1 == INSIDE {
            return Some((p0, p1));
        }
        if c0 & c1 != INSIDE {
            return None;
        }
        let c_out = if c0 != INSIDE { c0 } else { c1 };
        let (x0, y0, x1, y1) = (p0.x(), p0.y(), p1.x(), p1.y());
        let pt = if c_out & BELOW != 0 {
            Pt2D::new(x0 + (x1 - x0) * (rect.min_y - y0) / (y1 - y0), rect.min_y)
        } else if c_out & ABOVE != 0 {
            Pt2D::new(x0 + (x1 - x0) * (rect.max_y - y0) / (y1 - y0), rect.max_y)
        } else if c_out & RIGHT != 0 {
            Pt2D::new(rect.max_x, y0 + (y1 - y0) * (rect.max_x - x0) / (x1 - x0))
        } else {
            Pt2D::new(rect.min_x, y0 + (y1 - y0) * (rect.min_x - x0) / (x1 - x0))
        };
        if c_out == c0 {
            p0 = pt;
            c0 = outcode(p0, rect);
        } else {
            p1 = pt;
            c1 = outcode(p1, rect);
        }
    }
}

/// Clips every segment, then stitches consecutive surviving segments back together. A polyline
/// that leaves and re-enters the rectangle yields several pieces.
pub fn clip_polyline_to_rect(pts: &[Pt2D], rect: &Bounds) -> Vec<Vec<Pt2D>> {
    let mut pieces = Vec::new();
    let mut current: Option<Vec<Pt2D>> = None;
    for pair in pts.windows(2) {
        match clip_segment(pair[0], pair[1], rect) {
            Some((p0, p1)) => {
                if let Some(ref mut piece) = current {
                    if *piece.last().unwrap() == p0 {
                        piece.push(p1);
                        continue;
                    }
                    pieces.push(std::mem::take(piece));
                }
                current = Some(vec![p0, p1]);
            }
            None => {
                if let Some(piece) = current.take() {
                    pieces.push(piece);
                }
            }
        }
    }
    if let Some(piece) = current {
        pieces.push(piece);
    }
    for piece in &mut pieces {
        piece.dedup();
    }
    pieces.retain(|piece| piece.len() >= 2);
    pieces
}

fn strip_closing_pt(pts: &[Pt2D]) -> &[Pt2D] {
    if pts.len() >= 2 && pts[0] == pts[pts.len() - 1] {
        &pts[..pts.len() - 1]
    } else {
        pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ring;

    fn square() -> Vec<Pt2D> {
        vec![
            Pt2D::new(0.0, 0.0),
            Pt2D::new(100.0, 0.0),
            Pt2D::new(100.0, 100.0),
            Pt2D::new(0.0, 100.0),
        ]
    }

    fn area(pts: Vec<Pt2D>) -> f64 {
        Ring::deduping_new(pts).unwrap().area()
    }

    #[test]
    fn clip_square_to_itself() {
        let rect = Bounds::from_corners(0.0, 0.0, 100.0, 100.0);
        let clipped = clip_polygon_to_rect(&square(), &rect);
        assert_eq!(clipped, square());
    }

    #[test]
    fn clip_square_in_half() {
        let clipped = clip_polygon_to_half_plane(
            &square(),
            |p| p.x() <= 50.0,
            |a, b| {
                let t = (50.0 - a.x()) / (b.x() - a.x());
                Pt2D::new(50.0, a.y() + t * (b.y() - a.y()))
            },
        );
        assert!((area(clipped) - 5000.0).abs() < 0.01);
    }

    #[test]
    fn clip_square_to_offset_rect() {
        let rect = Bounds::from_corners(50.0, 50.0, 200.0, 200.0);
        assert!((area(clip_polygon_to_rect(&square(), &rect)) - 2500.0).abs() < 0.01);

        let disjoint = Bounds::from_corners(500.0, 500.0, 600.0, 600.0);
        assert!(clip_polygon_to_rect(&square(), &disjoint).is_empty());
    }

    #[test]
    fn polyline_reentering_rect() {
        let rect = Bounds::from_corners(0.0, 0.0, 10.0, 10.0);
        let pts = vec![
            Pt2D::new(-5.0, 5.0),
            Pt2D::new(5.0, 5.0),
            Pt2D::new(5.0, 20.0),
            Pt2D::new(8.0, 20.0),
            Pt2D::new(8.0, 5.0),
        ];
        let pieces = clip_polyline_to_rect(&pts, &rect);
        assert_eq!(
            pieces,
            vec![
                vec![Pt2D::new(0.0, 5.0), Pt2D::new(5.0, 5.0), Pt2D::new(5.0, 10.0)],
                vec![Pt2D::new(8.0, 10.0), Pt2D::new(8.0, 5.0)],
            ]
        );
    }

    #[test]
    fn polyline_fully_outside() {
        let rect = Bounds::from_corners(0.0, 0.0, 10.0, 10.0);
        let pts = vec![Pt2D::new(20.0, 0.0), Pt2D::new(20.0, 10.0)];
        assert!(clip_polyline_to_rect(&pts, &rect).is_empty());
    }
}
