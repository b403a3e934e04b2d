//! Minimum-area rectangle geometry
//!
//! Provides the rotating-calipers search used by the skew estimator to
//! orient the bounding rectangle of a foreground point set.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

/// An arbitrarily oriented rectangle enclosing a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    /// Extent along the rectangle edge chosen by the calipers (pixels)
    pub width: f64,
    /// Extent perpendicular to the chosen edge (pixels)
    pub height: f64,
    /// Direction of the chosen edge, degrees in (-90, 90], measured in
    /// image coordinates (x right, y down)
    pub angle_deg: f64,
}

/// Compute the minimum-area bounding rectangle of a point set.
///
/// Builds the convex hull, then tests every hull edge as a candidate
/// rectangle side. The minimal orientation of the optimal rectangle is
/// always aligned with some hull edge, so the search is exhaustive.
///
/// Ties in the area comparison resolve to the first hull edge examined
/// (strict less-than), which makes the result deterministic for a fixed
/// point set.
///
/// Returns `None` when the hull degenerates below two distinct points.
pub fn min_area_rect(points: &[Point<i32>]) -> Option<OrientedRect> {
    let hull = convex_hull(points.to_vec());
    if hull.len() < 2 {
        return None;
    }

    let mut best: Option<(f64, OrientedRect)> = None;

    for i in 0..hull.len() {
        let p = hull[i];
        let q = hull[(i + 1) % hull.len()];
        let ex = (q.x - p.x) as f64;
        let ey = (q.y - p.y) as f64;
        let len = (ex * ex + ey * ey).sqrt();
        if len == 0.0 {
            continue;
        }

        // Unit direction of the edge and its perpendicular.
        let ux = ex / len;
        let uy = ey / len;

        let mut min_u = f64::INFINITY;
        let mut max_u = f64::NEG_INFINITY;
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;

        for pt in &hull {
            let x = pt.x as f64;
            let y = pt.y as f64;
            let proj_u = x * ux + y * uy;
            let proj_v = -x * uy + y * ux;
            min_u = min_u.min(proj_u);
            max_u = max_u.max(proj_u);
            min_v = min_v.min(proj_v);
            max_v = max_v.max(proj_v);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        let area = width * height;

        if best.map_or(true, |(best_area, _)| area < best_area) {
            let mut angle_deg = uy.atan2(ux).to_degrees();
            // Edges are undirected: fold into (-90, 90].
            if angle_deg <= -90.0 {
                angle_deg += 180.0;
            } else if angle_deg > 90.0 {
                angle_deg -= 180.0;
            }
            best = Some((
                area,
                OrientedRect {
                    width,
                    height,
                    angle_deg,
                },
            ));
        }
    }

    best.map(|(_, rect)| rect)
}
