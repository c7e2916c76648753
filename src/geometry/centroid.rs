//! Polygon area and centroid via the shoelace formula
//!
//! Both operations are total: degenerate input (fewer than three points,
//! collinear points, zero area) degrades to an arithmetic mean instead of
//! failing, so one bad outline never aborts a whole dataset.

use super::{Point, PointSequence};

/// Absolute areas below this are treated as zero
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-9;

/// Area and centroid of one point sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaCentroid {
    /// Absolute enclosed area, 0 for degenerate input
    pub area: f64,
    pub centroid: Point,
}

/// Where an entity's center came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CenterSource {
    /// Centroid of the largest positive-area sequence
    Polygon { index: usize, area: f64 },
    /// Every sequence was degenerate
    Fallback,
    /// There were no sequences at all
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterEstimate {
    pub center: Point,
    pub source: CenterSource,
}

impl CenterEstimate {
    pub fn is_fallback(&self) -> bool {
        !matches!(self.source, CenterSource::Polygon { .. })
    }
}

/// Compute the area and area-weighted centroid of a polygon
///
/// # Algorithm
/// 1. Fewer than 3 points: area 0, centroid is the mean (origin if empty)
/// 2. Close the ring locally if first != last
/// 3. Shoelace: accumulate `cross = x_i*y_{i+1} - x_{i+1}*y_i` plus the
///    centroid numerators `(x_i + x_{i+1}) * cross`, `(y_i + y_{i+1}) * cross`
/// 4. Near-zero area: area 0, centroid is the mean of the ring without its
///    closing point
pub fn polygon_area_and_centroid(points: &[Point]) -> AreaCentroid {
    if points.len() < 3 {
        return AreaCentroid {
            area: 0.0,
            centroid: Point::mean(points).unwrap_or(Point::ORIGIN),
        };
    }

    let mut ring = points.to_vec();
    if ring.first() != ring.last() {
        ring.push(points[0]);
    }

    let mut area_sum = 0.0;
    let mut cx_sum = 0.0;
    let mut cy_sum = 0.0;

    for pair in ring.windows(2) {
        let (p, q) = (pair[0], pair[1]);
        let cross = p.x * q.y - q.x * p.y;
        area_sum += cross;
        cx_sum += (p.x + q.x) * cross;
        cy_sum += (p.y + q.y) * cross;
    }

    let signed_area = 0.5 * area_sum;
    let abs_area = signed_area.abs();

    if abs_area < DEGENERATE_AREA_EPSILON {
        let distinct = &ring[..ring.len() - 1];
        return AreaCentroid {
            area: 0.0,
            centroid: Point::mean(distinct).unwrap_or(Point::ORIGIN),
        };
    }

    AreaCentroid {
        area: abs_area,
        centroid: Point::new(
            cx_sum / (6.0 * signed_area),
            cy_sum / (6.0 * signed_area),
        ),
    }
}

/// Pick a representative center for an entity made of several outlines
///
/// The sequence with the strictly largest area wins; on ties the first one
/// seen is kept. When no sequence has positive area the mean of the last
/// examined sequence is used, and with no sequences at all the origin.
pub fn best_centroid(sequences: &[PointSequence]) -> CenterEstimate {
    let mut largest_area = 0.0;
    let mut best: Option<(usize, Point)> = None;

    for (index, sequence) in sequences.iter().enumerate() {
        let result = polygon_area_and_centroid(sequence.points());
        if result.area > largest_area {
            largest_area = result.area;
            best = Some((index, result.centroid));
        }
    }

    if let Some((index, centroid)) = best {
        return CenterEstimate {
            center: centroid,
            source: CenterSource::Polygon {
                index,
                area: largest_area,
            },
        };
    }

    match sequences.last() {
        Some(last) => CenterEstimate {
            center: Point::mean(last.points()).unwrap_or(Point::ORIGIN),
            source: CenterSource::Fallback,
        },
        None => CenterEstimate {
            center: Point::ORIGIN,
            source: CenterSource::Default,
        },
    }
}
