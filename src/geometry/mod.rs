pub mod centroid;
pub mod point;

pub use centroid::{
    AreaCentroid, CenterEstimate, CenterSource, DEGENERATE_AREA_EPSILON, best_centroid,
    polygon_area_and_centroid,
};
pub use point::{Point, PointSequence};
