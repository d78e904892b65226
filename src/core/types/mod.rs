//! Core data types.

mod observation;
mod pose;
mod scan;
mod timestamped;

pub use observation::Observation;
pub use pose::{Point3D, Pose3D};
pub use scan::LaserScan;
pub use timestamped::Timestamped;
