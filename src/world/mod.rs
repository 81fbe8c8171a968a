// world/ - Scene geometry
//
// Bounding regions and static prop placement.
// No per-frame state lives here.

mod bounds;
mod scenery;

pub use bounds::*;
pub use scenery::*;
