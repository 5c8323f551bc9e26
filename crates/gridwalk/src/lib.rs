//! Grid and graph traversal toolkit for small puzzle inputs.
//!
//! The core is a character grid with bounds and neighbor queries, and three
//! traversals over it: flood-fill regions with perimeter and side counts,
//! trailhead reachability over a height map, and a patrolling walker with
//! loop detection. Smaller puzzle solvers (page ordering, calibration,
//! antennas, word search, disk compaction, stones) live alongside them.

pub mod antenna;
pub mod calibration;
pub mod disk;
pub mod error;
pub mod grid;
pub mod ordering;
pub mod patrol;
pub mod region;
pub mod stones;
pub mod trail;
pub mod wordsearch;

// Re-export main types
pub use calibration::{Equation, Operator};
pub use disk::DiskMap;
pub use error::{Error, Result};
pub use grid::{Direction, Grid, Position};
pub use ordering::{Manual, RuleSet};
pub use patrol::{PatrolConfig, PatrolOutcome, PatrolState};
pub use region::Region;
pub use trail::HeightGraph;
