pub mod nearest;
pub mod postcodes;
pub mod stations;

pub use nearest::{Coord, NearestIndex};
pub use postcodes::{outcode, sector, PostcodeRecord, PostcodeTable};
pub use stations::{annotate_nearest_stations, PostcodeStationRow, StationRecord};
