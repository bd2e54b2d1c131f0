pub mod car;
pub mod load;
pub mod train;

pub use car::TrainCar;
pub use load::ProductLoad;
pub use train::{CursorMove, ManifestEntry, ProductSummary, Train};
