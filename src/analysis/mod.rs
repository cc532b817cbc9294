pub mod geometry;
pub mod contacts;
pub mod clusters;
pub mod nematic;
pub mod cavity;
