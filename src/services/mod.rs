pub mod classifier;
pub mod recommendations;
pub mod scorer;
pub mod weights;

pub use recommendations::Recommender;
