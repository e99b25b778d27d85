pub mod analysis;
pub mod binner;
pub mod error;
pub mod grid_spec;
pub mod ranker;
pub mod recoverer;
