pub mod config;
pub mod error;
pub mod frequency;
pub mod generator;
pub mod groups;
pub mod history;
pub mod models;
pub mod parser;
pub mod pattern;
pub mod predictive;
pub mod probability;
pub mod rng;
pub mod scoring;
pub mod session;

mod combinations;

pub use error::{CoreError, CoreResult};
pub use history::DrawHistory;
pub use models::{Combination, DrawRecord, Product};
