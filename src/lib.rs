pub mod chart;
pub mod compliance;
pub mod measurement;
pub mod normalizer;
pub mod pipeline;
pub mod settings;
pub mod stress;
