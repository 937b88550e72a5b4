pub mod aggregator;
pub mod bootstrap;
pub mod classifier;
pub mod pipeline;
pub mod result_builder;
