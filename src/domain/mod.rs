// Domain-specific error types
pub mod errors;

// Signed word lexicon
pub mod lexicon;

// Port interfaces
pub mod ports;

// Posts, labels and aggregate results
pub mod sentiment;

// Ticker normalization
pub mod ticker;
