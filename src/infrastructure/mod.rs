pub mod core;
pub mod mock;
pub mod observability;
pub mod sentiment;
pub mod stocktwits;

pub use mock::StaticPostSource;
pub use stocktwits::StocktwitsPostSource;
