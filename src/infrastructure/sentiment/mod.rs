pub mod vader;

pub use vader::VaderValence;
