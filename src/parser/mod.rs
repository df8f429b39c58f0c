pub mod aggregator;
pub mod decoder;
pub mod fields;
pub mod reader;
pub mod sentence;

pub use aggregator::*;
pub use decoder::*;
pub use fields::*;
pub use reader::*;
pub use sentence::*;
