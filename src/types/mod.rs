pub mod fix;
pub mod log;
pub mod message;

pub use fix::*;
pub use log::*;
pub use message::*;
