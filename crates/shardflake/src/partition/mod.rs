mod calendar;
mod config;
mod partitioner;
mod quantity;

pub use calendar::*;
pub use config::*;
pub use partitioner::*;
pub use quantity::*;
