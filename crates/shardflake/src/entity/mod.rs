mod assign;
mod field;
mod key;

pub use assign::*;
pub use field::*;
pub use key::*;
