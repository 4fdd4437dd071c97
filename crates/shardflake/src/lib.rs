#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod entity;
mod error;
#[cfg(test)]
mod fixtures;
mod generator;
mod id;
mod node;
mod partition;
mod time;

pub use crate::entity::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::partition::*;
pub use crate::time::*;
