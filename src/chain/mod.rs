//! Version chains - ordered upgrade paths through the reference table

pub mod index;
pub mod node;

pub use index::ChainIndex;
pub use node::{Chain, ChainNode, ChainWalk};
