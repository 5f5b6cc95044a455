//! Query-time retrieval
//!
//! A query flows through [`accumulate`] (vocabulary + postings), then a
//! [`Scorer`] (document metadata), then [`rank`].

mod accumulator;
mod ranker;
mod retriever;
mod scoring;

pub use accumulator::*;
pub use ranker::*;
pub use retriever::*;
pub use scoring::*;
