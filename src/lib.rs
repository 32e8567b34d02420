//! Round-synchronous single-source shortest paths with pluggable worklist
//! scheduling policies.
//!
//! One controller drives synchronous rounds over a flat node/edge store;
//! within a round each simulated slot attempts one work item, speculatively
//! claiming the item's whole destination neighborhood and aborting on any
//! overlap with an earlier claim. The worklist policy (unordered, lifo,
//! ordered, local-ordered, obim) decides retrieval order and is the
//! experiment knob: it changes how much work each round exposes and how
//! often claims collide, never the final distances.

pub mod engine;
pub mod error;
pub mod graph;
pub mod printer;
pub mod worklist;
