use std::path::PathBuf;

use thiserror::Error;

/// Fatal error conditions. Conflicts and empty worklist slots are normal
/// control flow and never appear here.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read or write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed edge list file: {0}")]
    Malformed(String),

    #[error("edge list declared {declared} edges but the stream contained {found}")]
    EdgeCountMismatch { declared: usize, found: usize },

    #[error("failed to write stats table: {0}")]
    Csv(#[from] csv::Error),

    #[error("node id {id} out of range (graph has {num_nodes} nodes)")]
    NodeOutOfBounds { id: u64, num_nodes: usize },

    #[error("edge index {index} out of range (graph has {num_edges} edges)")]
    EdgeOutOfBounds { index: usize, num_edges: usize },
}
