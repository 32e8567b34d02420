use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::SimError;

/// Distance sentinel for nodes not (yet) reached from the source.
pub const INFINITY: u64 = u64::MAX;

/// A graph node. The structural fields (`id`, `edge_offset`, `num_edges`) are
/// fixed after load; only the distance estimate and the per-round claim flag
/// mutate, and those are atomic so slots may execute concurrently.
#[derive(Debug)]
pub struct Node {
    pub id: u32,
    pub edge_offset: usize,
    pub num_edges: usize,
    payload: AtomicU64,
    lock: AtomicBool,
}

impl Node {
    fn new(id: u32) -> Self {
        Node {
            id,
            edge_offset: 0,
            num_edges: 0,
            payload: AtomicU64::new(INFINITY),
            lock: AtomicBool::new(false),
        }
    }

    pub fn payload(&self) -> u64 {
        self.payload.load(Ordering::Relaxed)
    }

    /// Callers must hold the claim on this node (or be the single sequential
    /// controller) before storing a new distance.
    pub fn set_payload(&self, dist: u64) {
        self.payload.store(dist, Ordering::Relaxed);
    }

    pub fn is_locked(&self) -> bool {
        self.lock.load(Ordering::Relaxed)
    }

    pub fn set_locked(&self) {
        self.lock.store(true, Ordering::Relaxed);
    }

    /// Compare-and-set claim: succeeds only if the flag was unset, so two
    /// concurrent slots contending for the same destination produce exactly
    /// one winner.
    pub fn try_claim(&self) -> bool {
        self.lock
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn release(&self) {
        self.lock.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub dest: u32,
    pub weight: u64,
}

/// Flat node/edge arenas. Each node's outgoing edges occupy the contiguous
/// block `edge_offset .. edge_offset + num_edges`.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: u32) -> Result<&Node, SimError> {
        self.nodes
            .get(id as usize)
            .ok_or_else(|| SimError::NodeOutOfBounds {
                id: id as u64,
                num_nodes: self.nodes.len(),
            })
    }

    pub fn edge(&self, index: usize) -> Result<&Edge, SimError> {
        self.edges
            .get(index)
            .ok_or_else(|| SimError::EdgeOutOfBounds {
                index,
                num_edges: self.edges.len(),
            })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Clear every claim flag. Called at the start of each round.
    pub fn reset_locks(&self) {
        for node in &self.nodes {
            node.release();
        }
    }

    /// Load a plain text edge list:
    ///
    /// ```text
    /// <numNodes> <numEdges>
    /// <src> <dest> <weight>
    /// ...
    /// ```
    ///
    /// All edges of one source must be contiguous in the stream. The stream
    /// must contain exactly `numEdges` edge lines; a short or overlong stream
    /// is rejected rather than silently accepted.
    pub fn load_edgelist_file(fpath: &str) -> Result<Graph, SimError> {
        let path = Path::new(fpath);
        let file = File::open(path).map_err(|e| SimError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line.map_err(|e| SimError::Io {
                path: path.to_path_buf(),
                source: e,
            })?,
            None => return Err(SimError::Malformed("empty file".into())),
        };
        let mut fields = header.split_whitespace();
        let num_nodes: usize = parse_field(fields.next(), "numNodes", &header)?;
        let num_edges: usize = parse_field(fields.next(), "numEdges", &header)?;

        let mut nodes: Vec<Node> = (0..num_nodes).map(|i| Node::new(i as u32)).collect();
        let mut edges: Vec<Edge> = Vec::with_capacity(num_edges);
        let mut seen = vec![false; num_nodes];
        let mut last_src: Option<u32> = None;

        for line in lines {
            let line = line.map_err(|e| SimError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let src: u32 = parse_field(fields.next(), "src", &line)?;
            let dest: u32 = parse_field(fields.next(), "dest", &line)?;
            let weight: u64 = parse_field(fields.next(), "weight", &line)?;
            if fields.next().is_some() {
                return Err(SimError::Malformed(format!(
                    "expected `src dest weight`, got `{line}`"
                )));
            }

            if (src as usize) >= num_nodes {
                return Err(SimError::Malformed(format!(
                    "edge source {src} not less than declared numNodes {num_nodes}"
                )));
            }
            if (dest as usize) >= num_nodes {
                return Err(SimError::Malformed(format!(
                    "edge destination {dest} not less than declared numNodes {num_nodes}"
                )));
            }

            // New source: its edge block starts here and must not have been
            // opened earlier in the stream.
            if last_src != Some(src) {
                if seen[src as usize] {
                    return Err(SimError::Malformed(format!(
                        "edges of node {src} are not contiguous in the stream"
                    )));
                }
                seen[src as usize] = true;
                nodes[src as usize].edge_offset = edges.len();
                last_src = Some(src);
            }

            edges.push(Edge { dest, weight });
            nodes[src as usize].num_edges += 1;
        }

        if edges.len() != num_edges {
            return Err(SimError::EdgeCountMismatch {
                declared: num_edges,
                found: edges.len(),
            });
        }

        Ok(Graph { nodes, edges })
    }

    /// Build a graph from an in-memory `(src, dest, weight)` list, grouping
    /// edges by source. Used by tests and graph generators.
    pub fn from_edges(num_nodes: usize, edge_list: &[(u32, u32, u64)]) -> Result<Graph, SimError> {
        let mut sorted: Vec<(u32, u32, u64)> = edge_list.to_vec();
        sorted.sort_by_key(|e| e.0);

        let mut nodes: Vec<Node> = (0..num_nodes).map(|i| Node::new(i as u32)).collect();
        let mut edges: Vec<Edge> = Vec::with_capacity(sorted.len());
        let mut last_src: Option<u32> = None;
        for (src, dest, weight) in sorted {
            if (src as usize) >= num_nodes || (dest as usize) >= num_nodes {
                return Err(SimError::Malformed(format!(
                    "edge ({src}, {dest}) references a node outside 0..{num_nodes}"
                )));
            }
            if last_src != Some(src) {
                nodes[src as usize].edge_offset = edges.len();
                last_src = Some(src);
            }
            edges.push(Edge { dest, weight });
            nodes[src as usize].num_edges += 1;
        }
        Ok(Graph { nodes, edges })
    }
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &str,
    line: &str,
) -> Result<T, SimError> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| SimError::Malformed(format!("could not parse {name} from `{line}`")))
}
