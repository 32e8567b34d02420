//! Round-synchronous conflict-simulation driver. Each round every active
//! slot attempts one work item: it speculatively claims the item's whole
//! destination neighborhood, aborting and re-enqueueing the item untouched if
//! any destination was already claimed by an earlier slot this round, and
//! otherwise relaxes every outgoing edge and feeds the improvements back into
//! the worklist.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tracing::info;

use crate::error::SimError;
use crate::graph::Graph;
use crate::worklist::{Work, Worklist};

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Fixed slot count per round; 0 means one slot per pending item.
    pub max_slots: usize,
    /// 1 runs the per-slot attempts sequentially (the simulation default);
    /// more executes them on that many scoped threads with the round
    /// boundary as the barrier.
    pub launch_threads: usize,
    /// Rounds between progress log lines; 0 disables.
    pub log_every: u64,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            max_slots: 0,
            launch_threads: 1,
            log_every: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoundStats {
    pub round: u64,
    pub completed: u64,
    pub conflicts: u64,
    pub generated: u64,
}

#[derive(Debug)]
pub struct RunSummary {
    pub rounds: u64,
    pub total_work: u64,
    pub total_generated: u64,
    /// Largest number of items completed in any single round.
    pub max_active: u64,
    /// The width used for utilization: the configured slot count, or
    /// `max_active` in unbounded mode.
    pub slot_width: u64,
    pub per_round: Vec<RoundStats>,
}

impl RunSummary {
    pub fn utilization(&self) -> f64 {
        if self.rounds == 0 || self.slot_width == 0 {
            return 0.0;
        }
        self.total_work as f64 / (self.rounds * self.slot_width) as f64
    }
}

enum Outcome {
    Completed { generated: u64 },
    Conflict,
}

/// Run the relaxation to completion: seed the source, then drain the
/// worklist round by round. Unreachable nodes keep the infinity payload.
pub fn run(
    graph: &Graph,
    worklist: &dyn Worklist,
    source: u32,
    cfg: &EngineConfig,
) -> Result<RunSummary, SimError> {
    graph.node(source)?.set_payload(0);
    worklist.put(
        Work {
            node: source,
            dist: 0,
            round: 0,
        },
        0,
    );

    let mut per_round = Vec::new();
    let mut round: u64 = 0;
    let mut total_work: u64 = 0;
    let mut total_generated: u64 = 0;
    let mut max_active: u64 = 0;

    while worklist.not_empty() {
        graph.reset_locks();
        let width = if cfg.max_slots == 0 {
            worklist.len()
        } else {
            cfg.max_slots
        };

        let stats = if cfg.launch_threads <= 1 {
            round_sequential(graph, worklist, round, width)?
        } else {
            round_threaded(graph, worklist, round, width, cfg.launch_threads)?
        };

        total_work += stats.completed;
        total_generated += stats.generated;
        if stats.completed > max_active {
            max_active = stats.completed;
        }
        if cfg.log_every > 0 && round % cfg.log_every == 0 {
            info!(
                round,
                completed = stats.completed,
                conflicts = stats.conflicts,
                generated = stats.generated,
                pending = worklist.len(),
                "round done"
            );
        }

        per_round.push(stats);
        worklist.step();
        round += 1;
    }

    let slot_width = if cfg.max_slots == 0 {
        max_active
    } else {
        cfg.max_slots as u64
    };
    Ok(RunSummary {
        rounds: round,
        total_work,
        total_generated,
        max_active,
        slot_width,
        per_round,
    })
}

fn round_sequential(
    graph: &Graph,
    worklist: &dyn Worklist,
    round: u64,
    width: usize,
) -> Result<RoundStats, SimError> {
    let mut stats = RoundStats {
        round,
        completed: 0,
        conflicts: 0,
        generated: 0,
    };
    for slot in 0..width {
        let Some(work) = worklist.get(slot) else {
            continue;
        };
        match attempt(graph, worklist, work, slot, round)? {
            Outcome::Completed { generated } => {
                stats.completed += 1;
                stats.generated += generated;
            }
            Outcome::Conflict => stats.conflicts += 1,
        }
    }
    Ok(stats)
}

/// One slot's attempt, sequential flavor: check every destination's claim
/// flag first, and only when the whole neighborhood is free set all the flags
/// and relax.
fn attempt(
    graph: &Graph,
    worklist: &dyn Worklist,
    work: Work,
    slot: usize,
    round: u64,
) -> Result<Outcome, SimError> {
    let node = graph.node(work.node)?;

    for i in 0..node.num_edges {
        let edge = graph.edge(node.edge_offset + i)?;
        if graph.node(edge.dest)?.is_locked() {
            // an earlier slot holds part of the neighborhood: abort the whole
            // item, defer it unchanged, mutate nothing
            worklist.put(work, slot);
            return Ok(Outcome::Conflict);
        }
    }

    let src_dist = node.payload();
    let mut generated = 0;
    for i in 0..node.num_edges {
        let edge = graph.edge(node.edge_offset + i)?;
        let dest = graph.node(edge.dest)?;
        dest.set_locked();
        let proposed = src_dist.saturating_add(edge.weight);
        if proposed < dest.payload() {
            dest.set_payload(proposed);
            worklist.put(
                Work {
                    node: edge.dest,
                    dist: proposed,
                    round: round + 1,
                },
                slot,
            );
            generated += 1;
        }
    }
    Ok(Outcome::Completed { generated })
}

/// One slot's attempt under real concurrency: claim destinations one by one
/// with compare-and-set; on losing any claim, release the ones already held
/// and abort. Two slots contending for a destination produce exactly one
/// winner.
fn attempt_claiming(
    graph: &Graph,
    worklist: &dyn Worklist,
    work: Work,
    slot: usize,
    round: u64,
) -> Result<Outcome, SimError> {
    let node = graph.node(work.node)?;

    let mut claimed: Vec<u32> = Vec::with_capacity(node.num_edges);
    for i in 0..node.num_edges {
        let edge = graph.edge(node.edge_offset + i)?;
        if claimed.contains(&edge.dest) {
            continue; // parallel edge to a destination this slot already holds
        }
        if graph.node(edge.dest)?.try_claim() {
            claimed.push(edge.dest);
        } else {
            for id in claimed {
                graph.node(id)?.release();
            }
            worklist.put(work, slot);
            return Ok(Outcome::Conflict);
        }
    }

    let src_dist = node.payload();
    let mut generated = 0;
    for i in 0..node.num_edges {
        let edge = graph.edge(node.edge_offset + i)?;
        let dest = graph.node(edge.dest)?;
        let proposed = src_dist.saturating_add(edge.weight);
        if proposed < dest.payload() {
            dest.set_payload(proposed);
            worklist.put(
                Work {
                    node: edge.dest,
                    dist: proposed,
                    round: round + 1,
                },
                slot,
            );
            generated += 1;
        }
    }
    Ok(Outcome::Completed { generated })
}

fn round_threaded(
    graph: &Graph,
    worklist: &dyn Worklist,
    round: u64,
    width: usize,
    threads: usize,
) -> Result<RoundStats, SimError> {
    let completed = AtomicU64::new(0);
    let conflicts = AtomicU64::new(0);
    let generated = AtomicU64::new(0);
    let next_slot = AtomicUsize::new(0);

    std::thread::scope(|scope| -> Result<(), SimError> {
        let handles: Vec<_> = (0..threads.min(width.max(1)))
            .map(|_| {
                scope.spawn(|| -> Result<(), SimError> {
                    loop {
                        let slot = next_slot.fetch_add(1, Ordering::Relaxed);
                        if slot >= width {
                            return Ok(());
                        }
                        let Some(work) = worklist.get(slot) else {
                            continue;
                        };
                        match attempt_claiming(graph, worklist, work, slot, round)? {
                            Outcome::Completed { generated: count } => {
                                completed.fetch_add(1, Ordering::Relaxed);
                                generated.fetch_add(count, Ordering::Relaxed);
                            }
                            Outcome::Conflict => {
                                conflicts.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("slot worker panicked")?;
        }
        Ok(())
    })?;

    Ok(RoundStats {
        round,
        completed: completed.into_inner(),
        conflicts: conflicts.into_inner(),
        generated: generated.into_inner(),
    })
}
