use clap::Parser;

use sssp_sim::worklist::Policy;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct SsspCli {
    /// Edge list input file: `<numNodes> <numEdges>` header, then
    /// `<src> <dest> <weight>` lines grouped by source
    pub graph_file: String,

    /// Source vertex id
    pub source: u32,

    /// Write the `id,payload` results listing to this file
    #[arg(short, long)]
    pub out: Option<String>,

    /// Per-round statistics table
    #[arg(long, default_value = "stats.csv")]
    pub stats: String,

    #[arg(value_enum, short, long, default_value = "ordered")]
    pub policy: Policy,

    /// Bucket width (ordered, local-ordered) or bucket shift (obim)
    #[arg(short, long, default_value_t = 1)]
    pub delta: u64,

    /// Fixed slot count per round; 0 means one slot per pending item
    #[arg(short = 'c', long, default_value_t = 0)]
    pub max_cores: usize,

    /// Queue partitions for the local-ordered policy
    #[arg(short = 'q', long, default_value_t = 16)]
    pub local_queues: usize,

    /// Rounds between local-ordered reconciliations
    #[arg(long, default_value_t = 10)]
    pub sync_every: u64,

    #[arg(short, long, default_value_t = 1)]
    pub launch_threads: usize,

    /// Rounds between progress log lines
    #[arg(long, default_value_t = 1000)]
    pub log_every: u64,
}

impl SsspCli {
    pub fn describe(&self) {
        println!("graph file: {}", self.graph_file);
        println!("source vertex: {}", self.source);
        println!("policy: {:?}", self.policy);
        println!("delta: {}", self.delta);
        println!("max cores: {}", self.max_cores);
        println!("local queues: {}", self.local_queues);
        println!("sync every: {}", self.sync_every);
        println!("launch threads: {}", self.launch_threads);
    }
}
