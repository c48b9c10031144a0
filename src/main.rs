use clap::{ArgAction, Parser, ValueEnum};
use maxclique::prelude::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "maxclique")]
#[command(about = "Parallel maximum-clique search for large sparse graphs")]
#[command(version)]
struct Args {
    /// Graph file (edge list, MatrixMarket or DIMACS)
    #[arg(long, short = 'f')]
    graph: PathBuf,

    /// Exact variant: 0 full, 1 basic, 2 simple; negative for heuristic only
    #[arg(long, short = 'a', default_value_t = 0, allow_negative_numbers = true)]
    algorithm: i32,

    /// Known lower bound; only cliques at least this large are reported
    #[arg(long, default_value_t = 0)]
    lb: usize,

    /// Known upper bound replacing the coreness bound
    #[arg(long, default_value_t = 0)]
    ub: usize,

    /// Greedy lower-bound strategy
    #[arg(long, value_enum, default_value = "degeneracy")]
    heuristic: CliHeuristic,

    /// Seed for the random heuristic
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Use the dense bitset search below this many vertices
    #[arg(long, default_value_t = 20_000)]
    adj_limit: usize,

    /// Minimum seconds between working-graph reductions
    #[arg(long, default_value_t = 4.0)]
    reduce_secs: f64,

    /// Only reduce graphs with more edges than this
    #[arg(long, default_value_t = 1_000_000)]
    reduce_edges: usize,

    /// Wall-clock budget in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Worker threads (0 = all cores)
    #[arg(long, short = 'j', default_value_t = 0)]
    threads: usize,

    /// Report every maximum clique
    #[arg(long)]
    enumerate: bool,

    /// Print graph statistics before solving
    #[arg(long)]
    stats: bool,

    /// Ask whether a clique of this size exists
    #[arg(long)]
    clique_size: Option<usize>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// CLI heuristic selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliHeuristic {
    /// No heuristic
    Off,
    /// Degeneracy-ordered greedy
    Degeneracy,
    /// Degree-ordered greedy
    Degree,
    /// Degeneracy seeds with shuffled candidates
    Random,
}

impl From<CliHeuristic> for HeuristicStrategy {
    fn from(cli: CliHeuristic) -> Self {
        match cli {
            CliHeuristic::Off => HeuristicStrategy::Off,
            CliHeuristic::Degeneracy => HeuristicStrategy::Degeneracy,
            CliHeuristic::Degree => HeuristicStrategy::Degree,
            CliHeuristic::Random => HeuristicStrategy::Random,
        }
    }
}

fn seconds(value: f64, flag: &str) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_else(|e| {
        eprintln!("invalid --{flag} {value}: {e}");
        std::process::exit(2);
    })
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    let load_start = Instant::now();
    let graph = match read_graph(&args.graph) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args.graph.display());
            std::process::exit(1);
        }
    };
    println!(
        "Loaded {} ({} vertices, {} edges) in {:.3?}",
        args.graph.display(),
        graph.num_vertices(),
        graph.num_edges(),
        load_start.elapsed()
    );

    if args.stats {
        let s = graph.stats(&CoreDecomposition::compute(&graph));
        println!("--------------------------------------------------");
        println!("|V|: {}   |E|: {}   density: {:.6}", s.vertices, s.edges, s.density);
        println!(
            "degree: min {}  max {}  avg {:.2}",
            s.min_degree, s.max_degree, s.avg_degree
        );
        println!("max core: {}   clique upper bound: {}", s.max_core, s.upper_bound);
        println!("--------------------------------------------------");
    }

    let config = SolverConfig {
        algorithm: args.algorithm,
        lb: args.lb,
        ub: args.ub,
        heuristic: args.heuristic.into(),
        heuristic_seed: args.seed,
        adj_limit: args.adj_limit,
        reduction: ReductionPolicy {
            interval: seconds(args.reduce_secs, "reduce-secs"),
            min_edges: args.reduce_edges,
        },
        time_limit: args.time_limit.map(|t| seconds(t, "time-limit")),
        threads: args.threads,
        enumerate: args.enumerate,
        ..SolverConfig::default()
    };

    let solution = match Solver::new(config).solve(&graph) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("solve failed: {e}");
            std::process::exit(1);
        }
    };

    if let Some(skipped) = &solution.skipped {
        eprintln!("warning: {skipped}; result comes from the heuristic only");
    }
    println!("Heuristic clique size: {}", solution.heuristic_size);
    println!("Maximum clique: {:?}", solution.clique);
    println!("Size: {}", solution.size);
    println!(
        "Bounds: {} <= omega <= {}{}",
        solution.lower_bound,
        solution.upper_bound,
        if solution.proven_optimal { " (optimal)" } else { "" }
    );
    println!("Time: {:.3?}", solution.elapsed);
    if solution.variant.is_some() {
        let st = &solution.stats;
        println!(
            "Search: {} nodes, {} roots explored, {} pruned, {} reductions",
            st.nodes, st.roots_explored, st.roots_pruned, st.reductions
        );
    }
    if args.enumerate {
        println!("{} maximum cliques:", solution.maximum_cliques.len());
        for c in &solution.maximum_cliques {
            println!("  {c:?}");
        }
    }

    if let Some(k) = args.clique_size {
        if solution.size >= k {
            println!("A clique of size {k} exists");
        } else if solution.rules_out(k) {
            println!("A clique of size {k} does not exist");
        } else {
            println!("Undecided whether a clique of size {k} exists");
            std::process::exit(3);
        }
    }
}
