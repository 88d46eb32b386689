use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bmcnf::dimacs::write_dimacs_file;
use bmcnf::encoding::{
    BaseCircuit, FrameLayout, TargetState, Trace, compile_netlist, transition_steps, unroll,
};
use bmcnf::oracle::{
    BuiltinOracle, CancelToken, ExternalOracle, OracleConfig, SatOracle, Verdict,
};
use bmcnf::parser::parse_netlist_file;
use bmcnf::sweep::{SweepConfig, run_sweep};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "bmcnf")]
#[command(about = "bmcnf - Bounded model checking of gate-level circuits via DIMACS CNF")]
#[command(version)]
struct Args {
    /// Gate-level Verilog netlist
    circuit: PathBuf,
    /// Target next-state bits, highest register first (e.g. 011)
    target: String,
    /// Number of clock cycles to unroll
    #[arg(allow_negative_numbers = true)]
    depth: i64,

    /// DIMACS output path (default: <module>.dimacs)
    #[arg(long, short)]
    output: Option<PathBuf>,

    // --- Solver selection ---
    /// External SAT solver command
    #[arg(long, env = "BMCNF_SOLVER", default_value = "picosat")]
    solver: String,
    /// Extra argument passed to the solver before the file (repeatable)
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,
    /// Use the in-process solver instead of an external one
    #[arg(long)]
    builtin: bool,
    /// Only write the DIMACS file
    #[arg(long, conflicts_with_all = ["builtin", "sweep"])]
    no_solve: bool,
    /// Solver timeout in seconds
    #[arg(long)]
    solver_timeout: Option<u64>,

    // --- Depth sweep ---
    /// Find the shallowest depth up to DEPTH at which the target is reachable
    #[arg(long)]
    sweep: bool,
    /// Number of worker threads for the sweep
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// --- Single bounded check ---

fn check(
    args: &Args,
    label: &str,
    base: &BaseCircuit,
    target: &TargetState,
) -> Result<(), Box<dyn std::error::Error>> {
    let k = transition_steps(args.depth)?;
    let instance = unroll(base, k, target)?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.dimacs", label)));
    write_dimacs_file(&path, label, &instance)?;
    println!("DIMACS file \"{}\" has been created.", path.display());
    println!(
        "Variables: {}, clauses: {}",
        instance.num_vars(),
        instance.num_clauses()
    );

    if args.no_solve {
        return Ok(());
    }

    let timeout = args.solver_timeout.map(Duration::from_secs);
    let oracle: Box<dyn SatOracle> = if args.builtin {
        Box::new(BuiltinOracle::new().with_timeout(timeout))
    } else {
        Box::new(ExternalOracle::new(
            OracleConfig::default()
                .with_command(args.solver.clone())
                .with_args(args.solver_args.clone())
                .with_timeout_option(timeout),
        ))
    };

    let outcome = oracle.solve_file(&path, &CancelToken::new())?;
    if !outcome.output.is_empty() {
        print!("{}", outcome.output);
    }
    println!("Result: {}", outcome.verdict);
    println!(
        "{} runtime: {:.4} seconds",
        oracle.name(),
        outcome.elapsed.as_secs_f64()
    );

    if outcome.verdict == Verdict::Sat {
        if let Some(model) = &outcome.model {
            let assignment = model.assignment(instance.num_vars());
            if !instance.is_satisfied_by(&assignment) {
                warn!("solver model does not satisfy the instance");
            }
            let layout = FrameLayout::new(base.total_vars(), k)?;
            println!("\nTrace to target {}:", target);
            print!("{}", Trace::decode(base, &layout, &assignment));
        }
    }

    Ok(())
}

// --- Depth sweep ---

fn sweep(
    args: &Args,
    base: &BaseCircuit,
    target: &TargetState,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_depth = transition_steps(args.depth)? + 1;

    let mut config =
        SweepConfig::default().with_timeout_option(args.solver_timeout.map(Duration::from_secs));
    if let Some(jobs) = args.jobs {
        config = config.with_workers(jobs);
    }

    println!(
        "Sweeping depths 1..={} with {} worker(s)",
        max_depth,
        config.effective_workers(max_depth)
    );
    let result = run_sweep(base, target, max_depth, &config);

    for outcome in &result.outcomes {
        println!(
            "  depth {}: {} ({:.4} seconds)",
            outcome.depth,
            outcome.verdict,
            outcome.elapsed.as_secs_f64()
        );
    }
    if let Some((depth, message)) = result.errors.first() {
        return Err(format!("depth {}: {}", depth, message).into());
    }

    match result.shallowest {
        Some(depth) => {
            println!("Target {} is reachable in {} cycle(s)", target, depth);
            if let Some(trace) = &result.trace {
                print!("{}", trace);
            }
        }
        None if result.is_complete(max_depth) => {
            println!(
                "Target {} is unreachable within {} cycle(s)",
                target, max_depth
            );
        }
        None => println!("Sweep incomplete: no verdict for every depth"),
    }
    println!("Sweep runtime: {:.4} seconds", result.elapsed.as_secs_f64());

    Ok(())
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let netlist = parse_netlist_file(&args.circuit)?;
    let base = compile_netlist(&netlist)?;
    let target: TargetState = args.target.parse()?;

    if args.sweep {
        sweep(args, &base, &target)
    } else {
        check(args, &netlist.name, &base, &target)
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
