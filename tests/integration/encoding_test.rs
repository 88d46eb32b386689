use bmcnf::dimacs::{read_dimacs_file, write_dimacs_file};
use bmcnf::encoding::{
    Clause, CnfInstance, FrameLayout, Trace, compile, compile_netlist, transition_steps, unroll,
};
use bmcnf::error::EncodeError;
use bmcnf::ir::Gate;
use bmcnf::oracle::{BuiltinOracle, CancelToken, SatOracle, Verdict};
use bmcnf::parser::parse_netlist_string;

use crate::common::{AND_LATCH_V, COUNTER_V, brute_force_sat};

fn dimacs(instance: &CnfInstance) -> Vec<Vec<i64>> {
    instance.clauses().iter().map(Clause::to_dimacs).collect()
}

fn solve(instance: &CnfInstance) -> Verdict {
    BuiltinOracle::new()
        .solve_instance(instance, &CancelToken::new())
        .expect("built-in solver")
        .verdict
}

fn counter_instance(target: &str, depth: i64) -> CnfInstance {
    let netlist = parse_netlist_string(COUNTER_V, "counter").unwrap();
    let base = compile_netlist(&netlist).unwrap();
    let k = transition_steps(depth).unwrap();
    unroll(&base, k, &target.parse().unwrap()).unwrap()
}

#[test]
fn test_single_frame_example_is_unsat() {
    let netlist = parse_netlist_string(AND_LATCH_V, "x").unwrap();
    let base = compile_netlist(&netlist).unwrap();
    assert_eq!(base.total_vars(), 3);
    assert_eq!(
        base.clauses().iter().map(Clause::to_dimacs).collect::<Vec<_>>(),
        vec![vec![-2, 1], vec![-2, 3], vec![2, -1, -3]]
    );

    let instance = unroll(&base, 0, &"1".parse().unwrap()).unwrap();
    assert_eq!(instance.num_vars(), 3);
    assert_eq!(
        dimacs(&instance),
        vec![vec![-1], vec![-2, 1], vec![-2, 3], vec![2, -1, -3], vec![2]]
    );

    assert!(!brute_force_sat(&instance));
    assert_eq!(solve(&instance), Verdict::Unsat);
}

#[test]
fn test_counter_signal_ids() {
    let netlist = parse_netlist_string(COUNTER_V, "x").unwrap();
    assert_eq!(netlist.name, "counter");
    let base = compile_netlist(&netlist).unwrap();

    let ids: Vec<(&str, u32)> = base.signals().iter().map(|(n, v)| (n, v.id())).collect();
    assert_eq!(
        ids,
        vec![
            ("S0", 1),
            ("S1", 2),
            ("NS0", 3),
            ("nS0", 4),
            ("nS1", 5),
            ("t1", 6),
            ("t2", 7),
            ("nt1", 8),
            ("nt2", 9),
            ("nor", 10),
            ("NS1", 11),
        ]
    );
    assert_eq!(base.pairing().width(), 2);
}

#[test]
fn test_counter_reaches_three_after_three_cycles() {
    assert_eq!(solve(&counter_instance("11", 1)), Verdict::Unsat);
    assert_eq!(solve(&counter_instance("11", 2)), Verdict::Unsat);
    assert_eq!(solve(&counter_instance("11", 3)), Verdict::Sat);
    assert_eq!(solve(&counter_instance("11", 7)), Verdict::Sat);
}

#[test]
fn test_counter_target_bit_order() {
    // "01" is NS1=0 NS0=1, the value after one cycle
    assert_eq!(solve(&counter_instance("01", 1)), Verdict::Sat);
    assert_eq!(solve(&counter_instance("01", 2)), Verdict::Unsat);
    assert_eq!(solve(&counter_instance("10", 2)), Verdict::Sat);
    assert_eq!(solve(&counter_instance("10", 1)), Verdict::Unsat);
}

#[test]
fn test_counter_instance_size() {
    let instance = counter_instance("11", 3);
    assert_eq!(instance.num_vars(), 33);
    // 2 resets + 3 * 21 base clauses + 2 * 4 links + 2 target units
    assert_eq!(instance.num_clauses(), 2 + 63 + 8 + 2);
}

#[test]
fn test_counter_trace() {
    let netlist = parse_netlist_string(COUNTER_V, "x").unwrap();
    let base = compile_netlist(&netlist).unwrap();
    let instance = unroll(&base, 2, &"11".parse().unwrap()).unwrap();

    let outcome = BuiltinOracle::new()
        .solve_instance(&instance, &CancelToken::new())
        .unwrap();
    let assignment = outcome.model.unwrap().assignment(instance.num_vars());
    assert!(instance.is_satisfied_by(&assignment));

    let layout = FrameLayout::new(base.total_vars(), 2).unwrap();
    let trace = Trace::decode(&base, &layout, &assignment);
    assert_eq!(
        trace.to_string(),
        "cycle 0: S0=0 S1=0 -> NS0=1 NS1=0\n\
         cycle 1: S0=1 S1=0 -> NS0=0 NS1=1\n\
         cycle 2: S0=0 S1=1 -> NS0=1 NS1=1\n"
    );
}

#[test]
fn test_dimacs_file_round_trip_through_solver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.dimacs");
    let instance = counter_instance("11", 3);

    write_dimacs_file(&path, "counter", &instance).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("c counter\np cnf 33 75\n-1 0\n-2 0\n"));

    assert_eq!(read_dimacs_file(&path).unwrap(), instance);
    let outcome = BuiltinOracle::new()
        .solve_file(&path, &CancelToken::new())
        .unwrap();
    assert_eq!(outcome.verdict, Verdict::Sat);
}

#[test]
fn test_errors_abort_translation() {
    let base = compile(&["S0"], &[Gate::and("NS0", ["S0", "IN"])]).unwrap();

    assert_eq!(
        unroll(&base, 0, &"10".parse().unwrap()),
        Err(EncodeError::TargetWidthMismatch {
            expected: 1,
            found: 2
        })
    );
    assert_eq!(transition_steps(0), Err(EncodeError::InvalidDepth(0)));
    assert_eq!(transition_steps(-4), Err(EncodeError::InvalidDepth(-4)));
    assert!(matches!(
        "1x".parse::<bmcnf::encoding::TargetState>(),
        Err(EncodeError::InvalidTargetBit {
            position: 1,
            found: 'x'
        })
    ));

    assert!(matches!(
        compile(&["S0"], &[Gate::not("NS7", "S0")]),
        Err(EncodeError::UnpairedStateSignal { .. })
    ));
    assert!(matches!(
        compile(&["S0"], &[Gate::and("NS0", Vec::<String>::new())]),
        Err(EncodeError::MalformedGate { .. })
    ));
}

#[test]
fn test_loader_rejects_unsupported_gates() {
    let err = parse_netlist_string("reg S0;\nor g0(NS0, S0, a);\n", "x").unwrap_err();
    assert_eq!(err.line_number, 2);
    assert!(err.message.contains("or"));
}
