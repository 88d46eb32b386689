//! Randomized checks of the unrolling laws over generated circuits

use bmcnf::encoding::{
    BaseCircuit, Clause, CnfInstance, FrameLayout, TargetState, Trace, compile, unroll,
};
use bmcnf::oracle::{BuiltinOracle, CancelToken, Verdict};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::{RandomCircuit, random_circuit, reachable};

const CASES: u64 = 40;

fn build(circuit: &RandomCircuit) -> BaseCircuit {
    compile(&circuit.states, &circuit.gates).expect("generated circuit compiles")
}

fn random_target(rng: &mut ChaCha8Rng, width: usize) -> TargetState {
    TargetState::from_bits((0..width).map(|_| rng.gen_bool(0.5)).collect())
}

fn contains(instance: &CnfInstance, lits: &[i64]) -> usize {
    instance
        .clauses()
        .iter()
        .filter(|c| c.to_dimacs() == lits)
        .count()
}

#[test]
fn test_unroll_is_deterministic() {
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=3), 2, rng.gen_range(0..=6));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let target = random_target(&mut rng, circuit.states.len());
        let k = rng.gen_range(0..=3);

        let first = unroll(&build(&circuit), k, &target).unwrap();
        let second = unroll(&build(&circuit), k, &target).unwrap();
        assert_eq!(first, second, "seed {}", seed);
    }
}

#[test]
fn test_variable_density_and_frame_count() {
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=3), rng.gen_range(0..=2), rng.gen_range(0..=6));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let base = build(&circuit);
        let target = random_target(&mut rng, circuit.states.len());
        let k = rng.gen_range(0..=4);

        let instance = unroll(&base, k, &target).unwrap();
        assert_eq!(instance.num_vars(), base.total_vars() * (k as u32 + 1), "seed {}", seed);
        for clause in instance.clauses() {
            assert!(!clause.is_empty());
            for lit in clause.lits() {
                let id = lit.var().id();
                assert!(id >= 1 && id <= instance.num_vars(), "seed {}: id {}", seed, id);
            }
        }
    }
}

#[test]
fn test_reset_units_appear_once_at_frame_zero() {
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=3), 1, rng.gen_range(0..=5));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let base = build(&circuit);
        let target = random_target(&mut rng, circuit.states.len());
        let instance = unroll(&base, rng.gen_range(0..=3), &target).unwrap();

        for &state in base.pairing().state_vars() {
            assert_eq!(contains(&instance, &[-(state.id() as i64)]), 1, "seed {}", seed);
        }
    }
}

#[test]
fn test_frames_are_linked_by_register_pairs() {
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=3), 1, rng.gen_range(0..=5));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let base = build(&circuit);
        let target = random_target(&mut rng, circuit.states.len());
        let k = rng.gen_range(1..=3);
        let instance = unroll(&base, k, &target).unwrap();
        let layout = FrameLayout::new(base.total_vars(), k).unwrap();

        for u in 1..=k {
            for pair in base.pairing().pairs() {
                let next = layout.at(pair.next_state, u - 1).id() as i64;
                let state = layout.at(pair.state, u).id() as i64;
                assert_eq!(contains(&instance, &[next, -state]), 1, "seed {}", seed);
                assert_eq!(contains(&instance, &[-next, state]), 1, "seed {}", seed);
            }
        }
    }
}

#[test]
fn test_target_units_fix_last_frame() {
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=3), 1, rng.gen_range(0..=5));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let base = build(&circuit);
        let target = random_target(&mut rng, circuit.states.len());
        let k = rng.gen_range(0..=3);
        let instance = unroll(&base, k, &target).unwrap();
        let layout = FrameLayout::new(base.total_vars(), k).unwrap();

        let tail = &instance.clauses()[instance.num_clauses() - target.width()..];
        for (i, &bit) in target.bits().iter().enumerate() {
            let var = base.signals().get(&format!("NS{}", i)).unwrap();
            let id = layout.at(var, k).id() as i64;
            let expected = if bit { id } else { -id };
            assert_eq!(tail[i].to_dimacs(), vec![expected], "seed {}", seed);
        }
    }
}

#[test]
fn test_verdict_matches_simulation() {
    let oracle = BuiltinOracle::new();
    for seed in 0..CASES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (registers, inputs, wires) = (rng.gen_range(1..=2), rng.gen_range(0..=2), rng.gen_range(0..=4));
        let circuit = random_circuit(&mut rng, registers, inputs, wires);
        let base = build(&circuit);
        let target = random_target(&mut rng, circuit.states.len());
        let depth = rng.gen_range(1..=3);
        let k = depth - 1;

        let instance = unroll(&base, k, &target).unwrap();
        let outcome = oracle.solve_instance(&instance, &CancelToken::new()).unwrap();
        let expected = reachable(&circuit, target.bits(), depth);
        assert_eq!(outcome.verdict == Verdict::Sat, expected, "seed {}", seed);

        if let Some(model) = outcome.model {
            let assignment = model.assignment(instance.num_vars());
            assert!(instance.is_satisfied_by(&assignment), "seed {}", seed);

            let layout = FrameLayout::new(base.total_vars(), k).unwrap();
            let trace = Trace::decode(&base, &layout, &assignment);
            let last = trace.frames.last().unwrap();
            for (name, value) in &last.next_state {
                let index: usize = name[2..].parse().unwrap();
                assert_eq!(*value, target.bits()[index], "seed {}", seed);
            }
            for frame in &trace.frames[1..] {
                let previous = &trace.frames[frame.frame - 1];
                let carried: Vec<bool> = previous.next_state.iter().map(|(_, v)| *v).collect();
                let current: Vec<bool> = frame.state.iter().map(|(_, v)| *v).collect();
                assert_eq!(carried, current, "seed {}", seed);
            }
        }
    }
}

#[test]
fn test_clause_copies_are_offset_per_frame() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (registers, inputs, wires) = (2, 1, 4);
    let circuit = random_circuit(&mut rng, registers, inputs, wires);
    let base = build(&circuit);
    let k = 2;
    let instance = unroll(&base, k, &random_target(&mut rng, 2)).unwrap();
    let layout = FrameLayout::new(base.total_vars(), k).unwrap();

    for frame in 0..=k {
        let offset = layout.offset(frame);
        for clause in base.clauses() {
            let shifted: Clause = clause.shifted(offset);
            assert!(contains(&instance, &shifted.to_dimacs()) >= 1);
        }
    }
}
