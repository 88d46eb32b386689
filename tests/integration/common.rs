//! Shared fixtures: circuits, a reference simulator and brute-force checks

use std::collections::HashMap;

use bmcnf::encoding::CnfInstance;
use bmcnf::ir::{Gate, GateKind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Two-bit counter built only from and/not gates
pub const COUNTER_V: &str = "\
// 2-bit counter: (S1 S0) counts 00 -> 01 -> 10 -> 11
module counter(clk);
  input clk;
  reg S0, S1;
  wire NS0, NS1, nS0, nS1, t1, t2, nt1, nt2, nor;

  not g0(NS0, S0);
  not g1(nS0, S0);
  not g2(nS1, S1);
  and g3(t1, S1, nS0);
  and g4(t2, nS1, S0);
  not g5(nt1, t1);
  not g6(nt2, t2);
  and g7(nor, nt1, nt2);
  not g8(NS1, nor);

  always @(posedge clk) begin
    S0 <= NS0;
    S1 <= NS1;
  end
endmodule
";

/// One register, one free input: `NS0 = S0 & IN`
pub const AND_LATCH_V: &str = "\
module and_latch(clk, IN);
  input clk, IN;
  reg S0;
  and g0(NS0, S0, IN);
endmodule
";

/// A random sequential circuit whose gates are in evaluation order
#[derive(Debug, Clone)]
pub struct RandomCircuit {
    pub states: Vec<String>,
    pub inputs: Vec<String>,
    pub gates: Vec<Gate>,
}

fn random_gate(rng: &mut ChaCha8Rng, output: String, pool: &[String]) -> Gate {
    let pick = |rng: &mut ChaCha8Rng| pool[rng.gen_range(0..pool.len())].clone();
    if rng.gen_bool(0.4) {
        Gate::not(output, pick(rng))
    } else {
        let arity = rng.gen_range(1..=3);
        let inputs: Vec<String> = (0..arity).map(|_| pick(rng)).collect();
        Gate::and(output, inputs)
    }
}

/// Registers `S0..`, inputs `IN0..`, internal wires `w0..`; every
/// next-state signal is driven by the last gates
pub fn random_circuit(
    rng: &mut ChaCha8Rng,
    registers: usize,
    inputs: usize,
    wires: usize,
) -> RandomCircuit {
    let states: Vec<String> = (0..registers).map(|i| format!("S{}", i)).collect();
    let input_names: Vec<String> = (0..inputs).map(|i| format!("IN{}", i)).collect();

    let mut pool: Vec<String> = states.iter().chain(&input_names).cloned().collect();
    let mut gates = Vec::new();

    for w in 0..wires {
        let output = format!("w{}", w);
        gates.push(random_gate(rng, output.clone(), &pool));
        pool.push(output);
    }
    for i in 0..registers {
        gates.push(random_gate(rng, format!("NS{}", i), &pool));
    }

    RandomCircuit {
        states,
        inputs: input_names,
        gates,
    }
}

/// One clock cycle: next-state values (bit 0 first)
pub fn step(circuit: &RandomCircuit, state: &[bool], inputs: &[bool]) -> Vec<bool> {
    let mut values: HashMap<&str, bool> = HashMap::new();
    for (name, &v) in circuit.states.iter().zip(state) {
        values.insert(name, v);
    }
    for (name, &v) in circuit.inputs.iter().zip(inputs) {
        values.insert(name, v);
    }
    for gate in &circuit.gates {
        let value = match gate.kind {
            GateKind::And => gate.inputs.iter().all(|i| values[i.as_str()]),
            GateKind::Not => !values[gate.inputs[0].as_str()],
        };
        values.insert(&gate.output, value);
    }
    (0..circuit.states.len())
        .map(|i| values[format!("NS{}", i).as_str()])
        .collect()
}

/// Whether some input sequence drives the reset state to `target` after
/// exactly `depth` cycles
pub fn reachable(circuit: &RandomCircuit, target: &[bool], depth: usize) -> bool {
    let width = circuit.inputs.len();
    let total_bits = width * depth;
    (0u64..1 << total_bits).any(|sequence| {
        let mut state = vec![false; circuit.states.len()];
        for cycle in 0..depth {
            let inputs: Vec<bool> = (0..width)
                .map(|j| (sequence >> (cycle * width + j)) & 1 == 1)
                .collect();
            state = step(circuit, &state, &inputs);
        }
        state == target
    })
}

/// Exhaustive satisfiability check for small instances
pub fn brute_force_sat(instance: &CnfInstance) -> bool {
    let n = instance.num_vars() as usize;
    assert!(n <= 22, "instance too large for brute force");
    (0u64..1 << n).any(|bits| {
        let assignment: Vec<bool> = (0..n).map(|i| (bits >> i) & 1 == 1).collect();
        instance.is_satisfied_by(&assignment)
    })
}
