//! Tseitin encoding of primitive gates

use crate::encoding::allocator::VariableAllocator;
use crate::encoding::cnf::{Clause, Lit};
use crate::error::EncodeResult;
use crate::ir::{Gate, GateKind};

/// Encode `gate` as clauses equating its output variable with its function
///
/// Signals not seen before are allocated on demand, output first, then
/// inputs left to right.
pub fn encode_gate(gate: &Gate, alloc: &mut VariableAllocator) -> EncodeResult<Vec<Clause>> {
    gate.validate()?;

    let output = alloc.allocate(&gate.output).positive();
    let inputs: Vec<Lit> = gate
        .inputs
        .iter()
        .map(|i| alloc.allocate(i).positive())
        .collect();

    let clauses = match gate.kind {
        GateKind::And => encode_and(output, &inputs),
        GateKind::Not => encode_not(output, inputs[0]),
    };
    Ok(clauses)
}

/// `o <-> (i_1 & ... & i_n)`
fn encode_and(output: Lit, inputs: &[Lit]) -> Vec<Clause> {
    let mut clauses = Vec::with_capacity(inputs.len() + 1);

    // o -> i_j
    for &input in inputs {
        clauses.push(Clause::new(vec![!output, input]));
    }

    // (i_1 & ... & i_n) -> o
    let mut all = Vec::with_capacity(inputs.len() + 1);
    all.push(output);
    all.extend(inputs.iter().map(|&i| !i));
    clauses.push(Clause::new(all));

    clauses
}

/// `o <-> !i`
fn encode_not(output: Lit, input: Lit) -> Vec<Clause> {
    vec![
        Clause::new(vec![!output, !input]),
        Clause::new(vec![output, input]),
    ]
}
