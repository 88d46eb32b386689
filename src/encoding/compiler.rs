//! Single-frame compilation of a netlist into Tseitin clauses

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::encoding::allocator::VariableAllocator;
use crate::encoding::cnf::{Clause, Var};
use crate::encoding::tseitin::encode_gate;
use crate::error::{EncodeError, EncodeResult};
use crate::ir::{Gate, Netlist, SignalRole, paired_state_name};

/// A register's next-state variable and the state variable it feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterPair {
    /// Register index, the digits in `S<i>` / `NS<i>`
    pub index: usize,
    pub next_state: Var,
    pub state: Var,
}

/// State/next-state relation, built once after all signals are allocated
#[derive(Debug, Clone, Default)]
pub struct StatePairing {
    state_vars: Vec<Var>,
    pairs: Vec<RegisterPair>,
    by_index: BTreeMap<usize, usize>,
}

impl StatePairing {
    fn build(signals: &VariableAllocator) -> EncodeResult<Self> {
        let mut pairing = StatePairing::default();
        let mut seen: HashMap<SignalRole, &str> = HashMap::new();
        let mut next_states = Vec::new();

        for (name, var) in signals.iter() {
            let role = SignalRole::of(name);
            let Some(index) = role.register_index() else {
                continue;
            };
            if let Some(first) = seen.insert(role, name) {
                return Err(EncodeError::DuplicateRegisterIndex {
                    index,
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            match role {
                SignalRole::State(_) => pairing.state_vars.push(var),
                SignalRole::NextState(_) => next_states.push((name, index, var)),
                SignalRole::Other => {}
            }
        }

        for (name, index, next_state) in next_states {
            let expected_state = paired_state_name(name).unwrap_or_default();
            let state = signals.get(&expected_state).ok_or_else(|| {
                EncodeError::UnpairedStateSignal {
                    next: name.to_string(),
                    expected_state: expected_state.clone(),
                }
            })?;
            pairing.by_index.insert(index, pairing.pairs.len());
            pairing.pairs.push(RegisterPair {
                index,
                next_state,
                state,
            });
        }

        Ok(pairing)
    }

    /// Every state-register variable, in id order
    pub fn state_vars(&self) -> &[Var] {
        &self.state_vars
    }

    /// Register pairs in next-state allocation order
    pub fn pairs(&self) -> &[RegisterPair] {
        &self.pairs
    }

    /// Pair whose next-state signal is `NS<index>`
    pub fn by_index(&self, index: usize) -> Option<&RegisterPair> {
        self.by_index.get(&index).map(|&i| &self.pairs[i])
    }

    /// Number of distinct next-state signals
    pub fn width(&self) -> usize {
        self.pairs.len()
    }
}

/// Frame-0 encoding of a circuit
#[derive(Debug, Clone)]
pub struct BaseCircuit {
    clauses: Vec<Clause>,
    signals: VariableAllocator,
    pairing: StatePairing,
    driven: HashSet<Var>,
}

impl BaseCircuit {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Variables per time frame
    pub fn total_vars(&self) -> u32 {
        self.signals.count()
    }

    pub fn signals(&self) -> &VariableAllocator {
        &self.signals
    }

    pub fn pairing(&self) -> &StatePairing {
        &self.pairing
    }

    /// Whether `var` is the output of some gate
    pub fn is_driven(&self, var: Var) -> bool {
        self.driven.contains(&var)
    }
}

/// Compile the gates of one time frame
///
/// State registers are allocated first, in the order given, so they take
/// the lowest ids. Gate clauses follow gate order.
pub fn compile<S: AsRef<str>>(state_signals: &[S], gates: &[Gate]) -> EncodeResult<BaseCircuit> {
    let mut signals = VariableAllocator::new();

    for name in state_signals {
        let name = name.as_ref();
        if !SignalRole::of(name).is_state() {
            return Err(EncodeError::InvalidStateSignal(name.to_string()));
        }
        signals.allocate(name);
    }

    let mut clauses = Vec::new();
    let mut driven = HashSet::new();
    for gate in gates {
        clauses.extend(encode_gate(gate, &mut signals)?);
        if let Some(output) = signals.get(&gate.output) {
            driven.insert(output);
        }
    }

    let pairing = StatePairing::build(&signals)?;

    debug!(
        total_vars = signals.count(),
        clauses = clauses.len(),
        registers = pairing.width(),
        "compiled base frame"
    );

    Ok(BaseCircuit {
        clauses,
        signals,
        pairing,
        driven,
    })
}

/// Compile a loaded netlist
pub fn compile_netlist(netlist: &Netlist) -> EncodeResult<BaseCircuit> {
    compile(&netlist.state_signals, &netlist.gates)
}
