//! CNF building blocks: variables, literals, clauses and instances

use std::fmt;

/// A propositional variable, numbered from 1 as in DIMACS
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl Var {
    /// Create a variable from its 1-based DIMACS id
    ///
    /// Returns `None` for 0, which DIMACS reserves as the clause terminator.
    pub fn from_dimacs(id: u32) -> Option<Self> {
        (id != 0).then_some(Var(id))
    }

    /// Variable at 0-based position `index` (`0` is DIMACS id 1)
    pub fn from_index(index: usize) -> Self {
        Var(index as u32 + 1)
    }

    pub fn id(&self) -> u32 {
        self.0
    }

    /// 0-based position, the inverse of [`Var::from_index`]
    pub fn index(&self) -> usize {
        self.0 as usize - 1
    }

    /// The copy of this variable in another time frame
    pub fn shifted(self, offset: u32) -> Self {
        Var(self.0 + offset)
    }

    pub fn positive(self) -> Lit {
        Lit::positive(self)
    }

    pub fn negative(self) -> Lit {
        Lit::negative(self)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A variable with polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    var: Var,
    negated: bool,
}

impl Lit {
    pub fn positive(var: Var) -> Self {
        Lit {
            var,
            negated: false,
        }
    }

    pub fn negative(var: Var) -> Self {
        Lit { var, negated: true }
    }

    /// Literal with the given polarity (`true` = positive)
    pub fn with_value(var: Var, value: bool) -> Self {
        if value {
            Lit::positive(var)
        } else {
            Lit::negative(var)
        }
    }

    /// Parse a signed DIMACS literal
    pub fn from_dimacs(value: i64) -> Option<Self> {
        let id = u32::try_from(value.unsigned_abs()).ok()?;
        let var = Var::from_dimacs(id)?;
        Some(Lit::with_value(var, value > 0))
    }

    pub fn var(&self) -> Var {
        self.var
    }

    pub fn is_negative(&self) -> bool {
        self.negated
    }

    /// Signed DIMACS form, negative for negation
    pub fn to_dimacs(&self) -> i64 {
        let id = i64::from(self.var.id());
        if self.negated { -id } else { id }
    }

    /// Same literal moved by `offset` variables, sign preserved
    pub fn shifted(self, offset: u32) -> Self {
        Lit {
            var: self.var.shifted(offset),
            negated: self.negated,
        }
    }

    /// Truth value under a variable assignment
    pub fn eval(&self, value: bool) -> bool {
        value != self.negated
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A disjunction of literals
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause(Vec<Lit>);

impl Clause {
    pub fn new(lits: Vec<Lit>) -> Self {
        Clause(lits)
    }

    pub fn unit(lit: Lit) -> Self {
        Clause(vec![lit])
    }

    pub fn lits(&self) -> &[Lit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of this clause for time frame at `offset`
    pub fn shifted(&self, offset: u32) -> Self {
        Clause(self.0.iter().map(|lit| lit.shifted(offset)).collect())
    }

    /// Largest variable id referenced, 0 for the empty clause
    pub fn max_var(&self) -> u32 {
        self.0.iter().map(|l| l.var().id()).max().unwrap_or(0)
    }

    /// Signed DIMACS literals, without the terminating 0
    pub fn to_dimacs(&self) -> Vec<i64> {
        self.0.iter().map(Lit::to_dimacs).collect()
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(lits: Vec<Lit>) -> Self {
        Clause(lits)
    }
}

impl fmt::Display for Clause {
    /// DIMACS clause line, `0`-terminated
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for lit in &self.0 {
            write!(f, "{} ", lit)?;
        }
        write!(f, "0")
    }
}

/// The translation's output: a variable count and an ordered clause list
///
/// Immutable once built by the unroller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnfInstance {
    num_vars: u32,
    clauses: Vec<Clause>,
}

impl CnfInstance {
    pub fn new(num_vars: u32, clauses: Vec<Clause>) -> Self {
        Self { num_vars, clauses }
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Whether a complete assignment satisfies every clause
    ///
    /// `assignment[i]` is the value of variable `i + 1`. Variables beyond
    /// the slice count as false.
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.lits().iter().any(|lit| {
                let value = assignment
                    .get(lit.var().index())
                    .copied()
                    .unwrap_or(false);
                lit.eval(value)
            })
        })
    }
}
