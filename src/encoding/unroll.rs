//! Bounded unrolling of a base frame into a reachability instance
//!
//! Frame `u` reuses the base clauses with every variable shifted by
//! `u * total_vars`. Frames are chained by equating `NS<i>` in frame `u-1`
//! with `S<i>` in frame `u`. Frame 0 starts from the all-zero reset state,
//! and the next-state signals of the last frame are pinned to the target.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::encoding::cnf::{Clause, CnfInstance, Lit, Var};
use crate::encoding::compiler::BaseCircuit;
use crate::error::{EncodeError, EncodeResult};

/// Target register values, bit 0 first
///
/// Parsed from a bit string written most significant bit first, so the
/// last character is bit 0 (`NS0`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetState {
    bits: Vec<bool>,
}

impl TargetState {
    /// Build from values ordered bit 0 first
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }
}

impl FromStr for TargetState {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                found => return Err(EncodeError::InvalidTargetBit { position, found }),
            }
        }
        bits.reverse();
        Ok(Self { bits })
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in self.bits.iter().rev() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Number of transition steps for a user-facing depth in clock cycles
pub fn transition_steps(depth: i64) -> EncodeResult<usize> {
    if depth < 1 {
        return Err(EncodeError::InvalidDepth(depth));
    }
    usize::try_from(depth - 1).map_err(|_| EncodeError::InvalidDepth(depth))
}

/// Where a base variable lives in a given frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub vars_per_frame: u32,
    pub frames: usize,
}

impl FrameLayout {
    /// Layout for `k` transition steps, checking the id range fits
    pub fn new(vars_per_frame: u32, k: usize) -> EncodeResult<Self> {
        let frames = k
            .checked_add(1)
            .ok_or(EncodeError::VariableOverflow {
                vars_per_frame,
                frames: usize::MAX,
            })?;
        let layout = Self {
            vars_per_frame,
            frames,
        };
        layout.total_vars()?;
        Ok(layout)
    }

    /// Offset added to every variable of `frame`
    pub fn offset(&self, frame: usize) -> u32 {
        self.vars_per_frame * frame as u32
    }

    pub fn at(&self, var: Var, frame: usize) -> Var {
        var.shifted(self.offset(frame))
    }

    /// `vars_per_frame * frames`, bounded by the signed 32-bit DIMACS range
    pub fn total_vars(&self) -> EncodeResult<u32> {
        u32::try_from(self.frames)
            .ok()
            .and_then(|frames| self.vars_per_frame.checked_mul(frames))
            .filter(|&total| total <= i32::MAX as u32)
            .ok_or(EncodeError::VariableOverflow {
                vars_per_frame: self.vars_per_frame,
                frames: self.frames,
            })
    }

    pub fn last_frame(&self) -> usize {
        self.frames - 1
    }
}

/// Unroll `base` over `k` transition steps (`k + 1` frames) to reach `target`
///
/// Clause order: reset units, then for each frame its copy of the base
/// clauses followed by the links from the previous frame, then the target
/// units.
pub fn unroll(base: &BaseCircuit, k: usize, target: &TargetState) -> EncodeResult<CnfInstance> {
    let pairing = base.pairing();
    if target.width() != pairing.width() {
        return Err(EncodeError::TargetWidthMismatch {
            expected: pairing.width(),
            found: target.width(),
        });
    }
    let target_vars = (0..target.width())
        .map(|i| {
            pairing
                .by_index(i)
                .map(|pair| pair.next_state)
                .ok_or(EncodeError::MissingTargetSignal(i))
        })
        .collect::<EncodeResult<Vec<_>>>()?;

    let layout = FrameLayout::new(base.total_vars(), k)?;
    let total_vars = layout.total_vars()?;

    let mut clauses = Vec::new();

    // Reset: every register starts at 0
    for &state in pairing.state_vars() {
        clauses.push(Clause::unit(state.negative()));
    }

    for frame in 0..layout.frames {
        let offset = layout.offset(frame);
        clauses.extend(base.clauses().iter().map(|c| c.shifted(offset)));

        if frame > 0 {
            for pair in pairing.pairs() {
                let next = layout.at(pair.next_state, frame - 1);
                let state = layout.at(pair.state, frame);
                clauses.push(Clause::new(vec![next.positive(), state.negative()]));
                clauses.push(Clause::new(vec![next.negative(), state.positive()]));
            }
        }
    }

    let last = layout.last_frame();
    for (&var, &bit) in target_vars.iter().zip(target.bits()) {
        clauses.push(Clause::unit(Lit::with_value(layout.at(var, last), bit)));
    }

    debug!(frames = layout.frames, clauses = clauses.len(), "unrolled");
    info!(
        total_vars,
        clauses = clauses.len(),
        target = %target,
        "built reachability instance"
    );

    Ok(CnfInstance::new(total_vars, clauses))
}
