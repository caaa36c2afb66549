//! Narrow boundary to a 0-1 integer programming engine.
//!
//! Callers describe a maximisation problem over binary variables with linear
//! constraints and hand it to any [`OptimizationEngine`]. Nothing outside this
//! module depends on how the engine searches.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod branch_and_bound;
pub use branch_and_bound::BranchAndBound;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    AtMost,
    AtLeast,
    Equal,
}

/// `Σ coefficient · x[variable]  (≤ | ≥ | =)  rhs`
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<(usize, i64)>,
    pub sense: Sense,
    pub rhs: i64,
}

impl LinearConstraint {
    pub fn lhs(&self, values: &[bool]) -> i64 {
        self.terms
            .iter()
            .filter(|&&(var, _)| values[var])
            .map(|&(_, coefficient)| coefficient)
            .sum()
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            Sense::AtMost => lhs <= self.rhs,
            Sense::AtLeast => lhs >= self.rhs,
            Sense::Equal => lhs == self.rhs,
        }
    }
}

/// A maximisation problem over binary variables.
#[derive(Debug, Clone, Default)]
pub struct BinaryProgram {
    objective: Vec<i64>,
    constraints: Vec<LinearConstraint>,
}

impl BinaryProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable with the given objective coefficient and returns its index.
    pub fn add_variable(&mut self, objective: i64) -> usize {
        self.objective.push(objective);
        self.objective.len() - 1
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        terms: Vec<(usize, i64)>,
        sense: Sense,
        rhs: i64,
    ) -> Result<()> {
        let name = name.into();
        if let Some(&(var, _)) = terms.iter().find(|&&(var, _)| var >= self.objective.len()) {
            return Err(anyhow!(
                "Constraint '{}' references unknown variable {}",
                name,
                var
            ));
        }
        self.constraints.push(LinearConstraint {
            name,
            terms,
            sense,
            rhs,
        });
        Ok(())
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn objective(&self) -> &[i64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective_value(&self, values: &[bool]) -> i64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, &value)| value)
            .map(|(&coefficient, _)| coefficient)
            .sum()
    }

    /// Name of the first violated constraint, if any.
    pub fn first_violation(&self, values: &[bool]) -> Option<&str> {
        if values.len() != self.objective.len() {
            return Some("assignment length");
        }
        self.constraints
            .iter()
            .find(|c| !c.is_satisfied(values))
            .map(|c| c.name.as_str())
    }

    pub fn is_feasible(&self, values: &[bool]) -> bool {
        self.first_violation(values).is_none()
    }
}

/// Work limits for a single solve. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveBudget {
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
}

impl SolveBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search finished; the assignment is optimal.
    Optimal,
    /// The budget ran out; the assignment, if any, is the best incumbent.
    LimitReached,
    /// The search finished without finding any feasible assignment.
    Infeasible,
}

#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub assignment: Option<Vec<bool>>,
    pub objective: i64,
    pub status: SolveStatus,
    pub nodes: u64,
}

pub trait OptimizationEngine {
    /// Maximises `program` within `budget`. A feasible `warm_start` is used as
    /// the initial incumbent; an infeasible one is ignored.
    fn solve(
        &self,
        program: &BinaryProgram,
        budget: &SolveBudget,
        warm_start: Option<&[bool]>,
    ) -> Result<SolveOutcome>;
}
