use super::{BinaryProgram, OptimizationEngine, Sense, SolveBudget, SolveOutcome, SolveStatus};
use anyhow::Result;
use std::{collections::VecDeque, time::Instant};

/// Depth-first branch and bound over binary variables.
///
/// Variables are branched in index order, `true` first. After every decision
/// the touched constraints are propagated: a free variable whose other value
/// would make a constraint unsatisfiable is fixed. A node is pruned when the
/// fixed objective plus every positive free coefficient cannot beat the
/// incumbent.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl OptimizationEngine for BranchAndBound {
    fn solve(
        &self,
        program: &BinaryProgram,
        budget: &SolveBudget,
        warm_start: Option<&[bool]>,
    ) -> Result<SolveOutcome> {
        let mut search = Search::new(program, budget);
        if let Some(values) = warm_start {
            if program.is_feasible(values) {
                search.best = Some((program.objective_value(values), values.to_vec()));
            }
        }

        let all_constraints: Vec<usize> = (0..program.constraints().len()).collect();
        if search.propagate(all_constraints) {
            search.search(0);
        }

        let status = if search.limit_hit {
            SolveStatus::LimitReached
        } else if search.best.is_some() {
            SolveStatus::Optimal
        } else {
            SolveStatus::Infeasible
        };
        let (objective, assignment) = match search.best {
            Some((objective, values)) => (objective, Some(values)),
            None => (0, None),
        };
        Ok(SolveOutcome {
            assignment,
            objective,
            status,
            nodes: search.nodes,
        })
    }
}

struct Search<'a> {
    program: &'a BinaryProgram,
    budget: &'a SolveBudget,
    started: Instant,
    // variable -> (constraint, coefficient)
    occurrences: Vec<Vec<(usize, i64)>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    // per constraint: sum over fixed variables, and the positive / negative
    // coefficient sums over free variables
    fixed_lhs: Vec<i64>,
    free_pos: Vec<i64>,
    free_neg: Vec<i64>,
    fixed_objective: i64,
    free_objective: i64,
    best: Option<(i64, Vec<bool>)>,
    nodes: u64,
    limit_hit: bool,
}

impl<'a> Search<'a> {
    fn new(program: &'a BinaryProgram, budget: &'a SolveBudget) -> Self {
        let n = program.num_variables();
        let constraints = program.constraints();
        let mut occurrences = vec![Vec::new(); n];
        let mut free_pos = vec![0; constraints.len()];
        let mut free_neg = vec![0; constraints.len()];
        for (c, constraint) in constraints.iter().enumerate() {
            for &(var, coefficient) in &constraint.terms {
                occurrences[var].push((c, coefficient));
                if coefficient > 0 {
                    free_pos[c] += coefficient;
                } else {
                    free_neg[c] += coefficient;
                }
            }
        }
        Self {
            program,
            budget,
            started: Instant::now(),
            occurrences,
            values: vec![None; n],
            trail: Vec::with_capacity(n),
            fixed_lhs: vec![0; constraints.len()],
            free_pos,
            free_neg,
            fixed_objective: 0,
            free_objective: program.objective().iter().filter(|&&c| c > 0).sum(),
            best: None,
            nodes: 0,
            limit_hit: false,
        }
    }

    fn out_of_budget(&self) -> bool {
        if let Some(limit) = self.budget.node_limit {
            if self.nodes >= limit {
                return true;
            }
        }
        if let Some(limit) = self.budget.time_limit {
            if self.nodes % 64 == 0 && self.started.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    fn search(&mut self, from: usize) {
        if self.out_of_budget() {
            self.limit_hit = true;
            return;
        }
        self.nodes += 1;

        if let Some((best, _)) = &self.best {
            if self.fixed_objective + self.free_objective <= *best {
                return;
            }
        }

        let var = match (from..self.values.len()).find(|&v| self.values[v].is_none()) {
            Some(var) => var,
            None => {
                self.record_incumbent();
                return;
            }
        };

        for value in [true, false] {
            let mark = self.trail.len();
            self.assign(var, value);
            let touched: Vec<usize> = self.occurrences[var].iter().map(|&(c, _)| c).collect();
            if self.propagate(touched) {
                self.search(var + 1);
            }
            self.undo_to(mark);
            if self.limit_hit {
                return;
            }
        }
    }

    fn record_incumbent(&mut self) {
        let improves = match &self.best {
            Some((best, _)) => self.fixed_objective > *best,
            None => true,
        };
        if improves {
            let values = self.values.iter().map(|v| v.unwrap_or(false)).collect();
            self.best = Some((self.fixed_objective, values));
        }
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.values[var] = Some(value);
        self.trail.push(var);
        for &(c, coefficient) in &self.occurrences[var] {
            if coefficient > 0 {
                self.free_pos[c] -= coefficient;
            } else {
                self.free_neg[c] -= coefficient;
            }
            if value {
                self.fixed_lhs[c] += coefficient;
            }
        }
        let coefficient = self.program.objective()[var];
        if coefficient > 0 {
            self.free_objective -= coefficient;
        }
        if value {
            self.fixed_objective += coefficient;
        }
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let var = match self.trail.pop() {
                Some(var) => var,
                None => break,
            };
            let value = self.values[var].take().unwrap_or(false);
            for &(c, coefficient) in &self.occurrences[var] {
                if coefficient > 0 {
                    self.free_pos[c] += coefficient;
                } else {
                    self.free_neg[c] += coefficient;
                }
                if value {
                    self.fixed_lhs[c] -= coefficient;
                }
            }
            let coefficient = self.program.objective()[var];
            if coefficient > 0 {
                self.free_objective += coefficient;
            }
            if value {
                self.fixed_objective -= coefficient;
            }
        }
    }

    /// Returns false on conflict. Assignments made here stay on the trail and
    /// are undone by the caller.
    fn propagate(&mut self, constraints: Vec<usize>) -> bool {
        let program = self.program;
        let mut queued = vec![false; program.constraints().len()];
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(constraints.len());
        for c in constraints {
            if !queued[c] {
                queued[c] = true;
                queue.push_back(c);
            }
        }

        while let Some(c) = queue.pop_front() {
            queued[c] = false;
            let constraint = &program.constraints()[c];
            let upper = matches!(constraint.sense, Sense::AtMost | Sense::Equal);
            let lower = matches!(constraint.sense, Sense::AtLeast | Sense::Equal);
            let min_lhs = self.fixed_lhs[c] + self.free_neg[c];
            let max_lhs = self.fixed_lhs[c] + self.free_pos[c];
            if (upper && min_lhs > constraint.rhs) || (lower && max_lhs < constraint.rhs) {
                return false;
            }

            let forced = constraint.terms.iter().find_map(|&(var, coefficient)| {
                if self.values[var].is_some() || coefficient == 0 {
                    return None;
                }
                // flipping a free variable away from its bound-achieving value
                // moves the bound by |coefficient|
                if upper && min_lhs + coefficient.abs() > constraint.rhs {
                    return Some((var, coefficient < 0));
                }
                if lower && max_lhs - coefficient.abs() < constraint.rhs {
                    return Some((var, coefficient > 0));
                }
                None
            });

            if let Some((var, value)) = forced {
                self.assign(var, value);
                for &(touched, _) in &self.occurrences[var] {
                    if !queued[touched] {
                        queued[touched] = true;
                        queue.push_back(touched);
                    }
                }
                // aggregates changed, so revisit this constraint too
                if !queued[c] {
                    queued[c] = true;
                    queue.push_back(c);
                }
            }
        }
        true
    }
}
