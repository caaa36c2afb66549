use crate::{
    candidates::CandidateSet,
    engine::{BinaryProgram, OptimizationEngine, Sense, SolveBudget, SolveStatus},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use slideshow_challenges::slideshow::{interest, Challenge, Orientation, Slide, TagSet};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How many times each photo must be covered by the selected slides.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoverMode {
    /// Every photo exactly once. With an odd number of vertical photos one of
    /// them is necessarily left out, so verticals are covered at most once and
    /// the number of pairs is fixed to `⌊v/2⌋`.
    #[default]
    Exact,
    /// Every photo at most once.
    Packing,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Photo {photo} is not covered by any candidate slide")]
    Uncoverable { photo: usize },

    #[error("Candidate slide {slide} references unknown photo {photo}")]
    UnknownPhoto { slide: Slide, photo: usize },

    #[error("No feasible selection found ({status:?} after {nodes} nodes)")]
    NoFeasibleSelection { status: SolveStatus, nodes: u64 },
}

/// Slides chosen from a candidate set, in slide key order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub slides: Vec<Slide>,
    /// Total co-selection interest of the chosen slides. `None` when the time
    /// limit ran out before it was summed.
    pub objective: Option<i64>,
    /// False when the solve budget ran out before the search finished.
    pub proven_optimal: bool,
}

/// Which candidates cover each photo, and how often each photo must be covered.
struct CoverRules {
    covering: Vec<Vec<usize>>,
    exactly_once: Vec<bool>,
    // fixed number of pairs when an odd vertical photo must be left out
    pinned_pairs: Option<usize>,
}

impl CoverRules {
    /// True when no two candidates share a photo and the cover constraints
    /// leave every candidate no choice but to be selected.
    fn forces_all(&self, slides: &[Slide]) -> bool {
        if self.covering.iter().any(|c| c.len() > 1) {
            return false;
        }
        let num_pairs = slides
            .iter()
            .filter(|s| matches!(s, Slide::Pair(..)))
            .count();
        if self.pinned_pairs.map_or(false, |pinned| pinned != num_pairs) {
            return false;
        }
        slides.iter().all(|slide| {
            slide.key().photo_ids().iter().any(|&id| self.exactly_once[id])
                || (matches!(slide, Slide::Pair(..)) && self.pinned_pairs.is_some())
        })
    }
}

/// Co-selection indicators added to the program.
struct Coselection {
    variables: usize,
    complete: bool,
}

fn past(deadline: Option<Instant>) -> bool {
    deadline.map_or(false, |d| Instant::now() >= d)
}

pub struct SlideSelector<'e, E: OptimizationEngine + ?Sized> {
    engine: &'e E,
    cover: CoverMode,
    budget: SolveBudget,
}

impl<'e, E: OptimizationEngine + ?Sized> SlideSelector<'e, E> {
    pub fn new(engine: &'e E, cover: CoverMode, budget: SolveBudget) -> Self {
        Self {
            engine,
            cover,
            budget,
        }
    }

    /// The time limit covers the whole call, model construction included.
    pub fn select(&self, challenge: &Challenge, candidates: &CandidateSet) -> Result<Selection> {
        let deadline = self.budget.time_limit.map(|limit| Instant::now() + limit);
        let slides = candidates.slides();
        let rules = self.cover_rules(challenge, slides)?;
        let tags: Vec<TagSet> = slides.iter().map(|s| challenge.slide_tags(s)).collect();

        if rules.forces_all(slides) {
            let objective = forced_objective(slides, &tags, deadline);
            info!(
                selected = slides.len(),
                objective = ?objective,
                "every candidate is forced, skipping the engine"
            );
            return Ok(Selection {
                slides: slides.to_vec(),
                objective,
                proven_optimal: true,
            });
        }

        let (program, coselection) = build_program(slides, &tags, &rules, deadline)?;
        debug!(
            candidates = slides.len(),
            coselection_variables = coselection.variables,
            constraints = program.constraints().len(),
            "built selection model"
        );
        if !coselection.complete {
            warn!(
                coselection_variables = coselection.variables,
                "time limit reached while building the selection model, solving the partial model"
            );
        }

        let warm_start = warm_start(&program, slides, challenge.num_photos());
        let budget = SolveBudget {
            time_limit: deadline.map(|d| d.saturating_duration_since(Instant::now())),
            node_limit: self.budget.node_limit,
        };
        let outcome = self
            .engine
            .solve(&program, &budget, Some(warm_start.as_slice()))?;

        let values = match outcome.assignment {
            Some(values) => values,
            None => {
                return Err(SelectionError::NoFeasibleSelection {
                    status: outcome.status,
                    nodes: outcome.nodes,
                }
                .into())
            }
        };
        let proven_optimal = outcome.status == SolveStatus::Optimal && coselection.complete;
        if outcome.status != SolveStatus::Optimal {
            warn!(
                nodes = outcome.nodes,
                objective = outcome.objective,
                "selection budget exhausted, keeping best incumbent"
            );
        }

        let selected: Vec<Slide> = slides
            .iter()
            .zip(&values)
            .filter(|(_, &chosen)| chosen)
            .map(|(&slide, _)| slide)
            .collect();
        info!(
            selected = selected.len(),
            candidates = slides.len(),
            objective = outcome.objective,
            proven_optimal,
            "selected slides"
        );
        Ok(Selection {
            slides: selected,
            objective: coselection.complete.then_some(outcome.objective),
            proven_optimal,
        })
    }

    fn cover_rules(&self, challenge: &Challenge, slides: &[Slide]) -> Result<CoverRules> {
        let num_photos = challenge.num_photos();
        let mut covering: Vec<Vec<usize>> = vec![Vec::new(); num_photos];
        for (i, slide) in slides.iter().enumerate() {
            for &photo in slide.key().photo_ids() {
                if photo >= num_photos {
                    return Err(SelectionError::UnknownPhoto {
                        slide: *slide,
                        photo,
                    }
                    .into());
                }
                covering[photo].push(i);
            }
        }

        let num_vertical = challenge.photos.iter().filter(|p| p.is_vertical()).count();
        let odd_verticals = num_vertical % 2 == 1;
        let exactly_once: Vec<bool> = challenge
            .photos
            .iter()
            .map(|photo| match (self.cover, photo.orientation) {
                (CoverMode::Packing, _) => false,
                (CoverMode::Exact, Orientation::Horizontal) => true,
                (CoverMode::Exact, Orientation::Vertical) => !odd_verticals,
            })
            .collect();
        if let Some(photo) = (0..num_photos).find(|&id| exactly_once[id] && covering[id].is_empty())
        {
            return Err(SelectionError::Uncoverable { photo }.into());
        }

        let pinned_pairs = (self.cover == CoverMode::Exact && odd_verticals && num_vertical > 1)
            .then_some(num_vertical / 2);
        Ok(CoverRules {
            covering,
            exactly_once,
            pinned_pairs,
        })
    }
}

/// Variables `0..slides.len()` select candidates in the same order; the
/// remaining variables are co-selection indicators. Indicators stop being
/// added once `deadline` passes.
fn build_program(
    slides: &[Slide],
    tags: &[TagSet],
    rules: &CoverRules,
    deadline: Option<Instant>,
) -> Result<(BinaryProgram, Coselection)> {
    let mut program = BinaryProgram::new();
    for _ in slides {
        program.add_variable(0);
    }

    for (photo, covering) in rules.covering.iter().enumerate() {
        let terms: Vec<(usize, i64)> = covering.iter().map(|&i| (i, 1)).collect();
        if rules.exactly_once[photo] {
            program.add_constraint(format!("cover_{}", photo), terms, Sense::Equal, 1)?;
        } else if !terms.is_empty() {
            program.add_constraint(format!("cover_{}", photo), terms, Sense::AtMost, 1)?;
        }
    }

    let singles: Vec<(usize, i64)> = slides
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, Slide::Single(_)))
        .map(|(i, _)| (i, 1))
        .collect();
    let pairs: Vec<(usize, i64)> = slides
        .iter()
        .enumerate()
        .filter(|(_, s)| matches!(s, Slide::Pair(..)))
        .map(|(i, _)| (i, 1))
        .collect();
    if let Some(pinned) = rules.pinned_pairs {
        program.add_constraint("maximal_pairs", pairs.clone(), Sense::Equal, pinned as i64)?;
    }
    if !singles.is_empty() {
        program.add_constraint("some_single", singles, Sense::AtLeast, 1)?;
    }
    if !pairs.is_empty() {
        program.add_constraint("some_pair", pairs, Sense::AtLeast, 1)?;
    }

    // Overlapping candidates can never be chosen together and zero-interest
    // pairs add nothing, so neither gets an indicator.
    let mut coselection = Coselection {
        variables: 0,
        complete: true,
    };
    for i in 0..slides.len() {
        if past(deadline) {
            coselection.complete = false;
            break;
        }
        for j in (i + 1)..slides.len() {
            if slides[i].overlaps(&slides[j]) {
                continue;
            }
            let weight = interest(&tags[i], &tags[j]) as i64;
            if weight == 0 {
                continue;
            }
            let y = program.add_variable(weight);
            program.add_constraint(
                format!("coselect_{}_{}_a", i, j),
                vec![(y, 1), (i, -1)],
                Sense::AtMost,
                0,
            )?;
            program.add_constraint(
                format!("coselect_{}_{}_b", i, j),
                vec![(y, 1), (j, -1)],
                Sense::AtMost,
                0,
            )?;
            coselection.variables += 1;
        }
    }

    Ok((program, coselection))
}

/// Sum of interest over every pair of disjoint candidates, or `None` if the
/// deadline passes first.
fn forced_objective(slides: &[Slide], tags: &[TagSet], deadline: Option<Instant>) -> Option<i64> {
    let mut total = 0;
    for i in 0..slides.len() {
        if past(deadline) {
            return None;
        }
        for j in (i + 1)..slides.len() {
            if !slides[i].overlaps(&slides[j]) {
                total += interest(&tags[i], &tags[j]) as i64;
            }
        }
    }
    Some(total)
}

/// Takes candidates in key order whenever all their photos are still free,
/// then switches on every co-selection indicator both of whose slides were
/// taken. The engine discards it if it breaks a constraint.
fn warm_start(program: &BinaryProgram, slides: &[Slide], num_photos: usize) -> Vec<bool> {
    let mut values = vec![false; program.num_variables()];
    let mut used = vec![false; num_photos];
    for (i, slide) in slides.iter().enumerate() {
        let ids = slide.key();
        if ids.photo_ids().iter().all(|&id| !used[id]) {
            for &id in ids.photo_ids() {
                used[id] = true;
            }
            values[i] = true;
        }
    }
    for y in slides.len()..values.len() {
        values[y] = true;
    }
    for constraint in program.constraints() {
        if let [(y, 1), (x, -1)] = *constraint.terms.as_slice() {
            if y >= slides.len() && !values[x] {
                values[y] = false;
            }
        }
    }
    values
}
