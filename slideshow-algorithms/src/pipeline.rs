use crate::{
    candidates::generate_candidates,
    config::Hyperparameters,
    engine::{BranchAndBound, OptimizationEngine},
    selector::SlideSelector,
    sequence::{SequenceBuilder, Slideshow},
};
use anyhow::Result;
use serde_json::{Map, Value};
use slideshow_challenges::slideshow::{Challenge, Solution};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SolveReport {
    pub slideshow: Slideshow,
    pub score: u64,
    pub num_candidates: usize,
    pub proven_optimal: bool,
}

pub fn solve(challenge: &Challenge, hyperparameters: &Hyperparameters) -> Result<SolveReport> {
    solve_with_engine(challenge, hyperparameters, &BranchAndBound)
}

/// Candidates, then selection, then ordering, then scoring.
pub fn solve_with_engine(
    challenge: &Challenge,
    hyperparameters: &Hyperparameters,
    engine: &dyn OptimizationEngine,
) -> Result<SolveReport> {
    let candidates = generate_candidates(challenge, hyperparameters.pairing);
    info!(
        photos = challenge.num_photos(),
        candidates = candidates.len(),
        pairs = candidates.num_pairs(),
        pairing = ?hyperparameters.pairing,
        "generated candidate slides"
    );

    let selector = SlideSelector::new(engine, hyperparameters.cover, hyperparameters.budget());
    let selection = selector.select(challenge, &candidates)?;

    let covered: usize = selection.slides.iter().map(|s| s.key().photo_ids().len()).sum();
    if covered != challenge.num_photos() {
        warn!(
            covered,
            photos = challenge.num_photos(),
            "selection does not cover every photo"
        );
    }

    let slideshow = SequenceBuilder::new(hyperparameters.improve_passes).build(challenge, &selection);
    let score = slideshow.score(challenge);
    info!(slides = slideshow.len(), score, "built slideshow");

    Ok(SolveReport {
        slideshow,
        score,
        num_candidates: candidates.len(),
        proven_optimal: selection.proven_optimal,
    })
}

pub fn solve_challenge(
    challenge: &Challenge,
    save_solution: &dyn Fn(&Solution) -> Result<()>,
    hyperparameters: &Option<Map<String, Value>>,
) -> Result<()> {
    let hyperparameters = Hyperparameters::from_map(hyperparameters)?;
    let report = solve(challenge, &hyperparameters)?;
    save_solution(&report.slideshow.to_solution())
}
