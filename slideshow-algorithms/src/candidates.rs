use serde::{Deserialize, Serialize};
use slideshow_challenges::slideshow::{Challenge, Orientation, Slide};

/// How vertical photos are paired into candidate slides.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Every unordered pair of distinct vertical photos. Leaves the pairing
    /// decision to the selector at the cost of `O(v²)` candidates.
    AllPairs,
    /// Lowest-id unpaired photo takes the partner with the largest tag union,
    /// ties to the lowest partner id. Exactly `⌊v/2⌋` disjoint pairs.
    #[default]
    GreedyMaxUnion,
}

/// Every slide the selector may choose from, sorted by slide key.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    slides: Vec<Slide>,
}

impl CandidateSet {
    pub fn new(mut slides: Vec<Slide>) -> Self {
        slides.sort_by_key(|s| s.key());
        slides.dedup();
        Self { slides }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn num_pairs(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| matches!(s, Slide::Pair(..)))
            .count()
    }
}

pub fn generate_candidates(challenge: &Challenge, strategy: PairingStrategy) -> CandidateSet {
    let mut slides: Vec<Slide> = Vec::with_capacity(challenge.num_photos());
    let mut verticals: Vec<usize> = Vec::new();
    for photo in &challenge.photos {
        match photo.orientation {
            Orientation::Horizontal => slides.push(Slide::Single(photo.id)),
            Orientation::Vertical => verticals.push(photo.id),
        }
    }
    verticals.sort_unstable();

    match strategy {
        PairingStrategy::AllPairs => {
            for (i, &a) in verticals.iter().enumerate() {
                for &b in &verticals[i + 1..] {
                    slides.push(Slide::Pair(a, b));
                }
            }
        }
        PairingStrategy::GreedyMaxUnion => slides.extend(greedy_max_union(challenge, &verticals)),
    }

    CandidateSet::new(slides)
}

fn greedy_max_union(challenge: &Challenge, verticals: &[usize]) -> Vec<Slide> {
    let mut paired = vec![false; verticals.len()];
    let mut pairs = Vec::with_capacity(verticals.len() / 2);

    for i in 0..verticals.len() {
        if paired[i] {
            continue;
        }
        let tags = &challenge.photos[verticals[i]].tags;
        let mut best: Option<(usize, usize)> = None;
        for j in (i + 1)..verticals.len() {
            if paired[j] {
                continue;
            }
            let union = tags.union_len(&challenge.photos[verticals[j]].tags);
            if best.map_or(true, |(_, best_union)| union > best_union) {
                best = Some((j, union));
            }
        }
        if let Some((j, _)) = best {
            paired[i] = true;
            paired[j] = true;
            pairs.push(Slide::Pair(verticals[i], verticals[j]));
        }
    }
    pairs
}
