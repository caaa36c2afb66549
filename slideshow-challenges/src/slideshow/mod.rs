use crate::QUALITY_PRECISION;
use anyhow::{anyhow, Result};
use rand::{rngs::SmallRng, seq::index, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use std::collections::HashSet;

mod error;
mod format;
mod photo;
mod slide;
mod tags;
pub use error::{FormatError, SolutionError};
pub use photo::{Orientation, Photo};
pub use slide::{Slide, SlideKey};
pub use tags::{interest, TagSet};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Track {
    pub num_photos: usize,
    pub vertical_percent: u32,
    pub vocabulary_size: usize,
    pub max_tags: usize,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            num_photos: 100,
            vertical_percent: 50,
            vocabulary_size: 40,
            max_tags: 8,
        }
    }
}

/// A slideshow as written to or read from a solution file: photo ids per slide,
/// in display order. Nothing about it is checked until `verify_solution`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub slides: Vec<Vec<usize>>,
}

impl Solution {
    pub fn new() -> Self {
        Self { slides: Vec::new() }
    }

    pub fn from_slides(slides: &[Slide]) -> Self {
        Self {
            slides: slides.iter().map(|s| s.photo_ids()).collect(),
        }
    }
}

impl TryFrom<Map<String, Value>> for Solution {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Challenge {
    pub photos: Vec<Photo>,
    /// Tag names indexed by interned tag id.
    pub vocabulary: Vec<String>,
}

impl Challenge {
    pub fn new(photos: Vec<Photo>, vocabulary: Vec<String>) -> Self {
        Self { photos, vocabulary }
    }

    pub fn generate_instance(seed: &[u8; 32], track: &Track) -> Result<Self> {
        if track.vertical_percent > 100 {
            return Err(anyhow!(
                "Vertical percent ({}) must be at most 100",
                track.vertical_percent
            ));
        }
        if track.num_photos > 0 && (track.vocabulary_size == 0 || track.max_tags == 0) {
            return Err(anyhow!("Vocabulary size and max tags must be positive"));
        }
        let mut rng = SmallRng::from_seed(*seed);
        let max_tags = track.max_tags.min(track.vocabulary_size);
        let vocabulary: Vec<String> = (0..track.vocabulary_size)
            .map(|i| format!("t{}", i))
            .collect();

        let photos = (0..track.num_photos)
            .map(|id| {
                let orientation = if rng.gen_range(0..100) < track.vertical_percent {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
                let num_tags = rng.gen_range(1..=max_tags);
                let tags = index::sample(&mut rng, track.vocabulary_size, num_tags)
                    .into_iter()
                    .map(|t| t as u32)
                    .collect();
                Photo {
                    id,
                    orientation,
                    tags,
                }
            })
            .collect();

        Ok(Self::new(photos, vocabulary))
    }

    pub fn num_photos(&self) -> usize {
        self.photos.len()
    }

    pub fn photo(&self, id: usize) -> Option<&Photo> {
        self.photos.get(id)
    }

    /// Union of the tags of every photo on the slide. Photo ids must be in range.
    pub fn slide_tags(&self, slide: &Slide) -> TagSet {
        match *slide {
            Slide::Single(id) => self.photos[id].tags.clone(),
            Slide::Pair(a, b) => self.photos[a].tags.union(&self.photos[b].tags),
        }
    }

    /// Total interest over every pair of consecutive slides.
    pub fn evaluate_slideshow(&self, slides: &[Slide]) -> u64 {
        let tags: Vec<TagSet> = slides.iter().map(|s| self.slide_tags(s)).collect();
        tags.windows(2)
            .map(|w| interest(&w[0], &w[1]) as u64)
            .sum()
    }

    /// Checks the slideshow against the photo set and returns its typed slides.
    /// Slides are checked in order and the first violation is reported; the
    /// full-coverage check runs last.
    pub fn verify_solution(&self, solution: &Solution) -> Result<Vec<Slide>, SolutionError> {
        let mut used: HashSet<usize> = HashSet::with_capacity(self.photos.len());
        let mut slides = Vec::with_capacity(solution.slides.len());

        let known = |slide: usize, photo: usize| {
            if photo < self.photos.len() {
                Ok(())
            } else {
                Err(SolutionError::UnknownPhoto { slide, photo })
            }
        };

        for (i, ids) in solution.slides.iter().enumerate() {
            match *ids.as_slice() {
                [id] => {
                    known(i, id)?;
                    if !self.photos[id].is_horizontal() {
                        return Err(SolutionError::NotHorizontal {
                            slide: i,
                            photo: id,
                        });
                    }
                    if !used.insert(id) {
                        return Err(SolutionError::PhotoReused {
                            slide: i,
                            photo: id,
                        });
                    }
                    slides.push(Slide::Single(id));
                }
                [a, b] => {
                    known(i, a)?;
                    known(i, b)?;
                    if !self.photos[a].is_vertical() || !self.photos[b].is_vertical() {
                        return Err(SolutionError::NotVertical {
                            slide: i,
                            first: a,
                            second: b,
                        });
                    }
                    if a == b {
                        return Err(SolutionError::RepeatedInSlide { slide: i, photo: a });
                    }
                    if let Some(&id) = [a, b].iter().find(|id| used.contains(id)) {
                        return Err(SolutionError::PhotoReused {
                            slide: i,
                            photo: id,
                        });
                    }
                    used.insert(a);
                    used.insert(b);
                    slides.push(Slide::Pair(a.min(b), a.max(b)));
                }
                _ => {
                    return Err(SolutionError::InvalidSlideSize {
                        slide: i,
                        count: ids.len(),
                    })
                }
            }
        }

        if used.len() != self.photos.len() {
            return Err(SolutionError::IncompleteCover {
                used: used.len(),
                total: self.photos.len(),
            });
        }
        Ok(slides)
    }

    pub fn evaluate_score(&self, solution: &Solution) -> Result<u64, SolutionError> {
        let slides = self.verify_solution(solution)?;
        Ok(self.evaluate_slideshow(&slides))
    }

    /// Photos in input order: every horizontal photo alone, vertical photos
    /// paired with the next vertical photo. A trailing odd vertical is left out.
    pub fn compute_baseline(&self) -> Solution {
        let mut slides = Vec::with_capacity(self.photos.len());
        let mut pending: Option<usize> = None;
        for photo in &self.photos {
            match photo.orientation {
                Orientation::Horizontal => slides.push(vec![photo.id]),
                Orientation::Vertical => match pending.take() {
                    Some(first) => slides.push(vec![first, photo.id]),
                    None => pending = Some(photo.id),
                },
            }
        }
        Solution { slides }
    }

    /// Quality of a solution relative to the baseline, scaled by
    /// `QUALITY_PRECISION` and clamped to [-10, 10] before scaling.
    pub fn evaluate_solution(&self, solution: &Solution) -> Result<i32> {
        let score = self.evaluate_score(solution)?;
        let baseline = self.compute_baseline();
        let baseline_score = self.evaluate_slideshow(&self.verify_baseline(&baseline)?);
        if baseline_score == 0 {
            return Ok(if score > 0 { 10 * QUALITY_PRECISION } else { 0 });
        }
        let quality = (score as f64 - baseline_score as f64) / baseline_score as f64;
        let quality = quality.clamp(-10.0, 10.0) * QUALITY_PRECISION as f64;
        Ok(quality.round() as i32)
    }

    // The baseline may leave one vertical photo out, so it is checked slide by
    // slide without the full-coverage rule.
    fn verify_baseline(&self, baseline: &Solution) -> Result<Vec<Slide>> {
        baseline
            .slides
            .iter()
            .map(|ids| Slide::try_from(ids.clone()).map_err(|e| anyhow!(e)))
            .collect()
    }
}
