use crate::{selector::Selection, HashMap};
use slideshow_challenges::slideshow::{interest, Challenge, Slide, Solution, TagSet};
use tracing::debug;

/// Slides in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slideshow {
    pub slides: Vec<Slide>,
}

impl Slideshow {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn score(&self, challenge: &Challenge) -> u64 {
        challenge.evaluate_slideshow(&self.slides)
    }

    pub fn to_solution(&self) -> Solution {
        Solution::from_slides(&self.slides)
    }
}

/// Orders selected slides by greedy nearest neighbour on transition interest,
/// optionally followed by 2-opt segment reversals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceBuilder {
    improve_passes: usize,
}

impl SequenceBuilder {
    pub fn new(improve_passes: usize) -> Self {
        Self { improve_passes }
    }

    pub fn build(&self, challenge: &Challenge, selection: &Selection) -> Slideshow {
        let mut slides = selection.slides.clone();
        slides.sort_by_key(|s| s.key());
        let tags: Vec<TagSet> = slides.iter().map(|s| challenge.slide_tags(s)).collect();

        let mut order = nearest_neighbour(&tags);
        if self.improve_passes > 0 {
            two_opt(&tags, &mut order, self.improve_passes);
        }

        Slideshow {
            slides: order.into_iter().map(|i| slides[i]).collect(),
        }
    }
}

/// Starts from index 0 and always moves to the most interesting unvisited
/// slide. Indices are in key order, so strict comparison breaks ties towards
/// the lowest key.
fn nearest_neighbour(tags: &[TagSet]) -> Vec<usize> {
    let n = tags.len();
    let mut order = Vec::with_capacity(n);
    if n == 0 {
        return order;
    }
    let mut visited = vec![false; n];
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut best: Option<(usize, u32)> = None;
        for next in 0..n {
            if visited[next] {
                continue;
            }
            let score = interest(&tags[current], &tags[next]);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((next, score));
            }
        }
        match best {
            Some((next, _)) => {
                visited[next] = true;
                order.push(next);
                current = next;
            }
            None => break,
        }
    }
    order
}

fn two_opt(tags: &[TagSet], order: &mut [usize], max_passes: usize) {
    let n = order.len();
    if n < 3 {
        return;
    }
    let mut cache: HashMap<(usize, usize), i64> = HashMap::default();
    let mut edge = |a: usize, b: usize| -> i64 {
        let key = (a.min(b), a.max(b));
        *cache
            .entry(key)
            .or_insert_with(|| interest(&tags[a], &tags[b]) as i64)
    };

    for pass in 0..max_passes {
        let mut improved = 0;
        for i in 0..n - 1 {
            for j in (i + 1)..n {
                // reversing order[i..=j] only changes the two boundary transitions
                let mut gain = 0;
                if i > 0 {
                    gain += edge(order[i - 1], order[j]) - edge(order[i - 1], order[i]);
                }
                if j + 1 < n {
                    gain += edge(order[i], order[j + 1]) - edge(order[j], order[j + 1]);
                }
                if gain > 0 {
                    order[i..=j].reverse();
                    improved += 1;
                }
            }
        }
        debug!(pass, improved, "2-opt pass");
        if improved == 0 {
            break;
        }
    }
}
