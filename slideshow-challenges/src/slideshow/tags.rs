use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sorted, deduplicated set of interned tag ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct TagSet(Vec<u32>);

impl TagSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: u32) -> bool {
        self.0.binary_search(&tag).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn union(&self, other: &TagSet) -> TagSet {
        let (a, b) = (&self.0, &other.0);
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        TagSet(merged)
    }

    pub fn intersection_len(&self, other: &TagSet) -> usize {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j, mut common) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    common += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        common
    }

    /// Size of the union without materialising it.
    pub fn union_len(&self, other: &TagSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }
}

impl From<Vec<u32>> for TagSet {
    fn from(mut tags: Vec<u32>) -> Self {
        tags.sort_unstable();
        tags.dedup();
        TagSet(tags)
    }
}

impl From<TagSet> for Vec<u32> {
    fn from(tags: TagSet) -> Self {
        tags.0
    }
}

impl FromIterator<u32> for TagSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        TagSet::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Interest of the transition between two tag sets:
/// `min(|A ∩ B|, |A \ B|, |B \ A|)`.
pub fn interest(a: &TagSet, b: &TagSet) -> u32 {
    let common = a.intersection_len(b);
    let only_a = a.len() - common;
    let only_b = b.len() - common;
    common.min(only_a).min(only_b) as u32
}
