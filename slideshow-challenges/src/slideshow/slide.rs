use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a slide: its photo ids sorted ascending in a fixed-size array.
///
/// A single uses only the first slot, the second repeats the id so that the
/// derived ordering compares singles and pairs by their lowest photo id first.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlideKey {
    ids: [usize; 2],
    len: u8,
}

impl SlideKey {
    pub fn photo_ids(&self) -> &[usize] {
        &self.ids[..self.len as usize]
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub enum Slide {
    Single(usize),
    Pair(usize, usize),
}

impl Slide {
    /// Builds a pair slide with its ids in ascending order. Returns `None` when
    /// both ids are the same photo.
    pub fn pair(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Slide::Pair(a, b)),
            std::cmp::Ordering::Greater => Some(Slide::Pair(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn key(&self) -> SlideKey {
        match *self {
            Slide::Single(id) => SlideKey {
                ids: [id, id],
                len: 1,
            },
            Slide::Pair(a, b) => SlideKey {
                ids: [a.min(b), a.max(b)],
                len: 2,
            },
        }
    }

    pub fn photo_ids(&self) -> Vec<usize> {
        self.key().photo_ids().to_vec()
    }

    pub fn contains(&self, photo: usize) -> bool {
        match *self {
            Slide::Single(id) => id == photo,
            Slide::Pair(a, b) => a == photo || b == photo,
        }
    }

    pub fn overlaps(&self, other: &Slide) -> bool {
        self.key().photo_ids().iter().any(|&id| other.contains(id))
    }
}

impl TryFrom<Vec<usize>> for Slide {
    type Error = String;

    fn try_from(ids: Vec<usize>) -> Result<Self, Self::Error> {
        match ids.as_slice() {
            &[id] => Ok(Slide::Single(id)),
            &[a, b] => Slide::pair(a, b).ok_or_else(|| format!("Photo {} is repeated", a)),
            _ => Err(format!("A slide holds one or two photos, got {}", ids.len())),
        }
    }
}

impl From<Slide> for Vec<usize> {
    fn from(slide: Slide) -> Self {
        slide.photo_ids()
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slide::Single(id) => write!(f, "{}", id),
            Slide::Pair(a, b) => write!(f, "{} {}", a, b),
        }
    }
}
