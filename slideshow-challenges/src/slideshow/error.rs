use thiserror::Error;

/// Malformed photo or solution text. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Input is empty, expected a count on line 1")]
    MissingHeader,

    #[error("Line {line}: expected a non-negative integer, got '{value}'")]
    InvalidNumber { line: usize, value: String },

    #[error("Expected {expected} entries after the header, found {found}")]
    MissingLines { expected: usize, found: usize },

    #[error("Line {line}: unexpected content after the declared entries")]
    TrailingContent { line: usize },

    #[error("Line {line}: orientation must be 'H' or 'V', got '{value}'")]
    InvalidOrientation { line: usize, value: String },

    #[error("Line {line}: declared {declared} tags but found {found}")]
    TagCountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },
}

/// A slideshow that breaks one of the validity rules. Slide indices are
/// 0-based positions in the slideshow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("Slide {slide} contains {count} photos, expected 1 or 2")]
    InvalidSlideSize { slide: usize, count: usize },

    #[error("Slide {slide} references unknown photo {photo}")]
    UnknownPhoto { slide: usize, photo: usize },

    #[error("Slide {slide}: photo {photo} is not horizontal")]
    NotHorizontal { slide: usize, photo: usize },

    #[error("Slide {slide}: photos {first} and {second} are not both vertical")]
    NotVertical {
        slide: usize,
        first: usize,
        second: usize,
    },

    #[error("Slide {slide}: photo {photo} appears twice in the same slide")]
    RepeatedInSlide { slide: usize, photo: usize },

    #[error("Slide {slide}: photo {photo} is already used by an earlier slide")]
    PhotoReused { slide: usize, photo: usize },

    #[error("Not every photo is used exactly once ({used} of {total} used)")]
    IncompleteCover { used: usize, total: usize },
}
