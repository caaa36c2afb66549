//! Plain-text interchange formats.
//!
//! Photos:
//! ```text
//! <N>
//! <H|V> <tag count> <tag> ...     (N lines, photo id = line index - 1)
//! ```
//!
//! Slideshows:
//! ```text
//! <S>
//! <id> [<id>]                     (S lines)
//! ```

use super::{Challenge, FormatError, Orientation, Photo, Solution, TagSet};
use std::{collections::HashMap, fmt, str::FromStr};

fn parse_number(line: usize, token: &str) -> Result<usize, FormatError> {
    token.parse::<usize>().map_err(|_| FormatError::InvalidNumber {
        line,
        value: token.to_string(),
    })
}

/// Splits `text` into its header count and the `count` entry lines that
/// follow it. Anything but blank lines after the entries is rejected.
fn split_entries(text: &str) -> Result<Vec<(usize, &str)>, FormatError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let (header_line, header) = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .ok_or(FormatError::MissingHeader)?;
    let count = parse_number(header_line, header.trim())?;

    let entries: Vec<(usize, &str)> = lines.by_ref().take(count).collect();
    if entries.len() < count {
        return Err(FormatError::MissingLines {
            expected: count,
            found: entries.len(),
        });
    }
    if let Some((line, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(FormatError::TrailingContent { line });
    }
    Ok(entries)
}

impl FromStr for Challenge {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let entries = split_entries(text)?;
        let mut vocabulary: Vec<String> = Vec::new();
        let mut interned: HashMap<String, u32> = HashMap::new();
        let mut photos = Vec::with_capacity(entries.len());

        for (id, (line, content)) in entries.into_iter().enumerate() {
            let mut tokens = content.split_whitespace();
            let symbol = tokens.next().unwrap_or("");
            let orientation =
                Orientation::from_symbol(symbol).ok_or_else(|| FormatError::InvalidOrientation {
                    line,
                    value: symbol.to_string(),
                })?;
            let declared = parse_number(line, tokens.next().unwrap_or(""))?;
            let tags: Vec<&str> = tokens.collect();
            if tags.len() != declared {
                return Err(FormatError::TagCountMismatch {
                    line,
                    declared,
                    found: tags.len(),
                });
            }
            let tags: TagSet = tags
                .into_iter()
                .map(|tag| {
                    *interned.entry(tag.to_string()).or_insert_with(|| {
                        vocabulary.push(tag.to_string());
                        (vocabulary.len() - 1) as u32
                    })
                })
                .collect();
            photos.push(Photo {
                id,
                orientation,
                tags,
            });
        }

        Ok(Challenge::new(photos, vocabulary))
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.photos.len())?;
        for photo in &self.photos {
            write!(f, "{} {}", photo.orientation, photo.tags.len())?;
            for tag in photo.tags.iter() {
                write!(f, " {}", self.vocabulary[tag as usize])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Solution {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let slides = split_entries(text)?
            .into_iter()
            .map(|(line, content)| {
                content
                    .split_whitespace()
                    .map(|token| parse_number(line, token))
                    .collect::<Result<Vec<usize>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Solution { slides })
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.slides.len())?;
        for slide in &self.slides {
            let ids: Vec<String> = slide.iter().map(|id| id.to_string()).collect();
            writeln!(f, "{}", ids.join(" "))?;
        }
        Ok(())
    }
}
