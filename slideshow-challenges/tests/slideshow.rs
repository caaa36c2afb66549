use slideshow_challenges::slideshow::{
    interest, Challenge, FormatError, Orientation, Slide, Solution, SolutionError, TagSet, Track,
};

fn tags(ids: &[u32]) -> TagSet {
    ids.iter().copied().collect()
}

fn challenge(text: &str) -> Challenge {
    text.parse::<Challenge>().unwrap()
}

#[test]
fn test_interest() {
    let a = tags(&[1, 2, 3]);
    let b = tags(&[3, 4]);
    assert_eq!(interest(&a, &b), 1);
    assert_eq!(interest(&b, &a), 1);
    assert_eq!(interest(&tags(&[1, 2, 3, 4]), &tags(&[3, 4, 5, 6])), 2);

    // containment zeroes one of the "unique to" terms
    assert_eq!(interest(&tags(&[1, 2]), &tags(&[1, 2, 3])), 0);
    assert_eq!(interest(&a, &a), 0);
    assert_eq!(interest(&TagSet::new(), &a), 0);
    assert_eq!(interest(&TagSet::new(), &TagSet::new()), 0);
}

#[test]
fn test_interest_is_symmetric() {
    let sets = vec![
        tags(&[]),
        tags(&[1]),
        tags(&[1, 2]),
        tags(&[2, 3, 4]),
        tags(&[1, 3, 5, 7]),
        tags(&[0, 1, 2, 3, 4, 5]),
    ];
    for a in &sets {
        for b in &sets {
            assert_eq!(interest(a, b), interest(b, a));
        }
    }
}

#[test]
fn test_tag_set_ops() {
    let a: TagSet = vec![5, 1, 3, 1].into();
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    let b = tags(&[2, 3]);
    assert_eq!(a.union(&b).iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
    assert_eq!(a.union_len(&b), 4);
    assert_eq!(a.intersection_len(&b), 1);
    assert!(a.contains(5));
    assert!(!a.contains(2));
}

#[test]
fn test_parse_photos() {
    let c = challenge("4\nH 3 cat beach sun\nV 2 selfie smile\nV 2 garden selfie\nH 2 garden cat\n");
    assert_eq!(c.num_photos(), 4);
    assert_eq!(c.photos[0].orientation, Orientation::Horizontal);
    assert_eq!(c.photos[1].orientation, Orientation::Vertical);
    assert_eq!(c.photos[2].id, 2);
    assert_eq!(c.vocabulary.len(), 6);
    // shared tags intern to the same id
    assert_eq!(c.photos[1].tags.intersection_len(&c.photos[2].tags), 1);
    assert_eq!(c.photos[0].tags.intersection_len(&c.photos[3].tags), 1);

    let reparsed = challenge(&c.to_string());
    assert_eq!(reparsed.num_photos(), 4);
    for (a, b) in c.photos.iter().zip(&reparsed.photos) {
        assert_eq!(a.orientation, b.orientation);
        assert_eq!(a.tags.len(), b.tags.len());
    }
}

#[test]
fn test_parse_errors() {
    assert_eq!("".parse::<Challenge>().unwrap_err(), FormatError::MissingHeader);
    assert_eq!(
        "x\n".parse::<Challenge>().unwrap_err(),
        FormatError::InvalidNumber {
            line: 1,
            value: "x".to_string()
        }
    );
    assert_eq!(
        "2\nH 1 a\n".parse::<Challenge>().unwrap_err(),
        FormatError::MissingLines {
            expected: 2,
            found: 1
        }
    );
    assert_eq!(
        "1\nD 1 a\n".parse::<Challenge>().unwrap_err(),
        FormatError::InvalidOrientation {
            line: 2,
            value: "D".to_string()
        }
    );
    assert_eq!(
        "1\nH 3 a b\n".parse::<Challenge>().unwrap_err(),
        FormatError::TagCountMismatch {
            line: 2,
            declared: 3,
            found: 2
        }
    );
    assert_eq!(
        "1\nH two a b\n".parse::<Challenge>().unwrap_err(),
        FormatError::InvalidNumber {
            line: 2,
            value: "two".to_string()
        }
    );
    assert_eq!(
        "1\nH 1 a\nV 1 b\n".parse::<Challenge>().unwrap_err(),
        FormatError::TrailingContent { line: 3 }
    );
    // trailing blank lines are fine
    assert_eq!(challenge("1\nH 1 a\n\n\n").num_photos(), 1);
    assert_eq!(challenge("0\n").num_photos(), 0);
}

#[test]
fn test_parse_solution() {
    let solution = "3\n0\n3\n1 2\n".parse::<Solution>().unwrap();
    assert_eq!(solution.slides, vec![vec![0], vec![3], vec![1, 2]]);
    assert_eq!(solution.to_string(), "3\n0\n3\n1 2\n");

    // slide sizes are left to the validator
    let solution = "1\n1 2 3\n".parse::<Solution>().unwrap();
    assert_eq!(solution.slides, vec![vec![1, 2, 3]]);

    assert_eq!(
        "1\n1 b\n".parse::<Solution>().unwrap_err(),
        FormatError::InvalidNumber {
            line: 2,
            value: "b".to_string()
        }
    );
}

#[test]
fn test_verify_solution() {
    let c = challenge("4\nH 3 cat beach sun\nV 2 selfie smile\nV 2 garden selfie\nH 2 garden cat\n");
    let valid = Solution {
        slides: vec![vec![0], vec![3], vec![1, 2]],
    };
    assert_eq!(
        c.verify_solution(&valid).unwrap(),
        vec![Slide::Single(0), Slide::Single(3), Slide::Pair(1, 2)]
    );
    // {cat, beach, sun} -> {garden, cat}: min(1, 2, 1) = 1
    // {garden, cat} -> {selfie, smile, garden}: min(1, 1, 2) = 1
    assert_eq!(c.evaluate_score(&valid).unwrap(), 2);

    let cases = vec![
        (
            vec![vec![1], vec![0], vec![3]],
            SolutionError::NotHorizontal { slide: 0, photo: 1 },
        ),
        (
            vec![vec![0, 1], vec![2], vec![3]],
            SolutionError::NotVertical {
                slide: 0,
                first: 0,
                second: 1,
            },
        ),
        (
            vec![vec![1, 1], vec![0], vec![3]],
            SolutionError::RepeatedInSlide { slide: 0, photo: 1 },
        ),
        (
            vec![vec![0], vec![0], vec![3]],
            SolutionError::PhotoReused { slide: 1, photo: 0 },
        ),
        (
            vec![vec![0], vec![1, 2, 3]],
            SolutionError::InvalidSlideSize { slide: 1, count: 3 },
        ),
        (
            vec![vec![0], vec![]],
            SolutionError::InvalidSlideSize { slide: 1, count: 0 },
        ),
        (
            vec![vec![0], vec![9]],
            SolutionError::UnknownPhoto { slide: 1, photo: 9 },
        ),
        (
            vec![vec![0], vec![1, 2]],
            SolutionError::IncompleteCover { used: 3, total: 4 },
        ),
    ];
    for (slides, expected) in cases {
        assert_eq!(c.verify_solution(&Solution { slides }).unwrap_err(), expected);
    }
}

#[test]
fn test_three_horizontal_orderings() {
    let c = challenge("3\nH 2 a b\nH 2 b c\nH 2 c d\n");
    let orderings: Vec<Vec<usize>> = vec![
        vec![0, 1, 2],
        vec![0, 2, 1],
        vec![1, 0, 2],
        vec![1, 2, 0],
        vec![2, 0, 1],
        vec![2, 1, 0],
    ];
    let scores: Vec<u64> = orderings
        .iter()
        .map(|o| {
            let slides: Vec<Slide> = o.iter().map(|&id| Slide::Single(id)).collect();
            c.evaluate_slideshow(&slides)
        })
        .collect();
    let best = *scores.iter().max().unwrap();
    assert_eq!(best, 2);
    let winners: Vec<&Vec<usize>> = orderings
        .iter()
        .zip(&scores)
        .filter(|(_, &s)| s == best)
        .map(|(o, _)| o)
        .collect();
    assert_eq!(winners, vec![&vec![0, 1, 2], &vec![2, 1, 0]]);
}

#[test]
fn test_empty_challenge() {
    let c = challenge("0\n");
    assert_eq!(c.evaluate_score(&Solution::new()).unwrap(), 0);
    assert_eq!(c.evaluate_slideshow(&[]), 0);
    assert_eq!(c.evaluate_solution(&Solution::new()).unwrap(), 0);
}

#[test]
fn test_baseline_and_quality() {
    let c = challenge("5\nV 1 a\nH 2 a b\nV 1 b\nH 2 b c\nV 1 z\n");
    let baseline = c.compute_baseline();
    assert_eq!(baseline.slides, vec![vec![1], vec![0, 2], vec![3]]);

    let c = challenge("4\nH 2 a b\nH 2 x y\nH 2 b c\nH 2 y z\n");
    // baseline order scores 0, anything positive is capped
    let better = Solution {
        slides: vec![vec![0], vec![2], vec![1], vec![3]],
    };
    assert_eq!(c.evaluate_score(&better).unwrap(), 2);
    assert_eq!(c.evaluate_solution(&better).unwrap(), 10_000_000);
}

#[test]
fn test_generate_instance() {
    let track = Track {
        num_photos: 50,
        vertical_percent: 40,
        vocabulary_size: 20,
        max_tags: 5,
    };
    let a = Challenge::generate_instance(&[7u8; 32], &track).unwrap();
    let b = Challenge::generate_instance(&[7u8; 32], &track).unwrap();
    assert_eq!(a.photos, b.photos);
    assert_eq!(a.num_photos(), 50);
    assert_eq!(a.vocabulary.len(), 20);
    for photo in &a.photos {
        assert!(!photo.tags.is_empty() && photo.tags.len() <= 5);
        assert!(photo.tags.iter().all(|t| (t as usize) < 20));
    }

    let bad = Track {
        vertical_percent: 101,
        ..track
    };
    assert!(Challenge::generate_instance(&[7u8; 32], &bad).is_err());
}

#[test]
fn test_slide_keys() {
    assert_eq!(Slide::pair(4, 2), Some(Slide::Pair(2, 4)));
    assert_eq!(Slide::pair(3, 3), None);
    assert!(Slide::Single(1).key() < Slide::Pair(2, 3).key());
    assert!(Slide::Pair(1, 9).key() < Slide::Single(2).key());
    assert_eq!(Slide::Pair(2, 4).key().photo_ids(), &[2, 4]);
    assert!(Slide::Pair(2, 4).overlaps(&Slide::Pair(4, 5)));
    assert!(!Slide::Single(1).overlaps(&Slide::Pair(4, 5)));
    assert_eq!(Slide::try_from(vec![5, 1]), Ok(Slide::Pair(1, 5)));
    assert!(Slide::try_from(vec![1, 2, 3]).is_err());
}
