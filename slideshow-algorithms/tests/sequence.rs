use slideshow_algorithms::{Selection, SequenceBuilder, Slideshow};
use slideshow_challenges::slideshow::{Challenge, Slide, Track};

fn challenge(text: &str) -> Challenge {
    text.parse::<Challenge>().unwrap()
}

fn selection(slides: Vec<Slide>) -> Selection {
    Selection {
        slides,
        objective: Some(0),
        proven_optimal: true,
    }
}

fn singles(n: usize) -> Vec<Slide> {
    (0..n).map(Slide::Single).collect()
}

#[test]
fn test_three_horizontal_photos() {
    let c = challenge("3\nH 2 a b\nH 2 b c\nH 2 c d\n");
    // selection order must not matter
    let show = SequenceBuilder::default().build(
        &c,
        &selection(vec![Slide::Single(2), Slide::Single(0), Slide::Single(1)]),
    );
    assert_eq!(show.slides, singles(3));
    assert_eq!(show.score(&c), 2);
}

#[test]
fn test_ties_go_to_lowest_key() {
    let c = challenge("4\nH 2 a b\nH 1 x\nH 1 y\nV 1 q\n");
    let show = SequenceBuilder::default().build(&c, &selection(singles(3)));
    assert_eq!(show.slides, singles(3));

    let c = challenge("5\nV 1 z\nH 2 a b\nV 2 a c\nH 2 a d\nV 1 e\n");
    // start at Pair(0, 2) = {z, a, c}: Single(1) and Single(3) both score 1
    let show = SequenceBuilder::default().build(
        &c,
        &selection(vec![Slide::Single(3), Slide::Single(1), Slide::Pair(0, 2)]),
    );
    assert_eq!(
        show.slides,
        vec![Slide::Pair(0, 2), Slide::Single(1), Slide::Single(3)]
    );
}

#[test]
fn test_empty_and_singleton() {
    let c = challenge("1\nH 1 a\n");
    let empty = SequenceBuilder::new(3).build(&c, &selection(vec![]));
    assert_eq!(empty, Slideshow::default());
    assert_eq!(empty.score(&c), 0);

    let one = SequenceBuilder::new(3).build(&c, &selection(singles(1)));
    assert_eq!(one.slides, singles(1));
    assert_eq!(one.score(&c), 0);
}

#[test]
fn test_deterministic() {
    let track = Track {
        num_photos: 60,
        vertical_percent: 0,
        vocabulary_size: 12,
        max_tags: 6,
    };
    let c = Challenge::generate_instance(&[3u8; 32], &track).unwrap();
    let builder = SequenceBuilder::default();
    let first = builder.build(&c, &selection(singles(60)));
    for _ in 0..3 {
        assert_eq!(builder.build(&c, &selection(singles(60))), first);
    }
    let mut reversed = singles(60);
    reversed.reverse();
    assert_eq!(builder.build(&c, &selection(reversed)), first);
}

#[test]
fn test_improvement_never_hurts() {
    let track = Track {
        num_photos: 40,
        vertical_percent: 0,
        vocabulary_size: 10,
        max_tags: 5,
    };
    for seed in 0..5u8 {
        let c = Challenge::generate_instance(&[seed; 32], &track).unwrap();
        let greedy = SequenceBuilder::new(0).build(&c, &selection(singles(40)));
        let improved = SequenceBuilder::new(5).build(&c, &selection(singles(40)));
        assert!(improved.score(&c) >= greedy.score(&c));

        let mut placed: Vec<Slide> = improved.slides.clone();
        placed.sort_by_key(|s| s.key());
        assert_eq!(placed, singles(40));
    }
}

#[test]
fn test_improvement_fixes_stranded_slide() {
    // Greedy runs 0 -> 1 -> 2 -> 3 and scores 2; reversing the first three
    // slides gives 2 -> 1 -> 0 -> 3 which scores 3.
    let c = challenge("4\nH 3 b c d\nH 2 c e\nH 2 a c\nH 2 b e\n");
    let greedy = SequenceBuilder::new(0).build(&c, &selection(singles(4)));
    assert_eq!(greedy.slides, singles(4));
    assert_eq!(greedy.score(&c), 2);

    let improved = SequenceBuilder::new(1).build(&c, &selection(singles(4)));
    assert_eq!(
        improved.slides,
        vec![
            Slide::Single(2),
            Slide::Single(1),
            Slide::Single(0),
            Slide::Single(3)
        ]
    );
    assert_eq!(improved.score(&c), 3);
}
