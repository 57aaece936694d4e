use super::*;

#[test]
fn progress_is_monotone_and_pins_at_one() {
    let mut reveal = Reveal::new(1000.0);
    reveal.begin(Millis(0.0));

    let mut prev = 0.0;
    for t in [0.0, 100.0, 350.0, 700.0, 999.0, 1000.0, 5000.0] {
        let p = reveal.step(Millis(t));
        assert!(p >= prev, "progress decreased at t={t}");
        assert!((0.0..=1.0).contains(&p));
        prev = p;
    }
    assert!(reveal.is_complete());
    assert_eq!(reveal.step(Millis(9999.0)), 1.0);
}

#[test]
fn step_is_idempotent_for_repeated_timestamps() {
    let mut reveal = Reveal::new(1500.0);
    reveal.begin(Millis(100.0));
    let a = reveal.step(Millis(600.0));
    let b = reveal.step(Millis(600.0));
    assert_eq!(a, b);
}

#[test]
fn backwards_clock_cannot_regress_progress() {
    let mut reveal = Reveal::new(1000.0);
    reveal.begin(Millis(0.0));
    let at_700 = reveal.step(Millis(700.0));
    let after_stutter = reveal.step(Millis(500.0));
    assert_eq!(after_stutter, at_700);
}

#[test]
fn step_before_begin_holds_at_zero() {
    let mut reveal = Reveal::new(1000.0);
    assert_eq!(reveal.step(Millis(400.0)), 0.0);
    assert!(!reveal.is_complete());
}

#[test]
fn force_complete_skips_the_transition() {
    let mut reveal = Reveal::new(2400.0);
    reveal.force_complete();
    assert!(reveal.is_complete());
    assert_eq!(reveal.progress(), 1.0);
}

#[test]
fn stagger_is_monotone_and_bounded() {
    for index in 0..5 {
        let mut prev = 0.0;
        for i in 0..=100 {
            let p = f64::from(i) / 100.0;
            let f = stagger(p, index, 5, 2.0);
            assert!((0.0..=1.0).contains(&f));
            assert!(f >= prev, "stagger decreased for index {index} at p={p}");
            prev = f;
        }
        assert_eq!(stagger(1.0, index, 5, 2.0), 1.0);
    }
}

#[test]
fn stagger_scenario_five_elements_window_two() {
    // progress 0.8, five elements, window 2: first element fully swept,
    // last element at 0.8.
    assert!((stagger(0.8, 0, 5, 2.0) - 1.0).abs() < 1e-12);
    assert!((stagger(0.8, 4, 5, 2.0) - 0.8).abs() < 1e-12);
}

#[test]
fn stagger_orders_elements_by_index() {
    let p = 0.3;
    let mut prev = f64::INFINITY;
    for index in 0..7 {
        let f = stagger(p, index, 7, 2.0);
        assert!(f <= prev, "later element ahead of earlier at index {index}");
        prev = f;
    }
}
