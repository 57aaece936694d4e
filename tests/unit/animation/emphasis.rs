use super::*;

#[test]
fn ramp_hold_fade_profile() {
    let mut emphasis = Emphasis::new(800.0);
    emphasis.trigger(Millis(0.0));

    // 6.25% in: ramping, value = 0.0625 / 0.1.
    assert!((emphasis.value(Millis(50.0)) - 0.625).abs() < 1e-9);
    // 50% in: holding at peak.
    assert_eq!(emphasis.value(Millis(400.0)), 1.0);
    // 87.5% in: fading, value = 1 - 0.275/0.4.
    assert!((emphasis.value(Millis(700.0)) - 0.3125).abs() < 1e-9);
    // Expired.
    assert_eq!(emphasis.value(Millis(800.0)), 0.0);
    assert_eq!(emphasis.value(Millis(900.0)), 0.0);
}

#[test]
fn untriggered_state_is_dark() {
    let emphasis = Emphasis::new(800.0);
    assert_eq!(emphasis.value(Millis(0.0)), 0.0);
    assert!(!emphasis.is_lit(Millis(12345.0)));
}

#[test]
fn retrigger_resets_the_clock() {
    let mut emphasis = Emphasis::new(800.0);
    emphasis.trigger(Millis(0.0));
    // Deep into the fade...
    assert!(emphasis.value(Millis(700.0)) < 0.5);
    // ...a fresh hit restarts the cycle.
    emphasis.trigger(Millis(700.0));
    assert_eq!(emphasis.value(Millis(1100.0)), 1.0);
    assert_eq!(emphasis.value(Millis(1500.0)), 0.0);
}

#[test]
fn value_before_trigger_time_is_zero() {
    let mut emphasis = Emphasis::new(800.0);
    emphasis.trigger(Millis(1000.0));
    assert_eq!(emphasis.value(Millis(500.0)), 0.0);
}
