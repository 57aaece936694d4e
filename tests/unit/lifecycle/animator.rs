use super::*;

use std::cell::Cell;
use std::rc::Rc;

use crate::render::painter::Painter;

/// Effect stub that counts lifecycle calls and records the last context.
struct Probe {
    updates: Rc<Cell<u32>>,
    renders: Rc<Cell<u32>>,
    intros_skipped: Rc<Cell<u32>>,
    last_elapsed: Rc<Cell<f64>>,
    last_dt: Rc<Cell<f64>>,
    last_reveal: Rc<Cell<f64>>,
}

#[derive(Clone, Default)]
struct ProbeHandles {
    updates: Rc<Cell<u32>>,
    renders: Rc<Cell<u32>>,
    intros_skipped: Rc<Cell<u32>>,
    last_elapsed: Rc<Cell<f64>>,
    last_dt: Rc<Cell<f64>>,
    last_reveal: Rc<Cell<f64>>,
}

fn probe() -> (Box<Probe>, ProbeHandles) {
    let handles = ProbeHandles::default();
    let effect = Box::new(Probe {
        updates: handles.updates.clone(),
        renders: handles.renders.clone(),
        intros_skipped: handles.intros_skipped.clone(),
        last_elapsed: handles.last_elapsed.clone(),
        last_dt: handles.last_dt.clone(),
        last_reveal: handles.last_reveal.clone(),
    });
    (effect, handles)
}

impl Effect for Probe {
    fn update(&mut self, ctx: &FrameCtx, dt_ms: f64) {
        self.updates.set(self.updates.get() + 1);
        self.last_elapsed.set(ctx.elapsed_ms);
        self.last_dt.set(dt_ms);
    }

    fn render(&self, _painter: &mut Painter<'_>, ctx: &FrameCtx) -> ScintillaResult<()> {
        self.renders.set(self.renders.get() + 1);
        self.last_reveal.set(ctx.reveal);
        Ok(())
    }

    fn skip_intro(&mut self) {
        self.intros_skipped.set(self.intros_skipped.get() + 1);
    }
}

fn mount() -> Option<Mount> {
    Some(Mount {
        width: 320.0,
        height: 180.0,
        dpr: 1.0,
    })
}

fn attach_full(config: AnimatorConfig) -> (Animator, ProbeHandles) {
    let (effect, handles) = probe();
    let animator = Animator::attach(
        mount(),
        MotionPreference::Full,
        config,
        effect,
        Millis(0.0),
    )
    .unwrap()
    .unwrap();
    (animator, handles)
}

#[test]
fn missing_mount_is_a_silent_noop() {
    let (effect, handles) = probe();
    let animator = Animator::attach(
        None,
        MotionPreference::Full,
        AnimatorConfig::default(),
        effect,
        Millis(0.0),
    )
    .unwrap();
    assert!(animator.is_none());
    assert_eq!(handles.renders.get(), 0);
}

#[test]
fn waits_for_reveal_before_running() {
    let (mut animator, handles) = attach_full(AnimatorConfig::default());
    assert_eq!(animator.phase(), Phase::WaitingReveal);
    assert!(!animator.running());

    // Ticks before the reveal do nothing.
    assert!(!animator.tick(Millis(16.0)).unwrap());
    assert_eq!(handles.renders.get(), 0);

    // Sub-threshold intersection does not arm.
    animator.on_reveal(0.1, Millis(100.0));
    assert_eq!(animator.phase(), Phase::WaitingReveal);

    animator.on_reveal(0.4, Millis(100.0));
    assert_eq!(animator.phase(), Phase::Revealing);
    assert!(animator.running());
    assert!(animator.revealed());
}

#[test]
fn reveal_transitions_into_steady_loop() {
    let (mut animator, handles) = attach_full(AnimatorConfig {
        reveal_duration_ms: 1000.0,
        ..AnimatorConfig::default()
    });
    animator.on_reveal(0.5, Millis(0.0));

    let mut t = 0.0;
    let mut prev = 0.0;
    while animator.phase() == Phase::Revealing {
        t += 16.0;
        assert!(animator.tick(Millis(t)).unwrap());
        let p = animator.reveal_progress();
        assert!(p >= prev, "reveal progress regressed");
        prev = p;
        assert!(t < 2000.0, "reveal never completed");
    }
    assert_eq!(animator.phase(), Phase::Steady);
    assert_eq!(animator.reveal_progress(), 1.0);
    // Entities never advanced during the reveal.
    assert_eq!(handles.updates.get(), 0);

    animator.tick(Millis(t + 16.0)).unwrap();
    assert_eq!(handles.updates.get(), 1);
}

#[test]
fn start_is_idempotent() {
    let (mut animator, _) = attach_full(AnimatorConfig::default());
    animator.on_reveal(1.0, Millis(0.0));
    assert!(animator.running());
    let elapsed_before = animator.elapsed_ms(Millis(500.0));
    animator.start(Millis(250.0));
    animator.start(Millis(250.0));
    assert!(animator.running());
    assert_eq!(animator.elapsed_ms(Millis(500.0)), elapsed_before);
}

#[test]
fn stale_tick_after_stop_is_a_noop() {
    let (mut animator, handles) = attach_full(AnimatorConfig::default());
    animator.on_reveal(1.0, Millis(0.0));
    assert!(animator.tick(Millis(16.0)).unwrap());
    let rendered = handles.renders.get();

    animator.stop(Millis(20.0));
    // An already-scheduled frame arrives late.
    assert!(!animator.tick(Millis(32.0)).unwrap());
    assert_eq!(handles.renders.get(), rendered);
}

#[test]
fn pause_resume_shifts_the_elapsed_clock() {
    let (mut animator, _) = attach_full(AnimatorConfig {
        reveal_duration_ms: 100.0,
        ..AnimatorConfig::default()
    });
    animator.on_reveal(1.0, Millis(0.0));
    animator.tick(Millis(200.0)).unwrap();
    assert_eq!(animator.phase(), Phase::Steady);
    animator.on_visibility(1.0, Millis(200.0));

    let elapsed_at_pause = animator.elapsed_ms(Millis(1000.0));

    // Scroll away for three seconds.
    animator.on_visibility(0.0, Millis(1000.0));
    assert_eq!(animator.phase(), Phase::Paused);
    assert!(!animator.running());

    animator.on_visibility(0.8, Millis(4000.0));
    assert_eq!(animator.phase(), Phase::Steady);
    assert!(animator.running());

    // The paused span is invisible to the elapsed clock, so phase-driven
    // motion (heartbeat pulses) continues rather than jumping.
    let elapsed_after_resume = animator.elapsed_ms(Millis(4000.0));
    assert!((elapsed_after_resume - elapsed_at_pause).abs() < 1e-9);
}

#[test]
fn resume_requires_completed_reveal() {
    let (mut animator, _) = attach_full(AnimatorConfig {
        reveal_duration_ms: 10_000.0,
        ..AnimatorConfig::default()
    });
    animator.on_reveal(1.0, Millis(0.0));
    animator.tick(Millis(16.0)).unwrap();
    assert_eq!(animator.phase(), Phase::Revealing);

    // Visibility flapping mid-reveal neither pauses nor restarts anything.
    animator.on_visibility(1.0, Millis(20.0));
    animator.on_visibility(0.0, Millis(30.0));
    assert_eq!(animator.phase(), Phase::Revealing);
    assert!(animator.running());
}

#[test]
fn repeated_timestamp_does_not_double_step_entities() {
    let (mut animator, handles) = attach_full(AnimatorConfig {
        reveal_duration_ms: 100.0,
        ..AnimatorConfig::default()
    });
    animator.on_reveal(1.0, Millis(0.0));
    animator.tick(Millis(200.0)).unwrap();
    assert_eq!(animator.phase(), Phase::Steady);

    animator.tick(Millis(300.0)).unwrap();
    let updates = handles.updates.get();
    // The same instant rendered again: a fresh frame, no entity step.
    animator.tick(Millis(300.0)).unwrap();
    assert_eq!(handles.updates.get(), updates);
    assert!(handles.renders.get() > updates);
}

#[test]
fn frame_delta_is_clamped_across_suspensions() {
    let (mut animator, handles) = attach_full(AnimatorConfig {
        reveal_duration_ms: 100.0,
        max_frame_delta_ms: 50.0,
        ..AnimatorConfig::default()
    });
    animator.on_reveal(1.0, Millis(0.0));
    animator.tick(Millis(200.0)).unwrap();

    // The tab slept for a minute; entity physics see 50ms at most.
    animator.tick(Millis(60_200.0)).unwrap();
    assert_eq!(handles.last_dt.get(), 50.0);
}

#[test]
fn reduced_motion_renders_once_and_never_loops() {
    let (effect, handles) = probe();
    let mut animator = Animator::attach(
        mount(),
        MotionPreference::Reduced,
        AnimatorConfig::default(),
        effect,
        Millis(0.0),
    )
    .unwrap()
    .unwrap();

    assert_eq!(handles.renders.get(), 1);
    assert_eq!(handles.intros_skipped.get(), 1);
    assert_eq!(handles.last_reveal.get(), 1.0);
    assert!(!animator.running());

    // Nothing schedules afterwards, whatever the host feeds in.
    animator.on_reveal(1.0, Millis(100.0));
    animator.on_visibility(1.0, Millis(100.0));
    assert!(!animator.tick(Millis(116.0)).unwrap());
    assert!(!animator.running());
    assert_eq!(handles.renders.get(), 1);
    assert_eq!(handles.updates.get(), 0);
}

#[test]
fn immediate_trigger_skips_the_reveal_transition() {
    let (effect, handles) = probe();
    let mut animator = Animator::attach(
        mount(),
        MotionPreference::Full,
        AnimatorConfig {
            reveal: RevealTrigger::Immediate,
            ..AnimatorConfig::default()
        },
        effect,
        Millis(0.0),
    )
    .unwrap()
    .unwrap();

    assert_eq!(animator.phase(), Phase::Steady);
    assert!(animator.running());
    assert!(animator.tick(Millis(16.0)).unwrap());
    assert_eq!(handles.updates.get(), 1);
    assert_eq!(handles.last_reveal.get(), 1.0);
}

#[test]
fn resize_clamps_degenerate_containers() {
    let (mut animator, _) = attach_full(AnimatorConfig::default());
    animator.resize(0.0, -5.0).unwrap();
    let size = animator.surface().logical_size();
    assert_eq!((size.width, size.height), (1.0, 1.0));
}
