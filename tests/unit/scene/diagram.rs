use super::*;

use crate::render::surface::Surface;

fn ctx(t: f64, reveal: f64, looping: bool) -> FrameCtx {
    FrameCtx {
        t: Millis(t),
        elapsed_ms: t,
        reveal,
        looping,
        size: SurfaceSize::clamped(640.0, 460.0),
    }
}

fn render_pixels(fx: &DiagramEffect, c: &FrameCtx) -> Vec<u8> {
    let mut surface = Surface::new(640.0, 460.0, 1.0).unwrap();
    let mut p = surface.painter();
    fx.render(&mut p, c).unwrap();
    drop(p);
    surface.pixels().to_vec()
}

#[test]
fn rejects_degenerate_timing_config() {
    let config = DiagramConfig {
        hold_ms: 0.0,
        ..DiagramConfig::default()
    };
    assert!(DiagramEffect::new(config).is_err());

    let config = DiagramConfig {
        hit_radius_ratio: -1.0,
        ..DiagramConfig::default()
    };
    assert!(DiagramEffect::new(config).is_err());
}

#[test]
fn ring_phase_wipes_rings_in_order() {
    // Each ring starts 0.12 of reveal progress after the previous one.
    assert_eq!(DiagramEffect::ring_phase(0.0, 0), 0.0);
    assert!(DiagramEffect::ring_phase(0.2, 0) > DiagramEffect::ring_phase(0.2, 1));
    assert_eq!(DiagramEffect::ring_phase(1.0, 4), 1.0);
    for ring in 0..5 {
        let mut prev = 0.0;
        for i in 0..=20 {
            let p = DiagramEffect::ring_phase(f64::from(i) / 20.0, ring);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev);
            prev = p;
        }
    }
}

#[test]
fn dots_eventually_light_most_labels() {
    let mut fx = DiagramEffect::new(DiagramConfig::default()).unwrap();
    let mut lit_any = vec![false; fx.emphasis_values(Millis(0.0)).len()];

    // Drive a couple of minutes of steady state; the orbiting dots sweep
    // past the labels offset just outside their own rings. (The outermost
    // pills sit beyond any dot's reach and stay dark, as configured.)
    for frame in 0..8000u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, 1.0, true), 16.0);
        for (flag, v) in lit_any.iter_mut().zip(fx.emphasis_values(Millis(t))) {
            *flag |= v > 0.0;
        }
    }
    let lit = lit_any.iter().filter(|&&f| f).count();
    assert!(
        lit > lit_any.len() / 2,
        "only {lit}/{} labels ever lit",
        lit_any.len()
    );
}

#[test]
fn no_emphasis_accrues_before_steady_state() {
    let mut fx = DiagramEffect::new(DiagramConfig::default()).unwrap();
    for frame in 0..600u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, 0.9, false), 16.0);
    }
    let values = fx.emphasis_values(Millis(600.0 * 16.0));
    assert!(values.iter().all(|&v| v == 0.0));
}

#[test]
fn reveal_accretes_pixels() {
    let fx = DiagramEffect::new(DiagramConfig::default()).unwrap();
    let ink = |reveal: f64| {
        render_pixels(&fx, &ctx(0.0, reveal, false))
            .chunks_exact(4)
            .filter(|px| px[3] != 0)
            .count()
    };
    assert_eq!(ink(0.0), 0);
    assert!(ink(0.5) > 0);
    assert!(ink(1.0) > ink(0.5));
}

#[test]
fn lit_labels_change_the_frame() {
    let mut fx = DiagramEffect::new(DiagramConfig::default()).unwrap();
    let quiet = render_pixels(&fx, &ctx(0.0, 1.0, true));

    // Advance until some label is lit, then compare at that instant.
    let mut lit_time = None;
    for frame in 0..8000u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, 1.0, true), 16.0);
        if fx.emphasis_values(Millis(t)).iter().any(|&v| v > 0.5) {
            lit_time = Some(t);
            break;
        }
    }
    let lit_time = lit_time.expect("no label ever lit");
    let lit = render_pixels(&fx, &ctx(lit_time, 1.0, true));
    assert_ne!(quiet, lit);
}
