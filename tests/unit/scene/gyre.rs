use super::*;

use crate::foundation::core::{Millis, SurfaceSize};
use crate::render::surface::Surface;

fn ctx(t: f64, elapsed_ms: f64) -> FrameCtx {
    FrameCtx {
        t: Millis(t),
        elapsed_ms,
        reveal: 1.0,
        looping: true,
        size: SurfaceSize::clamped(240.0, 180.0),
    }
}

fn render_pixels(fx: &GyreEffect, c: &FrameCtx) -> Vec<u8> {
    let mut surface = Surface::new(240.0, 180.0, 1.0).unwrap();
    let mut p = surface.painter();
    fx.render(&mut p, c).unwrap();
    drop(p);
    surface.pixels().to_vec()
}

#[test]
fn construction_is_deterministic_per_seed() {
    let a = GyreEffect::new(GyreConfig::default());
    let b = GyreEffect::new(GyreConfig::default());
    for (ra, rb) in a.riders.iter().zip(&b.riders) {
        assert_eq!(ra.angle, rb.angle);
        assert_eq!(ra.speed, rb.speed);
    }
    for (da, db) in a.dust.iter().zip(&b.dust) {
        assert_eq!(da.pos, db.pos);
    }

    let c = GyreEffect::new(GyreConfig {
        seed: 99,
        ..GyreConfig::default()
    });
    assert_ne!(a.riders[0].angle, c.riders[0].angle);
}

#[test]
fn blooms_ramp_in_with_elapsed_time() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    assert_eq!(fx.bloom(), 0.0);

    // Early frames: global bloom rising, late riders still dark.
    for frame in 0..10u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, t), 16.0);
    }
    assert!(fx.bloom() > 0.0);
    assert!(fx.bloom() < 1.0);
    assert!(fx.riders.iter().any(|r| r.bloom == 0.0));

    // Four seconds in, everything is fully bloomed.
    for frame in 10..260u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, t), 16.0);
    }
    assert_eq!(fx.bloom(), 1.0);
    assert!(fx.riders.iter().all(|r| r.bloom == 1.0));
    assert!(fx.dust.iter().all(|d| d.bloom == 1.0));
}

#[test]
fn skip_intro_jumps_every_ramp_to_full() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    fx.skip_intro();
    assert_eq!(fx.bloom(), 1.0);
    assert!(fx.riders.iter().all(|r| r.bloom == 1.0));
    assert!(fx.dust.iter().all(|d| d.bloom == 1.0));
}

#[test]
fn dust_bounces_inside_its_bounds() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    fx.skip_intro();
    for frame in 0..5000u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, t + 10_000.0), 16.0);
    }
    for d in &fx.dust {
        // One step of slack beyond the bounce walls.
        assert!(d.pos.x.abs() < 0.66, "dust escaped x: {}", d.pos.x);
        assert!(d.pos.y.abs() < 0.66, "dust escaped y: {}", d.pos.y);
        assert!(d.pos.z.abs() < 0.36, "dust escaped z: {}", d.pos.z);
    }
}

#[test]
fn pointer_tilts_and_relaxes() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    fx.pointer(Some((0.5, 0.5)));
    for frame in 0..200u32 {
        fx.update(&ctx(f64::from(frame) * 16.0, 0.0), 16.0);
    }
    assert!(fx.tilt.0 > 0.1);
    assert!(fx.tilt.1 > 0.1);

    fx.pointer(None);
    for frame in 200..1200u32 {
        fx.update(&ctx(f64::from(frame) * 16.0, 0.0), 16.0);
    }
    assert!(fx.tilt.0.abs() < 0.01);
    assert!(fx.tilt.1.abs() < 0.01);
}

#[test]
fn render_is_deterministic_and_nonempty() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    fx.skip_intro();
    fx.update(&ctx(0.0, 3000.0), 16.0);

    let c = ctx(16.0, 3016.0);
    let a = render_pixels(&fx, &c);
    let b = render_pixels(&fx, &c);
    assert_eq!(a, b);

    // The background alone is never the whole frame.
    let bg = GyreConfig::default().background;
    assert!(
        a.chunks_exact(4)
            .any(|px| px[0] != bg[0] || px[1] != bg[1] || px[2] != bg[2])
    );
}

#[test]
fn frames_differ_across_time() {
    let mut fx = GyreEffect::new(GyreConfig::default());
    fx.skip_intro();
    fx.update(&ctx(0.0, 3000.0), 16.0);
    let first = render_pixels(&fx, &ctx(0.0, 3000.0));
    for frame in 1..40u32 {
        let t = f64::from(frame) * 16.0;
        fx.update(&ctx(t, 3000.0 + t), 16.0);
    }
    let later = render_pixels(&fx, &ctx(640.0, 3640.0));
    assert_ne!(first, later);
}
