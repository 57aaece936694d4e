use crate::{
    foundation::math::Rng64,
    render::painter::{Compose, Painter, RadialStop},
};

/// Darken the frame edges with a radial falloff.
///
/// Fully transparent out to `inner_radius`, ramping to `edge_alpha` black
/// at `outer_radius`.
pub fn vignette(painter: &mut Painter<'_>, inner_radius: f64, outer_radius: f64, edge_alpha: f64) {
    let center = painter.size().center();
    painter.set_compose(Compose::Over);
    painter.radial(
        center,
        inner_radius,
        outer_radius,
        &[
            RadialStop::new(0.0, [0, 0, 0], 0.0),
            RadialStop::new(1.0, [0, 0, 0], edge_alpha),
        ],
    );
}

/// Scatter a handful of 1–2px overlay speckles across the frame.
///
/// The generator is supplied by the caller so grain stays a pure function
/// of the frame timestamp: derive it per frame from the effect seed and
/// `t`, and identical inputs produce identical frames.
pub fn grain(painter: &mut Painter<'_>, rng: &mut Rng64, speckles: u32, alpha: f64) {
    let size = painter.size();
    painter.set_compose(Compose::Overlay);
    for _ in 0..speckles {
        let x = rng.next_range(0.0, size.width);
        let y = rng.next_range(0.0, size.height);
        let side = 1.0 + rng.next_f64_01();
        let shade = if rng.chance(0.5) { [255, 255, 255] } else { [0, 0, 0] };
        painter.fill_rect(x, y, side, side, shade, alpha);
    }
    painter.set_compose(Compose::Over);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::Surface;

    #[test]
    fn vignette_darkens_corners_not_center() {
        let mut surface = Surface::new(64.0, 64.0, 1.0).unwrap();
        {
            let mut p = surface.painter();
            p.clear([200, 200, 200]);
            vignette(&mut p, 12.0, 54.0, 0.5);
        }
        let px = |s: &Surface, x: u32, y: u32| {
            let (w, _) = s.pixel_dims();
            let i = ((y * w + x) * 4) as usize;
            s.pixels()[i]
        };
        let center = px(&surface, 32, 32);
        let corner = px(&surface, 1, 1);
        assert!(corner < center, "corner {corner} should be darker than center {center}");
    }

    #[test]
    fn grain_is_deterministic_per_seed() {
        let render = |seed: u64| {
            let mut surface = Surface::new(32.0, 32.0, 1.0).unwrap();
            {
                let mut p = surface.painter();
                p.clear([128, 128, 128]);
                let mut rng = Rng64::new(seed);
                grain(&mut p, &mut rng, 20, 0.4);
            }
            surface.pixels().to_vec()
        };
        assert_eq!(render(9), render(9));
        assert_ne!(render(9), render(10));
    }
}
