use glam::DVec3;

/// Rotate about the X axis.
pub(crate) fn rotate_x(v: DVec3, a: f64) -> DVec3 {
    let (s, c) = a.sin_cos();
    DVec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}

/// Rotate about the Y axis.
pub(crate) fn rotate_y(v: DVec3, a: f64) -> DVec3 {
    let (s, c) = a.sin_cos();
    DVec3::new(v.x * c + v.z * s, v.y, -v.x * s + v.z * c)
}

/// Rotate about the Z axis.
pub(crate) fn rotate_z(v: DVec3, a: f64) -> DVec3 {
    let (s, c) = a.sin_cos();
    DVec3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
}

/// A camera-projected point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projected {
    pub x: f64,
    pub y: f64,
    /// Camera-space depth, for painter's sorting and depth fades.
    pub depth: f64,
    /// Perspective scale factor at this depth.
    pub scale: f64,
}

/// Simple perspective projection onto a surface centered at `(cx, cy)`.
pub(crate) fn project(v: DVec3, cx: f64, cy: f64, fov: f64) -> Projected {
    let scale = fov / (fov + v.z);
    Projected {
        x: cx + v.x * scale,
        y: cy + v.y * scale,
        depth: v.z,
        scale,
    }
}
