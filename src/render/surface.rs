use tiny_skia::Pixmap;

use crate::{
    foundation::{
        core::{Dpr, SurfaceSize},
        error::{ScintillaError, ScintillaResult},
    },
    render::painter::Painter,
};

/// A device-pixel-ratio-aware raster drawing target.
///
/// The backing pixmap is `logical × dpr` pixels of premultiplied RGBA8 and
/// is recreated on resize. A same-size scratch pixmap rides along for the
/// glow layer so the per-frame path never allocates.
pub struct Surface {
    pixmap: Pixmap,
    scratch: Pixmap,
    size: SurfaceSize,
    dpr: Dpr,
}

impl Surface {
    /// Allocate a surface for a container of the given logical dimensions.
    /// Degenerate dimensions are clamped, never rejected.
    pub fn new(width: f64, height: f64, dpr: f64) -> ScintillaResult<Self> {
        let size = SurfaceSize::clamped(width, height);
        let dpr = Dpr::new(dpr);
        let (pw, ph) = device_dims(size, dpr);
        let pixmap = Pixmap::new(pw, ph)
            .ok_or_else(|| ScintillaError::render("failed to allocate surface pixmap"))?;
        let scratch = Pixmap::new(pw, ph)
            .ok_or_else(|| ScintillaError::render("failed to allocate scratch pixmap"))?;
        Ok(Self {
            pixmap,
            scratch,
            size,
            dpr,
        })
    }

    /// Recreate the backing pixmaps for new container dimensions.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: f64, height: f64) -> ScintillaResult<()> {
        let size = SurfaceSize::clamped(width, height);
        if size == self.size {
            return Ok(());
        }
        let (pw, ph) = device_dims(size, self.dpr);
        self.pixmap = Pixmap::new(pw, ph)
            .ok_or_else(|| ScintillaError::render("failed to allocate surface pixmap"))?;
        self.scratch = Pixmap::new(pw, ph)
            .ok_or_else(|| ScintillaError::render("failed to allocate scratch pixmap"))?;
        self.size = size;
        Ok(())
    }

    /// Logical (pre-DPR) dimensions.
    pub fn logical_size(&self) -> SurfaceSize {
        self.size
    }

    /// Effective device pixel ratio.
    pub fn dpr(&self) -> f64 {
        self.dpr.get()
    }

    /// Backing pixel dimensions.
    pub fn pixel_dims(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Premultiplied RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Borrow a painter over this surface.
    pub fn painter(&mut self) -> Painter<'_> {
        Painter::new(&mut self.pixmap, &mut self.scratch, self.size, self.dpr.get())
    }
}

fn device_dims(size: SurfaceSize, dpr: Dpr) -> (u32, u32) {
    let w = (size.width * dpr.get()).round().max(1.0) as u32;
    let h = (size.height * dpr.get()).round().max(1.0) as u32;
    (w, h)
}
