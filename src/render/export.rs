use std::path::Path;

use crate::{
    foundation::error::{ScintillaError, ScintillaResult},
    render::surface::Surface,
};

/// Write the surface's current frame to a PNG file.
///
/// The surface stores premultiplied alpha; PNG wants straight, so pixels
/// are un-premultiplied on the way out. Debugging/golden-frame surface
/// only — nothing in the animation path touches the filesystem.
pub fn write_png(surface: &Surface, path: impl AsRef<Path>) -> ScintillaResult<()> {
    let (w, h) = surface.pixel_dims();
    let mut data = surface.pixels().to_vec();
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a != 0 && a != 255 {
            for c in px.iter_mut().take(3) {
                let straight = (u16::from(*c) * 255 + u16::from(a) / 2) / u16::from(a);
                *c = straight.min(255) as u8;
            }
        }
    }

    let img = image::RgbaImage::from_raw(w, h, data)
        .ok_or_else(|| ScintillaError::render("surface buffer does not match dimensions"))?;
    img.save(path.as_ref())
        .map_err(|e| ScintillaError::Other(anyhow::Error::new(e)))?;
    Ok(())
}
