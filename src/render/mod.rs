pub mod blur;
pub mod export;
pub mod painter;
pub mod post;
pub mod surface;
