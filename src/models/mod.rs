pub mod envelope;
pub mod image;

pub use envelope::*;
pub use image::*;
