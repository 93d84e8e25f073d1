//! The rendering collaborator of the fitness evaluator.
//!
//! A renderer owns one scene. `set_configuration` replaces it with one glyph
//! per gene, `make_screenshot` turns the globe to a viewpoint and returns a
//! grayscale frame: white background, glyph ink dark.

pub mod software;

use crate::engines::generation::Gene;
use crate::error::Result;
use crate::types::Viewpoint;
use image::GrayImage;

pub use software::SoftwareRenderer;

pub trait Renderer {
    /// Replace the whole scene with the glyphs described by `genes`.
    fn set_configuration(&mut self, genes: &[Gene]);

    /// Render the current scene at `viewpoint`. Blocks until the frame is
    /// complete.
    fn make_screenshot(&mut self, viewpoint: Viewpoint) -> Result<GrayImage>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn set_configuration(&mut self, genes: &[Gene]) {
        (**self).set_configuration(genes)
    }

    fn make_screenshot(&mut self, viewpoint: Viewpoint) -> Result<GrayImage> {
        (**self).make_screenshot(viewpoint)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn set_configuration(&mut self, genes: &[Gene]) {
        (**self).set_configuration(genes)
    }

    fn make_screenshot(&mut self, viewpoint: Viewpoint) -> Result<GrayImage> {
        (**self).make_screenshot(viewpoint)
    }
}
