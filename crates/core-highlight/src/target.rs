//! Render target seam.
//!
//! The tracker never draws anything itself; every public call that changes
//! the visible highlighting hands the complete content to a `RenderTarget`
//! exactly once. Implementors replace whatever they display wholesale.

pub trait RenderTarget {
    /// Replace the displayed content.
    fn set_content(&mut self, content: &str);
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn set_content(&mut self, content: &str) {
        (**self).set_content(content)
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn set_content(&mut self, content: &str) {
        (**self).set_content(content)
    }
}

/// Plain string surface: keeps only the latest content.
impl RenderTarget for String {
    fn set_content(&mut self, content: &str) {
        self.clear();
        self.push_str(content);
    }
}

/// Target retaining every frame it was handed, oldest first.
#[derive(Debug, Default, Clone)]
pub struct RecordingTarget {
    frames: Vec<String>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }
    pub fn frames(&self) -> &[String] {
        &self.frames
    }
    pub fn last(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }
    pub fn write_count(&self) -> usize {
        self.frames.len()
    }
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn set_content(&mut self, content: &str) {
        self.frames.push(content.to_owned());
    }
}
