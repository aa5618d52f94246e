//! Render-engine capability consumed by the converter.
//!
//! A [`RenderEngine`] launches short-lived [`RenderSession`]s. Each session
//! owns one browser (or stand-in) for the duration of a single conversion:
//! the converter loads HTML into it, captures one artifact, and closes it.
//! Sessions are never shared between conversions.

use crate::Result;

/// Image format of a captured screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
        }
    }
}

/// Screenshot parameters. The capture always covers the rendered viewport;
/// there is no clip region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenshotOptions {
    pub format: ImageFormat,
}

/// Paper size of an exported PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperFormat {
    #[default]
    A4,
}

impl PaperFormat {
    pub fn name(&self) -> &'static str {
        match self {
            PaperFormat::A4 => "A4",
        }
    }

    /// Paper `(width, height)` in inches
    pub fn size_inches(&self) -> (f64, f64) {
        match self {
            PaperFormat::A4 => (8.27, 11.69),
        }
    }
}

/// PDF export parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PdfOptions {
    pub format: PaperFormat,
}

/// Factory for render sessions
///
/// Implementations must be shareable across threads so that independent
/// conversions can launch their own sessions concurrently.
pub trait RenderEngine: Send + Sync {
    type Session: RenderSession;

    /// Launch a fresh session (e.g. start a browser process and open a page)
    fn launch(&self) -> Result<Self::Session>;
}

/// A single launched page context
pub trait RenderSession {
    /// Replace the page content with `html` and wait for it to load
    fn set_content(&mut self, html: &str) -> Result<()>;

    /// Capture the rendered page as image bytes
    fn screenshot(&mut self, options: &ScreenshotOptions) -> Result<Vec<u8>>;

    /// Export the rendered page as PDF bytes
    fn pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>>;

    /// Terminate the session and release its resources
    fn close(self) -> Result<()>;
}
