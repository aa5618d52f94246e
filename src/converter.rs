//! HTML file to image/PDF conversion.

use crate::engine::{ImageFormat, PaperFormat, PdfOptions, RenderEngine, RenderSession, ScreenshotOptions};
use crate::template::{substitute, Substitutions};
use crate::{Error, Result, TextEncoding};
use base64::Engine as Base64Engine;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// What to convert: a source HTML file, how to decode it and which
/// placeholders to fill in.
///
/// Building a request never touches the filesystem; the source path is only
/// resolved and read when a conversion runs.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    source: PathBuf,
    encoding: TextEncoding,
    substitutions: Substitutions,
}

impl ConversionRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            encoding: TextEncoding::default(),
            substitutions: Substitutions::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_substitutions(mut self, substitutions: Substitutions) -> Self {
        self.substitutions = substitutions;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }
}

/// Kind of a rendered artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image(ImageFormat),
    Pdf(PaperFormat),
}

/// Raw bytes produced by one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl RenderedArtifact {
    pub fn mime_type(&self) -> &'static str {
        match self.kind {
            ArtifactKind::Image(format) => format.mime_type(),
            ArtifactKind::Pdf(_) => "application/pdf",
        }
    }

    /// Standard (padded) base64 of the artifact bytes
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Write the raw bytes to `path`
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .map_err(|e| Error::WriteError(format!("{}: {}", path.display(), e)))
    }
}

/// Converts one templated HTML file through an injected render engine.
///
/// Every conversion runs the same linear pipeline: resolve text, launch a
/// session, load the HTML, capture, close the session, encode. The session
/// is closed on both the success and the failure path before the result is
/// returned.
pub struct Converter<E: RenderEngine> {
    request: ConversionRequest,
    engine: E,
}

impl<E: RenderEngine> Converter<E> {
    pub fn new(request: ConversionRequest, engine: E) -> Self {
        Self { request, engine }
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Read the source file and apply the placeholder substitutions.
    pub fn resolve_text(&self) -> Result<String> {
        self.read_source().map_err(|e| {
            error!("Error reading HTML file: {}", e);
            e
        })
    }

    fn read_source(&self) -> Result<String> {
        let path = std::path::absolute(&self.request.source).map_err(|e| {
            Error::ReadError(format!("{}: {}", self.request.source.display(), e))
        })?;
        debug!("Reading HTML from {} as {}", path.display(), self.request.encoding);

        let bytes = std::fs::read(&path)
            .map_err(|e| Error::ReadError(format!("{}: {}", path.display(), e)))?;
        let text = self.request.encoding.decode(&bytes)?;

        if self.request.substitutions.is_empty() {
            return Ok(text);
        }
        Ok(substitute(&text, &self.request.substitutions))
    }

    /// Render a screenshot of the resolved document.
    pub fn render_image(&self) -> Result<RenderedArtifact> {
        let options = ScreenshotOptions::default();
        let html = self.resolve_text()?;
        let bytes = self.with_session(&html, |session| session.screenshot(&options))?;
        Ok(RenderedArtifact {
            kind: ArtifactKind::Image(options.format),
            bytes,
        })
    }

    /// Render the resolved document as an A4 PDF.
    pub fn render_pdf(&self) -> Result<RenderedArtifact> {
        let options = PdfOptions {
            format: PaperFormat::A4,
        };
        let html = self.resolve_text()?;
        let bytes = self.with_session(&html, |session| session.pdf(&options))?;
        Ok(RenderedArtifact {
            kind: ArtifactKind::Pdf(options.format),
            bytes,
        })
    }

    /// Screenshot the document and return it base64-encoded. If `output` is
    /// given, the raw image is also written there.
    pub fn to_image(&self, output: Option<&Path>) -> Result<String> {
        let encoded = self.render_image().and_then(|artifact| finish(&artifact, output));
        match encoded {
            Ok(b64) => {
                info!("Image captured and converted to base64");
                Ok(b64)
            }
            Err(e) => {
                error!("Error converting HTML to image: {}", e);
                Err(e)
            }
        }
    }

    /// Export the document as an A4 PDF and return it base64-encoded. If
    /// `output` is given, the raw PDF is also written there.
    pub fn to_pdf(&self, output: Option<&Path>) -> Result<String> {
        let encoded = self.render_pdf().and_then(|artifact| finish(&artifact, output));
        match encoded {
            Ok(b64) => {
                match output {
                    Some(path) => info!("PDF saved to {}", path.display()),
                    None => info!("PDF generated and converted to base64"),
                }
                Ok(b64)
            }
            Err(e) => {
                error!("Error converting HTML to PDF: {}", e);
                Err(e)
            }
        }
    }

    fn with_session<F>(&self, html: &str, capture: F) -> Result<Vec<u8>>
    where
        F: FnOnce(&mut E::Session) -> Result<Vec<u8>>,
    {
        let mut session = self.engine.launch()?;
        debug!("Render session launched, loading {} bytes of HTML", html.len());

        let captured = session.set_content(html).and_then(|_| capture(&mut session));
        let closed = session.close();

        let bytes = match captured {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Err(close_err) = closed {
                    warn!("Failed to close render session: {}", close_err);
                }
                return Err(e);
            }
        };
        closed?;
        debug!("Captured {} bytes", bytes.len());
        Ok(bytes)
    }
}

fn finish(artifact: &RenderedArtifact, output: Option<&Path>) -> Result<String> {
    if let Some(path) = output {
        artifact.write_to(path)?;
    }
    Ok(artifact.to_base64())
}

impl<E: RenderEngine> std::fmt::Debug for Converter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter").field("request", &self.request).finish_non_exhaustive()
    }
}
