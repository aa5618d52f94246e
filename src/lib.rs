//! HTML Convert
//!
//! Turns an HTML file with `{{key}}` placeholders into a screenshot or an A4
//! PDF by driving a headless browser, and hands the result back as base64.
//!
//! # Features
//!
//! - **CDP Backend** (default): renders through headless Chrome via the
//!   Chrome DevTools Protocol
//! - **Injectable engines**: the browser sits behind the [`RenderEngine`]
//!   trait so it can be swapped for a deterministic stand-in
//! - **One session per call**: every conversion launches and tears down its
//!   own browser session
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cdp")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use htmlconvert::{ChromeEngine, ConversionRequest, Converter, EngineConfig, Substitutions};
//!
//! let request = ConversionRequest::new("templates/greeting.html")
//!     .with_substitutions(Substitutions::new().with("name", "World"));
//! let converter = Converter::new(request, ChromeEngine::new(EngineConfig::default()));
//!
//! let png_base64 = converter.to_image(None)?;
//! let pdf_base64 = converter.to_pdf(Some(std::path::Path::new("greeting.pdf")))?;
//! println!("{} / {}", png_base64.len(), pdf_base64.len());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cdp"))]
//! # fn main() {}
//! ```

use serde::Deserialize;
use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod encoding;
pub use encoding::TextEncoding;

pub mod template;
pub use template::Substitutions;

pub mod engine;
pub use engine::{ImageFormat, PaperFormat, PdfOptions, RenderEngine, RenderSession, ScreenshotOptions};

pub mod converter;
pub use converter::{ArtifactKind, ConversionRequest, Converter, RenderedArtifact};

// Async-friendly facade (worker thread per conversion)
pub mod async_api;
pub use async_api::AsyncConverter;

#[cfg(feature = "cdp")]
pub mod cdp;

#[cfg(feature = "cdp")]
pub use cdp::{ChromeEngine, ChromeSession};

/// Configuration for the headless Chrome engine
///
/// Deserializable from JSON so a host can keep it in a config file; missing
/// fields take their default value.
///
/// # Examples
///
/// ```
/// let cfg: htmlconvert::EngineConfig = serde_json::from_str(r#"{"timeout_ms": 5000}"#).unwrap();
/// assert_eq!(cfg.timeout_ms, 5000);
/// assert_eq!(cfg.viewport.width, 1280);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Browser window dimensions
    pub viewport: Viewport,
    /// Default timeout for browser operations in milliseconds
    pub timeout_ms: u64,
    /// Extra pause after the content has loaded, for pages that settle late
    pub settle_ms: u64,
    /// Run Chrome with its sandbox enabled
    pub sandbox: bool,
    /// Explicit Chrome/Chromium executable; auto-detected when unset
    pub chrome_path: Option<PathBuf>,
    /// Override the browser's user agent
    pub user_agent: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            timeout_ms: 30000,
            settle_ms: 0,
            sandbox: true,
            chrome_path: None,
            user_agent: None,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport.width, 1280);
        assert_eq!(config.viewport.height, 720);
        assert!(config.sandbox);
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"viewport": {"width": 800, "height": 600}, "sandbox": false, "chrome_path": "/usr/bin/chromium"}"#,
        )
        .unwrap();
        assert_eq!(config.viewport.width, 800);
        assert!(!config.sandbox);
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
    }
}
