//! Recording stand-in for a browser, shared by the integration tests

#![allow(dead_code)]

use htmlconvert::{Error, PdfOptions, RenderEngine, RenderSession, Result, ScreenshotOptions};
use std::sync::{Arc, Mutex};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nstub-image";
pub const FAKE_PDF: &[u8] = b"%PDF-1.7 stub-document";

/// Which step the stub should fail at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Never,
    Launch,
    SetContent,
    Capture,
    Close,
}

/// Everything the stub observed, across all sessions it launched
#[derive(Debug, Default)]
pub struct Log {
    pub launches: usize,
    pub closes: usize,
    pub contents: Vec<String>,
    pub screenshots: Vec<ScreenshotOptions>,
    pub pdfs: Vec<PdfOptions>,
}

#[derive(Clone)]
pub struct StubEngine {
    pub log: Arc<Mutex<Log>>,
    fail_at: FailAt,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::failing_at(FailAt::Never)
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            log: Arc::new(Mutex::new(Log::default())),
            fail_at,
        }
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, Log> {
        self.log.lock().unwrap()
    }
}

impl RenderEngine for StubEngine {
    type Session = StubSession;

    fn launch(&self) -> Result<StubSession> {
        if self.fail_at == FailAt::Launch {
            return Err(Error::RenderError("stub: launch refused".into()));
        }
        self.log.lock().unwrap().launches += 1;
        Ok(StubSession {
            log: Arc::clone(&self.log),
            fail_at: self.fail_at,
        })
    }
}

pub struct StubSession {
    log: Arc<Mutex<Log>>,
    fail_at: FailAt,
}

impl RenderSession for StubSession {
    fn set_content(&mut self, html: &str) -> Result<()> {
        if self.fail_at == FailAt::SetContent {
            return Err(Error::RenderError("stub: content rejected".into()));
        }
        self.log.lock().unwrap().contents.push(html.to_string());
        Ok(())
    }

    fn screenshot(&mut self, options: &ScreenshotOptions) -> Result<Vec<u8>> {
        self.log.lock().unwrap().screenshots.push(*options);
        if self.fail_at == FailAt::Capture {
            return Err(Error::RenderError("stub: capture failed".into()));
        }
        Ok(FAKE_PNG.to_vec())
    }

    fn pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.log.lock().unwrap().pdfs.push(*options);
        if self.fail_at == FailAt::Capture {
            return Err(Error::RenderError("stub: capture failed".into()));
        }
        Ok(FAKE_PDF.to_vec())
    }

    fn close(self) -> Result<()> {
        self.log.lock().unwrap().closes += 1;
        if self.fail_at == FailAt::Close {
            return Err(Error::RenderError("stub: close failed".into()));
        }
        Ok(())
    }
}

/// Write `html` into a fresh temp dir and return (dir, path)
pub fn html_fixture(html: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.html");
    std::fs::write(&path, html).unwrap();
    (dir, path)
}
