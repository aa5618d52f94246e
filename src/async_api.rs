use crate::engine::RenderEngine;
use crate::{Converter, Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

/// An async-friendly converter backed by one worker thread per call.
///
/// Each call spawns a thread that launches its own render session, runs the
/// blocking conversion and reports the result through a oneshot channel, so
/// callers can await conversions without blocking the runtime and without
/// requiring render sessions to be `Send`. Calls are independent and may run
/// concurrently.
pub struct AsyncConverter<E: RenderEngine + 'static> {
    inner: Arc<Converter<E>>,
    timeout: Option<Duration>,
}

impl<E: RenderEngine + 'static> Clone for AsyncConverter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            timeout: self.timeout,
        }
    }
}

impl<E: RenderEngine + 'static> AsyncConverter<E> {
    pub fn new(converter: Converter<E>) -> Self {
        Self {
            inner: Arc::new(converter),
            timeout: None,
        }
    }

    /// Fail calls that take longer than `timeout` with [`Error::Timeout`].
    ///
    /// The worker is not interrupted: it keeps running and still closes its
    /// session once the engine returns, but the result is discarded.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn converter(&self) -> &Converter<E> {
        &self.inner
    }

    /// Read the source file and apply the placeholder substitutions
    pub async fn resolve_text(&self) -> Result<String> {
        self.run("ResolveText", |c| c.resolve_text()).await
    }

    /// Screenshot the document; if `output` is Some, the image is also saved to that path.
    pub async fn to_image(&self, output: Option<PathBuf>) -> Result<String> {
        self.run("ToImage", move |c| c.to_image(output.as_deref())).await
    }

    /// Export the document as an A4 PDF; if `output` is Some, the PDF is also saved to that path.
    pub async fn to_pdf(&self, output: Option<PathBuf>) -> Result<String> {
        self.run("ToPdf", move |c| c.to_pdf(output.as_deref())).await
    }

    async fn run<T, F>(&self, label: &'static str, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Converter<E>) -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let converter = Arc::clone(&self.inner);

        thread::Builder::new()
            .name(format!("htmlconvert-{}", label))
            .spawn(move || {
                // Receiver may be gone after a timeout
                let _ = tx.send(job(&converter));
            })
            .map_err(|e| Error::Other(format!("Failed to spawn {} worker: {}", label, e)))?;

        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, rx)
                .await
                .map_err(|_| Error::Timeout(limit.as_millis() as u64))?,
            None => rx.await,
        };

        reply.map_err(|e| Error::Other(format!("{} canceled: {}", label, e)))?
    }
}
