//! Renders `demos/invoice.html` to `invoice.png` and `invoice.pdf`

use htmlconvert::{ChromeEngine, ConversionRequest, Converter, EngineConfig, Substitutions, Viewport};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subs = Substitutions::new()
        .with("number", "2024-017")
        .with("customer", "ACME Corp.")
        .with("total", "1 280.00 EUR");

    let request = ConversionRequest::new("demos/invoice.html").with_substitutions(subs);
    let config = EngineConfig {
        viewport: Viewport { width: 1024, height: 768 },
        ..Default::default()
    };
    let converter = Converter::new(request, ChromeEngine::new(config));

    println!("Resolved HTML:\n{}\n", converter.resolve_text()?);

    let png = converter.to_image(Some(Path::new("invoice.png")))?;
    println!("Screenshot saved to invoice.png ({} base64 chars)", png.len());

    let pdf = converter.to_pdf(Some(Path::new("invoice.pdf")))?;
    println!("PDF saved to invoice.pdf ({} base64 chars)", pdf.len());

    Ok(())
}
