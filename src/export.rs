//! Turning assembled HTML into downloadable files.
//!
//! Renderers receive a self-contained HTML string: local image references
//! are inlined as data URIs first because the renderer cannot reach the
//! server's asset directory.

use async_trait::async_trait;
use base64::Engine;
use mime_guess::from_path;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::json;
use std::{
    fs,
    path::{Component, Path},
    time::Duration,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("renderer responded with status {0}")]
    Status(u16),
    #[error("renderer request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn extension(&self) -> &'static str;
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Posts `{"html": ...}` to an external HTML-to-PDF service and returns
/// the response body.
pub struct HttpPdfRenderer {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpPdfRenderer {
    pub fn new(url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url }
    }
}

#[async_trait]
impl DocumentRenderer for HttpPdfRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
    fn extension(&self) -> &'static str {
        "pdf"
    }
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let url = self
            .url
            .as_deref()
            .ok_or(RenderError::NotConfigured("PDF renderer"))?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "html": html }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RenderError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

const WORD_NAMESPACES: &str = "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" xmlns=\"http://www.w3.org/TR/REC-html40\"";
const WORD_SETTINGS: &str = "<head><!--[if gte mso 9]><xml><w:WordDocument><w:View>Print</w:View><w:Zoom>100</w:Zoom></w:WordDocument></xml><![endif]-->";

/// Produces a Word-readable HTML document locally.
pub struct WordRenderer;

#[async_trait]
impl DocumentRenderer for WordRenderer {
    fn content_type(&self) -> &'static str {
        "application/msword"
    }
    fn extension(&self) -> &'static str {
        "doc"
    }
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(word_envelope(html).into_bytes())
    }
}

fn word_envelope(html: &str) -> String {
    let document = if html.contains("<html") && html.contains("<head>") {
        html.to_string()
    } else {
        format!("<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{html}</body></html>")
    };
    document
        .replacen("<html", WORD_NAMESPACES, 1)
        .replacen("<head>", WORD_SETTINGS, 1)
}

static LOCAL_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<img\b[^>]*?\bsrc=")(/[^/"][^"]*)(")"#).expect("static regex"));

/// Replaces `<img src="/...">` references with data URIs read from
/// `asset_dir`. References that escape the directory or cannot be read are
/// left as they are.
pub fn inline_local_images(html: &str, asset_dir: &Path) -> String {
    LOCAL_IMAGE
        .replace_all(html, |caps: &Captures| {
            let src = &caps[2];
            match read_asset(asset_dir, src) {
                Some(data_uri) => format!("{}{}{}", &caps[1], data_uri, &caps[3]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn read_asset(asset_dir: &Path, src: &str) -> Option<String> {
    let relative = Path::new(src.split(|c| c == '?' || c == '#').next().unwrap_or(src).trim_start_matches('/'));
    if relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        warn!(src, "refusing to inline asset outside the asset directory");
        return None;
    }
    let path = asset_dir.join(relative);
    match fs::read(&path) {
        Ok(bytes) => {
            let mime = from_path(&path).first_or_octet_stream();
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            Some(format!("data:{};base64,{}", mime.essence_str(), encoded))
        }
        Err(error) => {
            warn!(src, %error, "could not inline asset");
            None
        }
    }
}

/// Filesystem-safe download name ending in `.{extension}`.
pub fn attachment_filename(requested: Option<&str>, extension: &str) -> String {
    let requested = requested.unwrap_or_default().trim();
    let stem = [".pdf", ".docx", ".doc", ".html"]
        .iter()
        .find_map(|suffix| {
            requested
                .len()
                .checked_sub(suffix.len())
                .filter(|&at| requested.is_char_boundary(at) && requested[at..].eq_ignore_ascii_case(suffix))
                .map(|at| &requested[..at])
        })
        .unwrap_or(requested);

    let mut slug = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("document.{extension}")
    } else {
        format!("{slug}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_assets(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rams-assets-{}-{name}", std::process::id()));
        fs::create_dir_all(dir.join("icons/ppe")).expect("create dir");
        fs::write(dir.join("icons/ppe/boots.svg"), "<svg/>").expect("write asset");
        dir
    }

    #[test]
    fn local_images_are_inlined() {
        let dir = temp_assets("inline");
        let html = r#"<img src="/icons/ppe/boots.svg" alt="Boots"><img src="https://cdn.example/x.png">"#;
        let inlined = inline_local_images(html, &dir);
        assert!(inlined.contains("src=\"data:image/svg+xml;base64,PHN2Zy8+\""));
        assert!(inlined.contains("https://cdn.example/x.png"));
    }

    #[test]
    fn traversal_and_missing_assets_are_left_alone() {
        let dir = temp_assets("traversal");
        let html = r#"<img src="/../secret.png"><img src="/icons/missing.svg">"#;
        assert_eq!(inline_local_images(html, &dir), html);
    }

    #[test]
    fn filenames_are_slugged_with_enforced_extension() {
        assert_eq!(attachment_filename(None, "pdf"), "document.pdf");
        assert_eq!(attachment_filename(Some("  "), "doc"), "document.doc");
        assert_eq!(
            attachment_filename(Some("RAMS - Full House Rewire.PDF"), "pdf"),
            "RAMS-Full-House-Rewire.pdf"
        );
        assert_eq!(attachment_filename(Some("../../etc/passwd"), "doc"), "etc-passwd.doc");
    }

    #[actix_web::test]
    async fn word_renderer_wraps_fragments() {
        let bytes = WordRenderer.render("<p>Hi</p>").await.expect("render");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("urn:schemas-microsoft-com:office:word"));
        assert!(text.contains("<body><p>Hi</p></body>"));
    }

    #[actix_web::test]
    async fn pdf_renderer_requires_configuration() {
        let error = HttpPdfRenderer::new(None).render("<p>Hi</p>").await.err();
        assert!(matches!(error, Some(RenderError::NotConfigured(_))));
    }
}
