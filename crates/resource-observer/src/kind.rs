//! URL-extension based resource classification.

use serde::{Deserialize, Serialize};
use url::Url;

/// Coarse resource category derived from the URL path extension.
///
/// The query string and fragment are ignored; only the last path
/// segment's extension is considered.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Html,
    Css,
    JavaScript,
    Image,
    Audio,
    Font,
    Json,
    SpineBinary,
    Other,
}

impl ResourceKind {
    /// Stable ordering used by per-kind report breakdowns.
    pub const REPORT_ORDER: [ResourceKind; 9] = [
        ResourceKind::Html,
        ResourceKind::Css,
        ResourceKind::JavaScript,
        ResourceKind::Image,
        ResourceKind::Audio,
        ResourceKind::Font,
        ResourceKind::Json,
        ResourceKind::SpineBinary,
        ResourceKind::Other,
    ];

    pub fn from_url(raw: &str) -> Self {
        let path = match Url::parse(raw) {
            Ok(url) => url.path().to_string(),
            // Relative or otherwise unparseable URL: strip query/fragment by hand.
            Err(_) => {
                let end = raw.find(['?', '#']).unwrap_or(raw.len());
                raw[..end].to_string()
            }
        };
        let segment = path.rsplit('/').next().unwrap_or("");
        let ext = match segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
            _ => return ResourceKind::Other,
        };
        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "html" | "htm" => ResourceKind::Html,
            "css" => ResourceKind::Css,
            "js" | "mjs" | "ts" => ResourceKind::JavaScript,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico" => ResourceKind::Image,
            "mp3" | "wav" | "ogg" | "m4a" | "aac" => ResourceKind::Audio,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => ResourceKind::Font,
            "json" => ResourceKind::Json,
            "atlas" | "skel" => ResourceKind::SpineBinary,
            _ => ResourceKind::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Html => "HTML",
            ResourceKind::Css => "CSS",
            ResourceKind::JavaScript => "JavaScript",
            ResourceKind::Image => "Image",
            ResourceKind::Audio => "Audio",
            ResourceKind::Font => "Font",
            ResourceKind::Json => "JSON",
            ResourceKind::SpineBinary => "Spine",
            ResourceKind::Other => "Other",
        }
    }
}
