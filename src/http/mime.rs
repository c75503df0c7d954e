//! MIME type detection for static assets

use std::path::Path;

/// Content-Type for a file, decided by its extension (case-insensitive)
///
/// ```text
/// public/css/light-theme.css -> text/css; charset=utf-8
/// public/svg/icons.svg       -> image/svg+xml
/// public/README              -> application/octet-stream
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    get_content_type(extension.as_deref())
}

/// Content-Type for a lowercase extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",

        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("eot") => "application/vnd.ms-fontobject",

        Some("pdf") => "application/pdf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_asset_types() {
        assert_eq!(content_type_for(Path::new("css/light-theme.css")), "text/css; charset=utf-8");
        assert_eq!(
            content_type_for(Path::new("js/sohoxi.min.js")),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("js/sohoxi.min.js.map")), "application/json");
        assert_eq!(content_type_for(Path::new("svg/icons.SVG")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("fonts/source-sans.woff2")), "font/woff2");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
        assert_eq!(get_content_type(Some("xyz")), "application/octet-stream");
    }
}
