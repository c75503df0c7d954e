//! Static file serving module
//!
//! Assets come from the public directory, plus the docs assets kept inside the
//! views tree. A request that matches no file falls through to the page routes.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use tokio::fs;

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;

const DOCS_ASSETS_PREFIX: &str = "/docs/assets/";

/// Serve a static asset, or `None` when no file matches the path
pub async fn serve_static(
    ctx: &RequestContext<'_>,
    site: &SiteConfig,
) -> Option<Response<Full<Bytes>>> {
    let (root, relative) = match ctx.path.strip_prefix(DOCS_ASSETS_PREFIX) {
        Some(rest) => (Path::new(&site.views_dir).join("docs/assets"), rest),
        None => (PathBuf::from(&site.public_dir), ctx.path),
    };
    let (content, content_type) = load_from_directory(&root, relative).await?;
    Some(build_static_file_response(
        content,
        content_type,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
    ))
}

/// Relative path with `.`/empty segments dropped; `None` if it climbs out
fn clean_relative(path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains(['\\', '\0']) => return None,
            s => relative.push(s),
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}

/// Load a regular file below `root`
pub async fn load_from_directory(root: &Path, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let Some(relative) = clean_relative(path) else {
        if path.contains("..") {
            logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        }
        return None;
    };

    // Missing roots and files are ordinary misses
    let root_canonical = fs::canonicalize(root).await.ok()?;
    let file_canonical = fs::canonicalize(root.join(&relative)).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    let metadata = fs::metadata(&file_canonical).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    match fs::read(&file_canonical).await {
        Ok(content) => Some((content, mime::content_type_for(&file_canonical))),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use tempfile::TempDir;

    fn site(dir: &TempDir) -> SiteConfig {
        let public = dir.path().join("public");
        let views = dir.path().join("views");
        std::fs::create_dir_all(public.join("css")).unwrap();
        std::fs::create_dir_all(views.join("docs/assets")).unwrap();
        std::fs::write(public.join("css/light-theme.css"), "body {}").unwrap();
        std::fs::write(views.join("docs/assets/site.js"), "init();").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "nope").unwrap();

        SiteConfig {
            views_dir: views.to_string_lossy().into_owned(),
            public_dir: public.to_string_lossy().into_owned(),
            data_dir: dir.path().join("data").to_string_lossy().into_owned(),
            basepath: "/".to_string(),
            title: "SoHo XI".to_string(),
            locale: "en-US".to_string(),
            theme: "light".to_string(),
            live_reload: false,
            version: "test".to_string(),
            commit: String::new(),
        }
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_serves_public_asset() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let resp = serve_static(&ctx("/css/light-theme.css"), &site).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/css; charset=utf-8");
        assert!(resp.headers().contains_key("ETag"));
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"body {}");
    }

    #[tokio::test]
    async fn test_serves_docs_assets_from_views() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let resp = serve_static(&ctx("/docs/assets/site.js"), &site).await.unwrap();
        assert_eq!(
            resp.headers()["Content-Type"],
            "application/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_etag_revalidation() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        let first = serve_static(&ctx("/css/light-theme.css"), &site).await.unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let mut ctx = ctx("/css/light-theme.css");
        ctx.if_none_match = Some(etag);
        let resp = serve_static(&ctx, &site).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_misses_fall_through() {
        let dir = TempDir::new().unwrap();
        let site = site(&dir);
        assert!(serve_static(&ctx("/controls/dropdown"), &site).await.is_none());
        assert!(serve_static(&ctx("/css"), &site).await.is_none());
        assert!(serve_static(&ctx("/"), &site).await.is_none());
        assert!(serve_static(&ctx("/../secret.txt"), &site).await.is_none());
        assert!(serve_static(&ctx("/css/%2e%2e/../secret.txt"), &site).await.is_none());
    }
}
