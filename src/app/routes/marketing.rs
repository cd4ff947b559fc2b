use crate::app::state::AppState;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::path::{Component, Path, PathBuf};

/// Marketing site and shared assets, served from `[server].public_root`.
pub async fn serve_public(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let root = Path::new(&state.config.server.public_root);
    let Some(relative) = sanitize(uri.path()) else {
        tracing::debug!("Rejected public path {}", uri.path());
        return StatusCode::NOT_FOUND.into_response();
    };

    for candidate in candidates(&relative) {
        let full_path = root.join(&candidate);
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => {
                let content_type = content_type_for(&candidate);
                return ([(header::CONTENT_TYPE, content_type.as_ref().to_string())], bytes)
                    .into_response();
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            // 目錄或權限問題：繼續嘗試下一個候選
            Err(e) => {
                tracing::debug!("Skipping {}: {}", full_path.display(), e);
                continue;
            }
        }
    }

    match tokio::fs::read(root.join("404.html")).await {
        Ok(bytes) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref().to_string())],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Relative path under the public root; `None` for anything that could leave it.
fn sanitize(path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(relative)
}

/// `/pricing` may be `pricing`, `pricing.html` or `pricing/index.html`.
fn candidates(relative: &Path) -> Vec<PathBuf> {
    if relative.as_os_str().is_empty() {
        return vec![PathBuf::from("index.html")];
    }
    if relative.extension().is_some() {
        return vec![relative.to_path_buf()];
    }
    vec![
        relative.with_extension("html"),
        relative.join("index.html"),
        relative.to_path_buf(),
    ]
}

fn content_type_for(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => mime::TEXT_HTML_UTF_8,
        "css" => mime::TEXT_CSS_UTF_8,
        "js" | "mjs" => mime::APPLICATION_JAVASCRIPT_UTF_8,
        "json" => mime::APPLICATION_JSON,
        "txt" => mime::TEXT_PLAIN_UTF_8,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "svg" => mime::IMAGE_SVG,
        "bmp" => mime::IMAGE_BMP,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        "pdf" => mime::APPLICATION_PDF,
        other => other_content_type(other),
    }
}

fn other_content_type(ext: &str) -> mime::Mime {
    let essence = match ext {
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",
        "xml" => "application/xml",
        "webmanifest" => "application/manifest+json",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}
