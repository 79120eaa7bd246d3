//! HTTP request handlers.

use crate::error::{AppError, Result};
use crate::library::{ItemKind, Neighbor, PageContent};
use crate::server::AppState;
use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

/// Body returned when navigation runs past either end of the catalog.
pub const NO_MORE_CHAPTERS: &str = "No more chapters";

const STYLE: &str = r#"
        body { font-family: system-ui, sans-serif; max-width: 900px; margin: 2rem auto; padding: 0 1rem; background: #111; color: #eee; }
        a { color: #6cf; }
        nav { display: flex; justify-content: space-between; margin: 1rem 0; }
        figure { margin: 0 0 1rem 0; text-align: center; }
        figure img { max-width: 100%; }
        figcaption { font-size: 0.8rem; color: #888; }
"#;

/// Percent-encode a name for use as a single path segment.
fn encode_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Relative link used by the chapter list.
fn chapter_link(name: &str) -> String {
    format!("chapters/{}", encode_segment(name))
}

/// Absolute URL of a chapter reader page.
fn chapter_url(name: &str) -> String {
    format!("/chapters/{}", encode_segment(name))
}

/// Absolute URL of a page image. Archive entries may contain `/`.
fn image_url(name: &str, page: &str) -> String {
    let page = page
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/");
    format!("/images/{}/{}", encode_segment(name), page)
}

/// Escape text for HTML content and attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// JSON MODELS
// ============================================================================

/// Entry of the chapter list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChapterLinkJson {
    /// Chapter title.
    pub title: String,
    /// Link to the reader page.
    pub url: String,
}

/// Page entry of a chapter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageJson {
    /// Page name.
    pub title: String,
    /// Image URL.
    pub image: String,
}

/// Chapter reader data.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChapterJson {
    /// Chapter title.
    pub title: String,
    /// Storage kind.
    pub kind: ItemKind,
    /// Pages in reading order.
    pub pages: Vec<PageJson>,
    /// Previous chapter link.
    pub previous_url: String,
    /// Next chapter link.
    pub next_url: String,
}

async fn load_chapter_list(state: &AppState) -> Result<Vec<ChapterLinkJson>> {
    state
        .with_catalog(|catalog| {
            Ok(catalog
                .list_items()?
                .iter()
                .map(|item| ChapterLinkJson {
                    title: item.title().to_string(),
                    url: chapter_link(&item.name),
                })
                .collect())
        })
        .await
}

async fn load_chapter(state: &AppState, name: String) -> Result<ChapterJson> {
    state
        .with_catalog(move |catalog| {
            let kind = catalog.item(&name)?.kind;
            let pages = catalog.get_pages(&name)?;

            Ok(ChapterJson {
                title: name.clone(),
                kind,
                pages: pages
                    .names()
                    .map(|page| PageJson {
                        title: page.to_string(),
                        image: image_url(&name, page),
                    })
                    .collect(),
                previous_url: format!("/prev/{}", encode_segment(&name)),
                next_url: format!("/next/{}", encode_segment(&name)),
            })
        })
        .await
}

// ============================================================================
// WEB PAGES
// ============================================================================

/// Chapter list page.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    let chapters = load_chapter_list(&state).await?;

    let items: String = chapters
        .iter()
        .map(|c| {
            format!(
                "        <li><a href=\"{}\">{}</a></li>\n",
                escape_html(&c.url),
                escape_html(&c.title)
            )
        })
        .collect();

    let title = escape_html(&state.config.server.title);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <h1>{title}</h1>
    <p>{count} chapters</p>
    <ul>
{items}    </ul>
</body>
</html>"#,
        count = chapters.len(),
    );

    Ok(Html(html))
}

/// Chapter reader page.
pub async fn chapter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>> {
    let chapter = load_chapter(&state, name).await?;

    let nav = format!(
        "    <nav><a href=\"{}\">&larr; Previous</a><a href=\"/\">Chapters</a><a href=\"{}\">Next &rarr;</a></nav>\n",
        escape_html(&chapter.previous_url),
        escape_html(&chapter.next_url)
    );

    let figures: String = chapter
        .pages
        .iter()
        .map(|p| {
            format!(
                "    <figure><img src=\"{}\" alt=\"{}\" loading=\"lazy\"><figcaption>{}</figcaption></figure>\n",
                escape_html(&p.image),
                escape_html(&p.title),
                escape_html(&p.title)
            )
        })
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <h1>{title}</h1>
{nav}{figures}{nav}</body>
</html>"#,
        title = escape_html(&chapter.title),
    );

    Ok(Html(html))
}

/// Redirect to the next chapter.
pub async fn next_chapter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    let neighbor = state
        .with_catalog(move |catalog| catalog.next_item(&name))
        .await?;
    Ok(navigate(neighbor))
}

/// Redirect to the previous chapter.
pub async fn prev_chapter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    let neighbor = state
        .with_catalog(move |catalog| catalog.previous_item(&name))
        .await?;
    Ok(navigate(neighbor))
}

fn navigate(neighbor: Neighbor) -> Response {
    match neighbor {
        Neighbor::Item(target) => Redirect::to(&chapter_url(&target)).into_response(),
        Neighbor::EndOfCatalog => (StatusCode::OK, NO_MORE_CHAPTERS).into_response(),
    }
}

// ============================================================================
// IMAGES
// ============================================================================

/// Raw page image.
pub async fn image(
    State(state): State<AppState>,
    Path((name, page)): Path<(String, String)>,
) -> Result<Response<Body>> {
    let page = state
        .with_catalog(move |catalog| catalog.get_page(&name, &page))
        .await?;
    let content_type = page.mime_type();

    let response = match page.content {
        PageContent::Memory(data) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, data.len())
            .header(header::CACHE_CONTROL, "public, max-age=86400")
            .body(Body::from(Bytes::from_owner(data))),
        PageContent::File(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| AppError::from_io(&path, e))?;
            let size = file.metadata().await?.len();

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, size)
                .header(header::CACHE_CONTROL, "public, max-age=86400")
                .body(Body::from_stream(ReaderStream::new(file)))
        }
    };

    response.map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

// ============================================================================
// API
// ============================================================================

/// Chapter list (JSON).
pub async fn api_chapters(State(state): State<AppState>) -> Result<Json<Vec<ChapterLinkJson>>> {
    Ok(Json(load_chapter_list(&state).await?))
}

/// Chapter pages and navigation links (JSON).
pub async fn api_chapter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ChapterJson>> {
    Ok(Json(load_chapter(&state, name).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_encoded() {
        assert_eq!(chapter_link("Vol 1"), "chapters/Vol%201");
        assert_eq!(chapter_url("a#b"), "/chapters/a%23b");
        assert_eq!(
            image_url("Ch 1.cbz", "nested/p 1.png"),
            "/images/Ch%201.cbz/nested/p%201.png"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
