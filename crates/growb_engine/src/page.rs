use thiserror::Error;
use url::Url;

use crate::session::{parse_selector, SessionError, WikiSession};
use crate::types::{ExtractedPage, OutputFormat};

/// Per-link failure. Handled as a skip at the pipeline boundary, never as a
/// run abort: a link may point at a non-wiki page or a page that has gone
/// away since the dashboard was rendered.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("link {link:?} does not resolve against the wiki root: {source}")]
    BadLink {
        link: String,
        source: url::ParseError,
    },
    #[error("no content container on {url}")]
    ContentNotFound { url: Url },
    #[error(transparent)]
    Fetch(#[from] SessionError),
}

/// Fetch one wiki page and pull its content out of the body container.
///
/// `link` is resolved against the session's root URL; the page is then
/// retrieved within the session and the configured content container
/// extracted as either raw inner markup or rendered plain text.
pub fn fetch_and_extract(
    session: &WikiSession,
    link: &str,
    format: OutputFormat,
) -> Result<ExtractedPage, PageError> {
    let url = session
        .root_url()
        .join(link)
        .map_err(|source| PageError::BadLink {
            link: link.to_string(),
            source,
        })?;
    let page = session.navigate(url)?;

    let content_selector = parse_selector(&session.settings().content_selector)?;
    let Some(container) = page.document.select(&content_selector).next() else {
        return Err(PageError::ContentNotFound {
            url: page.final_url,
        });
    };

    let content = match format {
        OutputFormat::Markup => container.inner_html(),
        OutputFormat::Text => normalize_text(container.text()),
    };
    log::debug!("extracted {} bytes from {}", content.len(), page.final_url);

    Ok(ExtractedPage {
        resolved_url: page.final_url,
        content,
        format,
    })
}

/// Collapse whitespace runs the way a rendered-text extraction does: a run
/// containing a newline becomes one newline, any other run one space.
/// Leading and trailing whitespace is dropped.
fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut in_run = false;
    let mut run_has_newline = false;
    for part in parts {
        for ch in part.chars() {
            if ch.is_whitespace() {
                in_run = true;
                if ch == '\n' {
                    run_has_newline = true;
                }
            } else {
                if in_run && !out.is_empty() {
                    out.push(if run_has_newline { '\n' } else { ' ' });
                }
                in_run = false;
                run_has_newline = false;
                out.push(ch);
            }
        }
    }
    out
}
