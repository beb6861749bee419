use thiserror::Error;
use url::Url;

use crate::session::{parse_selector, SessionError, WikiSession};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("session is not authenticated; log in before enumerating links")]
    NotAuthenticated,
    #[error("page at {url} does not look like the dashboard (marker {marker:?} missing)")]
    UnexpectedPage { url: Url, marker: String },
    #[error("no link table found on the dashboard at {url}")]
    LinkTableMissing { url: Url },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Single-pass sequence of page links, in dashboard document order.
///
/// Not restartable: the whole sequence is consumed by one run of the export
/// pipeline, each link exactly once.
#[derive(Debug)]
pub struct PageLinks {
    inner: std::vec::IntoIter<String>,
}

impl Iterator for PageLinks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for PageLinks {}

/// Collect the wiki page links listed on the dashboard.
///
/// The dashboard is the root URL's landing page after login. It is verified
/// by its marker text, and its first table is taken as the canonical,
/// already-deduplicated index of all wiki pages; every anchor inside that
/// table contributes one link.
pub fn enumerate_links(session: &WikiSession) -> Result<PageLinks, DashboardError> {
    if !session.is_authenticated() {
        return Err(DashboardError::NotAuthenticated);
    }

    let dashboard = session.navigate(session.root_url().clone())?;
    let marker = &session.settings().dashboard_marker;
    let rendered = dashboard.document.root_element().text().collect::<String>();
    if !rendered.contains(marker.as_str()) {
        return Err(DashboardError::UnexpectedPage {
            url: dashboard.final_url,
            marker: marker.clone(),
        });
    }

    let table_selector = parse_selector("table")?;
    let anchor_selector = parse_selector("a[href]")?;
    let Some(table) = dashboard.document.select(&table_selector).next() else {
        return Err(DashboardError::LinkTableMissing {
            url: dashboard.final_url,
        });
    };

    let links: Vec<String> = table
        .select(&anchor_selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect();
    log::info!("dashboard lists {} pages", links.len());

    Ok(PageLinks {
        inner: links.into_iter(),
    })
}
