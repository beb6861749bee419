use url::Url;

/// Output mode for exported pages.
///
/// `Markup` preserves the raw markup held by the page's content container
/// for later rendering; `Text` is the fully de-markup'd rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markup,
}

impl OutputFormat {
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markup => "md",
        }
    }
}

/// Content pulled from one wiki page. Lives only long enough for the page
/// to be written out; never shared across links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// URL the server actually served the page from, after redirects.
    pub resolved_url: Url,
    pub content: String,
    pub format: OutputFormat,
}
