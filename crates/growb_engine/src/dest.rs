use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::types::OutputFormat;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathDerivationError {
    /// The root URL is not a prefix of the page URL: the crawl was redirected
    /// off the expected site. Fatal for the run.
    #[error("{url} is outside the wiki root {root}")]
    OutsideRoot { root: String, url: String },
    /// Nothing left after the root prefix to name a file after (a link to
    /// the instance root itself).
    #[error("{url} leaves no path remainder to derive a filename from")]
    EmptyRemainder { url: String },
}

/// Relative destination of one exported page: nested directory segments plus
/// the final filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPath {
    pub directory_segments: Vec<String>,
    pub filename: String,
}

impl DestinationPath {
    /// The segments and filename joined into one relative path.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in &self.directory_segments {
            path.push(segment);
        }
        path.push(&self.filename);
        path
    }
}

/// Map a fetched page's URL back to a destination file relative to the
/// backup base directory.
///
/// Pure and deterministic. The query string and fragment are ignored, so two
/// pages whose URLs differ only there collide onto the same file; this
/// mirrors the URL scheme of a GROWI instance, where the path alone
/// identifies a page.
pub fn derive_destination(
    root_url: &Url,
    resolved_url: &Url,
    format: OutputFormat,
) -> Result<DestinationPath, PathDerivationError> {
    let mut stripped = resolved_url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);

    let root = root_url.as_str().trim_end_matches('/');
    let suffix = stripped
        .as_str()
        .strip_prefix(root)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .ok_or_else(|| PathDerivationError::OutsideRoot {
            root: root.to_string(),
            url: stripped.to_string(),
        })?;

    let remainder = suffix.trim_matches('/');
    if remainder.is_empty() {
        return Err(PathDerivationError::EmptyRemainder {
            url: stripped.to_string(),
        });
    }

    let mut directory_segments: Vec<String> = remainder.split('/').map(str::to_string).collect();
    let Some(base) = directory_segments.pop() else {
        return Err(PathDerivationError::EmptyRemainder {
            url: stripped.to_string(),
        });
    };

    Ok(DestinationPath {
        directory_segments,
        filename: format!("{base}.{}", format.file_extension()),
    })
}

#[cfg(test)]
mod tests {
    use super::{derive_destination, DestinationPath, PathDerivationError};
    use crate::types::OutputFormat;
    use url::Url;

    fn root() -> Url {
        Url::parse("https://wiki.example.com").unwrap()
    }

    #[test]
    fn nested_page_splits_into_segments_and_filename() {
        let resolved = Url::parse("https://wiki.example.com/team/projects/alpha").unwrap();
        let dest = derive_destination(&root(), &resolved, OutputFormat::Text).unwrap();
        assert_eq!(
            dest,
            DestinationPath {
                directory_segments: vec!["team".to_string(), "projects".to_string()],
                filename: "alpha.txt".to_string(),
            }
        );
    }

    #[test]
    fn single_segment_page_has_no_directories() {
        let resolved = Url::parse("https://wiki.example.com/home").unwrap();
        let dest = derive_destination(&root(), &resolved, OutputFormat::Markup).unwrap();
        assert!(dest.directory_segments.is_empty());
        assert_eq!(dest.filename, "home.md");
    }

    #[test]
    fn derivation_is_deterministic() {
        let resolved = Url::parse("https://wiki.example.com/a/b/c").unwrap();
        let first = derive_destination(&root(), &resolved, OutputFormat::Text).unwrap();
        let second = derive_destination(&root(), &resolved, OutputFormat::Text).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        let plain = Url::parse("https://wiki.example.com/home").unwrap();
        let noisy = Url::parse("https://wiki.example.com/home?rev=3#section").unwrap();
        assert_eq!(
            derive_destination(&root(), &plain, OutputFormat::Text).unwrap(),
            derive_destination(&root(), &noisy, OutputFormat::Text).unwrap()
        );
    }

    #[test]
    fn url_outside_root_is_rejected() {
        let external = Url::parse("https://elsewhere.example.com/home").unwrap();
        let err = derive_destination(&root(), &external, OutputFormat::Text).unwrap_err();
        assert!(matches!(err, PathDerivationError::OutsideRoot { .. }));

        // A host that merely starts with the root's text is still outside it.
        let lookalike = Url::parse("https://wiki.example.com.evil.example/home").unwrap();
        let err = derive_destination(&root(), &lookalike, OutputFormat::Text).unwrap_err();
        assert!(matches!(err, PathDerivationError::OutsideRoot { .. }));
    }

    #[test]
    fn root_itself_has_no_derivable_filename() {
        let err = derive_destination(&root(), &root(), OutputFormat::Text).unwrap_err();
        assert!(matches!(err, PathDerivationError::EmptyRemainder { .. }));
    }

    #[test]
    fn relative_path_joins_segments() {
        let dest = DestinationPath {
            directory_segments: vec!["team".to_string(), "projects".to_string()],
            filename: "alpha.txt".to_string(),
        };
        assert_eq!(
            dest.relative_path(),
            std::path::Path::new("team").join("projects").join("alpha.txt")
        );
    }
}
