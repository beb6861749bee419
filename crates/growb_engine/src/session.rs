use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use crate::creds::Credentials;

const DEFAULT_USER_AGENT: &str = "growb/0.1";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Site-shape constants for a GROWI instance plus transport settings.
///
/// The defaults match the stock GROWI login form and page layout; deployments
/// with customized themes can override the selectors.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Path of the login endpoint the login form submits to.
    pub login_path: String,
    /// Name of the username input in the login form.
    pub username_field: String,
    /// Name of the password input in the login form.
    pub password_field: String,
    /// CSS selector of the container GROWI renders login errors into.
    pub login_error_selector: String,
    /// Text the dashboard is recognized by after login.
    pub dashboard_marker: String,
    /// CSS selector of the container holding a wiki page's body content.
    pub content_selector: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            username_field: "loginForm[username]".to_string(),
            password_field: "loginForm[password]".to_string(),
            login_error_selector: ".login-form-errors".to_string(),
            dashboard_marker: "Welcome to GROWI".to_string(),
            content_selector: "#revision-body".to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SessionSettings {
    /// Default settings with the transport knobs overridable from the
    /// environment: `GROWB_HTTP_TIMEOUT_MS` and `GROWB_USER_AGENT`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(ms) = env::var("GROWB_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
        {
            settings.request_timeout = Duration::from_millis(ms);
        }
        if let Ok(agent) = env::var("GROWB_USER_AGENT") {
            if !agent.trim().is_empty() {
                settings.user_agent = agent;
            }
        }
        settings
    }
}

/// Fatal session failures: transport errors and structural site-shape
/// mismatches. Per-page skips are modeled separately in [`crate::PageError`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http status {status} fetching {url}")]
    HttpStatus { status: u16, url: Url },
    #[error("no login form submitting to {login_path} found at {url}")]
    LoginFormNotFound { login_path: String, url: Url },
    #[error("invalid css selector in settings: {0}")]
    InvalidSelector(String),
}

/// Result of a login attempt that the site itself answered.
///
/// `Rejected` means the credentials were refused; the caller may re-prompt
/// and try again, unlike the structural failures carried by `SessionError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Rejected,
}

/// A parsed page together with the URL the server actually served it from.
/// Every navigation returns one of these; the session keeps no hidden
/// "current page" state.
pub struct FetchedDocument {
    pub final_url: Url,
    pub document: Html,
}

/// One browsing session against a GROWI instance.
///
/// Owns the cookie-keeping HTTP client. `authenticated` latches true on a
/// verified login and never reverts within a run; a later failed request is
/// reported as its own error, not as de-authentication.
pub struct WikiSession {
    root_url: Url,
    client: Client,
    settings: SessionSettings,
    authenticated: bool,
}

impl WikiSession {
    pub fn connect(root_url: &str, settings: SessionSettings) -> Result<Self, SessionError> {
        let root_url = Url::parse(root_url)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self {
            root_url,
            client,
            settings,
            authenticated: false,
        })
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// GET `url` within this session and parse the response body.
    pub fn navigate(&self, url: Url) -> Result<FetchedDocument, SessionError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send()?;
        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(SessionError::HttpStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }
        let body = response.text()?;
        Ok(FetchedDocument {
            final_url,
            document: Html::parse_document(&body),
        })
    }

    /// Log in through the wiki's login form.
    ///
    /// Opens the root URL, fills the form that submits to the login endpoint
    /// (carrying along any hidden fields such as the CSRF token) and posts
    /// it. The response is checked for GROWI's login-error container: a
    /// non-empty container means the credentials were rejected.
    pub fn authenticate(&mut self, creds: &Credentials) -> Result<LoginOutcome, SessionError> {
        let login_page = self.navigate(self.root_url.clone())?;
        let (action, mut fields) = find_login_form(&login_page, &self.settings)?;
        for (name, value) in fields.iter_mut() {
            if *name == self.settings.username_field {
                *value = creds.username().to_string();
            } else if *name == self.settings.password_field {
                *value = creds.password().to_string();
            }
        }

        let submit_url = self.root_url.join(&action)?;
        log::debug!("POST {submit_url}");
        let response = self.client.post(submit_url).form(&fields).send()?;
        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(SessionError::HttpStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }
        let document = Html::parse_document(&response.text()?);

        let error_selector = parse_selector(&self.settings.login_error_selector)?;
        let rejected = document
            .select(&error_selector)
            .next()
            .map(|container| {
                let has_child_elements = container
                    .children()
                    .any(|child| child.value().is_element());
                let text = container.text().collect::<String>();
                has_child_elements || !text.trim().is_empty()
            })
            .unwrap_or(false);

        if rejected {
            log::warn!("login rejected for user {}", creds.username());
            return Ok(LoginOutcome::Rejected);
        }

        self.authenticated = true;
        log::info!("logged in to {} as {}", self.root_url, creds.username());
        Ok(LoginOutcome::Success)
    }
}

type FormFields = Vec<(String, String)>;

/// Locate the form submitting to the login endpoint and collect its named
/// inputs. The form not existing, or existing without the credential
/// fields, is a structural failure.
fn find_login_form(
    page: &FetchedDocument,
    settings: &SessionSettings,
) -> Result<(String, FormFields), SessionError> {
    let form_selector = parse_selector("form[action]")?;
    let input_selector = parse_selector("input[name]")?;

    for form in page.document.select(&form_selector) {
        let Some(action) = form.value().attr("action") else {
            continue;
        };
        if action != settings.login_path {
            continue;
        }

        let mut fields = FormFields::new();
        let mut saw_username = false;
        let mut saw_password = false;
        for input in form.select(&input_selector) {
            let Some(name) = input.value().attr("name") else {
                continue;
            };
            let value = input.value().attr("value").unwrap_or_default();
            if name == settings.username_field {
                saw_username = true;
            }
            if name == settings.password_field {
                saw_password = true;
            }
            fields.push((name.to_string(), value.to_string()));
        }

        if saw_username && saw_password {
            return Ok((action.to_string(), fields));
        }
    }

    Err(SessionError::LoginFormNotFound {
        login_path: settings.login_path.clone(),
        url: page.final_url.clone(),
    })
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector, SessionError> {
    Selector::parse(css).map_err(|err| SessionError::InvalidSelector(err.to_string()))
}
