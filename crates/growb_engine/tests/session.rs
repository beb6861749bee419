use growb_engine::{Credentials, LoginOutcome, SessionError, SessionSettings, WikiSession};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><body>
  <form action="/login" method="post">
    <input type="hidden" name="_csrf" value="token123">
    <input type="text" name="loginForm[username]">
    <input type="password" name="loginForm[password]">
  </form>
</body></html>"#;

// The error container is present but empty: a clean login.
const LOGIN_OK: &str = r#"<html><body>
  <div class="login-form-errors"></div>
  <h1>Welcome to GROWI</h1>
</body></html>"#;

const LOGIN_REJECTED: &str = r#"<html><body>
  <div class="login-form-errors">
    <div class="alert alert-danger">Incorrect username or password</div>
  </div>
</body></html>"#;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("tokio runtime")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

#[test]
fn authenticate_submits_form_fields_and_latches_flag() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html(LOGIN_PAGE))
            .mount(&server)
            .await;
        // The POST must carry the hidden CSRF token and both credentials.
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_string_contains("_csrf=token123"))
            .and(body_string_contains("loginForm%5Busername%5D=admin"))
            .and(body_string_contains("loginForm%5Bpassword%5D=hunter2"))
            .respond_with(html(LOGIN_OK))
            .mount(&server)
            .await;
    });

    let mut session = WikiSession::connect(&server.uri(), SessionSettings::default()).unwrap();
    assert!(!session.is_authenticated());

    let creds = Credentials::new("admin", "hunter2").unwrap();
    let outcome = session.authenticate(&creds).unwrap();

    assert_eq!(outcome, LoginOutcome::Success);
    assert!(session.is_authenticated());
}

#[test]
fn rejected_login_is_an_outcome_not_an_error() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html(LOGIN_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(html(LOGIN_REJECTED))
            .mount(&server)
            .await;
    });

    let mut session = WikiSession::connect(&server.uri(), SessionSettings::default()).unwrap();
    let creds = Credentials::new("admin", "wrong").unwrap();
    let outcome = session.authenticate(&creds).unwrap();

    assert_eq!(outcome, LoginOutcome::Rejected);
    assert!(!session.is_authenticated());
}

#[test]
fn missing_login_form_is_fatal() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html("<html><body><p>No form here</p></body></html>"))
            .mount(&server)
            .await;
    });

    let mut session = WikiSession::connect(&server.uri(), SessionSettings::default()).unwrap();
    let creds = Credentials::new("admin", "hunter2").unwrap();
    let err = session.authenticate(&creds).unwrap_err();

    assert!(matches!(err, SessionError::LoginFormNotFound { .. }));
    assert!(!session.is_authenticated());
}

#[test]
fn form_without_credential_fields_is_fatal() {
    let search_form = r#"<html><body>
      <form action="/login" method="post">
        <input type="text" name="q">
      </form>
    </body></html>"#;

    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html(search_form))
            .mount(&server)
            .await;
    });

    let mut session = WikiSession::connect(&server.uri(), SessionSettings::default()).unwrap();
    let creds = Credentials::new("admin", "hunter2").unwrap();
    let err = session.authenticate(&creds).unwrap_err();

    assert!(matches!(err, SessionError::LoginFormNotFound { .. }));
}
