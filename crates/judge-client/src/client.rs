//! HTTP transport and authentication

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, COOKIE};
use serde_json::Value;

use crate::auth::Credentials;
use crate::response::decode;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("judge-sync/", env!("CARGO_PKG_VERSION"));

/// Problem uploads can take a while on large archives.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Multipart field that carries the problem archive
const ARCHIVE_FIELD: &str = "problem_contents";

#[derive(Debug, Clone)]
enum Session {
    ApiToken(String),
    /// `ouat` cookie obtained from `user/login`
    AuthToken(String),
}

/// Blocking client for one judge instance.
#[derive(Debug, Clone)]
pub struct OmegaUpClient {
    http: Client,
    base_url: String,
    session: Session,
    username: Option<String>,
}

impl OmegaUpClient {
    /// Build a client for `base_url`, logging in when given a password.
    ///
    /// # Errors
    ///
    /// [`Error::Login`] when the judge rejects the username or password,
    /// [`Error::Http`] when it cannot be reached.
    pub fn connect(base_url: &str, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let (session, username) = match credentials {
            Credentials::Token(token) => (Session::ApiToken(token), None),
            Credentials::Password { username, password } => {
                let token = login(&http, &base_url, &username, &password)?;
                tracing::info!(user = %username, "Logged in");
                (Session::AuthToken(token), Some(username))
            }
        };

        Ok(Self {
            http,
            base_url,
            session,
            username,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Username of the account the client acts as.
    ///
    /// Known after a password login; for token sessions it is looked up
    /// through `user/profile`.
    pub fn acting_user(&self) -> Result<String> {
        if let Some(username) = &self.username {
            return Ok(username.clone());
        }
        let profile = self.query("user/profile", &[])?;
        profile
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Decode {
                endpoint: "user/profile".to_string(),
                message: "missing `username`".to_string(),
            })
    }

    pub(crate) fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}/", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session {
            Session::ApiToken(token) => request.header(AUTHORIZATION, format!("token {token}")),
            Session::AuthToken(token) => request.header(COOKIE, format!("ouat={token}")),
        }
    }

    /// POST form-encoded `params` to `api/<endpoint>/`.
    pub(crate) fn query(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        tracing::debug!(endpoint = %endpoint, "API call");
        let response = self
            .authorize(self.http.post(self.endpoint_url(endpoint)))
            .form(params)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode(endpoint, status, &body)
    }

    /// POST `fields` plus the problem archive as multipart form data.
    pub(crate) fn query_with_archive(
        &self,
        endpoint: &str,
        fields: Vec<(&'static str, String)>,
        archive: &[u8],
    ) -> Result<Value> {
        tracing::debug!(endpoint = %endpoint, bytes = archive.len(), "API upload");
        let part = Part::bytes(archive.to_vec())
            .file_name("problem.zip")
            .mime_str("application/zip")?;
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part(ARCHIVE_FIELD, part);

        let response = self
            .authorize(self.http.post(self.endpoint_url(endpoint)))
            .multipart(form)
            .send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        decode(endpoint, status, &body)
    }

    /// GET a binary resource under `api/`.
    pub(crate) fn download(&self, endpoint: &str) -> Result<Vec<u8>> {
        tracing::debug!(endpoint = %endpoint, "API download");
        let response = self
            .authorize(self.http.get(self.endpoint_url(endpoint)))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(decode(endpoint, status.as_u16(), &body)
                .err()
                .unwrap_or_else(|| Error::Api {
                    endpoint: endpoint.to_string(),
                    name: status.as_u16().to_string(),
                    message: body,
                    http_status: status.as_u16(),
                }));
        }
        Ok(response.bytes()?.to_vec())
    }
}

fn login(http: &Client, base_url: &str, username: &str, password: &str) -> Result<String> {
    let endpoint = "user/login";
    let response = http
        .post(format!("{base_url}/api/{endpoint}/"))
        .form(&[("usernameOrEmail", username), ("password", password)])
        .send()?;
    let status = response.status().as_u16();
    let body = response.text()?;

    let login_failed = |message: String| Error::Login {
        username: username.to_string(),
        message,
    };
    let value = decode(endpoint, status, &body).map_err(|e| login_failed(e.to_string()))?;
    value
        .get("auth_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| login_failed("response has no auth_token".to_string()))
}
