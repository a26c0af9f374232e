mod error;

pub(crate) use error::{ApiError, ApiResult, Operation};

use crate::models::{DeletedNote, NewNote, Note, NotesPage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "https://notehub-public.goit.study/api";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl EnvConfig {
    /// Runtime config from `window.ENV`, then build-time env vars, then defaults.
    pub fn new() -> Self {
        let api_url = window_env(&["API_URL", "api_url"])
            .or_else(|| option_env!("NOTEHUB_API_URL").map(str::to_string));
        let token = window_env(&["NOTEHUB_TOKEN", "token"])
            .or_else(|| option_env!("NOTEHUB_TOKEN").map(str::to_string));
        Self::resolve(api_url, token)
    }

    pub(crate) fn resolve(api_url: Option<String>, token: Option<String>) -> Self {
        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self { api_url, token }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn window_env(keys: &[&str]) -> Option<String> {
    let env = web_sys::window()?.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn window_env(_keys: &[&str]) -> Option<String> {
    None
}

/// The remote record store, seen as three single-round-trip calls.
///
/// Implementations never retry and never touch client-side caches.
#[async_trait(?Send)]
pub(crate) trait NoteStore {
    async fn list(&self, page: u32, per_page: u32, search: &str) -> ApiResult<NotesPage>;
    async fn create(&self, note: &NewNote) -> ApiResult<Note>;
    async fn delete(&self, id: &str) -> ApiResult<DeletedNote>;
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListNotesParams<'a> {
    pub page: u32,
    pub per_page: u32,
    // An empty filter is omitted, never sent as `search=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<&'a str>,
}

impl<'a> ListNotesParams<'a> {
    pub fn new(page: u32, per_page: u32, search: &'a str) -> Self {
        Self {
            page,
            per_page,
            search: (!search.is_empty()).then_some(search),
        }
    }
}

// NoteHub has answered creates and deletes with different shapes; accept the known ones.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreateNoteResponse {
    Wrapped { note: Note },
    Bare(Note),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeleteNoteResponse {
    Wrapped {
        note: Note,
    },
    Bare(Note),
    Ack {
        #[serde(rename = "noteId")]
        note_id: String,
    },
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        let mut client = Self::new(config.api_url.clone());
        client.token = config.token.clone();
        client
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        auth_header: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(header) = auth_header {
            req = req.header("Authorization", header);
        }
        req
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the success body, or the mapped error.
    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        op: Operation,
        target: &str,
    ) -> ApiResult<String> {
        let res = Self::with_auth_headers(req, self.get_auth_header())
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        let body = res.text().await.map_err(ApiError::network)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_status(op, status.as_u16(), &body, target))
        }
    }

    pub async fn list_notes(&self, page: u32, per_page: u32, search: &str) -> ApiResult<NotesPage> {
        let req = self
            .http
            .get(self.url("/notes"))
            .query(&ListNotesParams::new(page, per_page, search));
        let body = self.send(req, Operation::List, "").await?;
        serde_json::from_str(&body).map_err(ApiError::parse)
    }

    pub async fn create_note(&self, note: &NewNote) -> ApiResult<Note> {
        let req = self.http.post(self.url("/notes")).json(note);
        let body = self.send(req, Operation::Create, "").await?;
        match serde_json::from_str(&body).map_err(ApiError::parse)? {
            CreateNoteResponse::Wrapped { note } | CreateNoteResponse::Bare(note) => Ok(note),
        }
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<DeletedNote> {
        let path = format!("/notes/{}", urlencoding::encode(id));
        let req = self.http.delete(self.url(&path));
        let body = self.send(req, Operation::Delete, id).await?;

        if body.trim().is_empty() {
            return Ok(DeletedNote { id: id.to_string() });
        }

        let id = match serde_json::from_str(&body).map_err(ApiError::parse)? {
            DeleteNoteResponse::Wrapped { note } | DeleteNoteResponse::Bare(note) => note.id,
            DeleteNoteResponse::Ack { note_id } => note_id,
        };
        Ok(DeletedNote { id })
    }
}

#[async_trait(?Send)]
impl NoteStore for ApiClient {
    async fn list(&self, page: u32, per_page: u32, search: &str) -> ApiResult<NotesPage> {
        self.list_notes(page, per_page, search).await
    }

    async fn create(&self, note: &NewNote) -> ApiResult<Note> {
        self.create_note(note).await
    }

    async fn delete(&self, id: &str) -> ApiResult<DeletedNote> {
        self.delete_note(id).await
    }
}

#[cfg(test)]
pub(crate) mod testing;
