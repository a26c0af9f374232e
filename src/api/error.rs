use thiserror::Error;

/// Which remote call produced a response; status codes mean different things per call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Create,
    Delete,
}

impl Operation {
    fn context(self) -> &'static str {
        match self {
            Operation::List => "Loading notes failed",
            Operation::Create => "Creating note failed",
            Operation::Delete => "Deleting note failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ApiError {
    /// The store rejected the payload.
    #[error("{message}")]
    Validation { message: String },

    /// The target note no longer exists remotely.
    #[error("Note {id} no longer exists")]
    NotFound { id: String },

    /// Network failure, server failure, or a response we could not read.
    #[error("{message}")]
    Transport { message: String },
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::Transport {
            message: format!("Network error: {e}"),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: format!("Unexpected response from server: {e}"),
        }
    }

    /// Maps a non-success status to the error taxonomy.
    ///
    /// `target` is the note id for deletes and is ignored otherwise.
    pub(crate) fn from_status(op: Operation, status: u16, body: &str, target: &str) -> Self {
        match (op, status) {
            (Operation::Create, 400 | 422) => Self::Validation {
                message: server_message(body)
                    .unwrap_or_else(|| "The note was rejected by the server".to_string()),
            },
            (Operation::Delete, 404) => Self::NotFound {
                id: target.to_string(),
            },
            (_, 401) => Self::Transport {
                message: format!(
                    "{}: unauthorized (401). Check that NOTEHUB_TOKEN is set and valid",
                    op.context()
                ),
            },
            _ => Self::Transport {
                message: match server_message(body) {
                    Some(msg) => format!("{} ({status}): {msg}", op.context()),
                    None => format!("{} ({status})", op.context()),
                },
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Pulls a readable message out of an error body: JSON `message` first, raw text otherwise.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return Some(msg.to_string());
        }
        if let Some(msg) = v.get("error").and_then(|m| m.as_str()) {
            return Some(msg.to_string());
        }
    }

    Some(body.to_string())
}
