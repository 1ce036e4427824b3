use thiserror::Error;

/// Missing local input. Raised before any network call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a city.")]
    MissingCity,

    #[error("Please fill both name and city.")]
    MissingNameOrCity,
}

/// A remote call that did not produce a usable result.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never got a response (connection refused, DNS, timeout...).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` comes from the error body when there is one.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be decoded.
    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Unsupported(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_its_message() {
        let err = RequestError::Status { status: 404, message: "city not found".into() };
        assert_eq!(err.to_string(), "city not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
