//! Model call error types.

use std::time::Duration;

use crate::core::config::API_KEY_VAR;

/// Errors from a single model call. The conversion pipeline recovers from all
/// of them by falling back to the regex rewriter.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    ApiAuth(String),
    #[error("API error: {0}")]
    ApiMessage(String),
    #[error("Model call timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Model returned an empty response")]
    EmptyResponse,
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Map async-openai or API errors into ChatError.
pub fn map_api_error<E>(e: E) -> ChatError
where
    E: std::fmt::Display + Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    let s = e.to_string();
    if s.contains("401")
        || s.contains("403")
        || s.contains("API key not valid")
        || s.contains("API_KEY_INVALID")
    {
        return ChatError::ApiAuth(format!(
            "API error (auth): the key was rejected. Check {} in .env or run `config set-api-key`.",
            API_KEY_VAR
        ));
    }
    if s.contains("\"error\"")
        && let Some(msg) = json_message(&s)
    {
        return ChatError::ApiMessage(msg);
    }
    ChatError::Other(e.into())
}

/// Pull the first `"message": "..."` value out of an error body.
fn json_message(s: &str) -> Option<String> {
    let (_, rest) = s.split_once("\"message\"")?;
    let rest = rest.trim_start().strip_prefix(':')?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let (msg, _) = rest.split_once('"')?;
    Some(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_api_error_invalid_key() {
        let e = std::io::Error::other(
            r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key."}}"#,
        );
        let err = map_api_error(e);
        match &err {
            ChatError::ApiAuth(msg) => assert!(msg.contains("GOOGLE_API_KEY")),
            _ => panic!("expected ApiAuth, got {:?}", err),
        }
    }

    #[test]
    fn map_api_error_json_message() {
        let e = std::io::Error::other(r#"{"error": {"message": "Resource has been exhausted"}}"#);
        let err = map_api_error(e);
        match &err {
            ChatError::ApiMessage(msg) => assert_eq!(msg, "Resource has been exhausted"),
            _ => panic!("expected ApiMessage, got {:?}", err),
        }
    }

    #[test]
    fn map_api_error_generic() {
        let e = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = map_api_error(e);
        match &err {
            ChatError::Other(_) => {}
            _ => panic!("expected Other, got {:?}", err),
        }
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn timeout_message_names_seconds() {
        let err = ChatError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Model call timed out after 30s");
    }
}
