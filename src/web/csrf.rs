use tower_sessions::Session;

use crate::error::PhotostyleError;

const CSRF_TOKEN_KEY: &str = "csrf_token";

fn generate_token() -> String {
    format!("{:032x}", rand::random::<u128>())
}

/// Returns the session's token, creating one on first use.
pub(crate) async fn csrf_token(session: &Session) -> Result<String, PhotostyleError> {
    if let Some(existing) = session.get::<String>(CSRF_TOKEN_KEY).await? {
        return Ok(existing);
    }
    let token = generate_token();
    session.insert(CSRF_TOKEN_KEY, token.clone()).await?;
    Ok(token)
}

pub(crate) async fn validate_csrf(session: &Session, token: &str) -> Result<(), PhotostyleError> {
    match session.get::<String>(CSRF_TOKEN_KEY).await? {
        Some(expected) if !token.is_empty() && expected == token => Ok(()),
        _ => Err(PhotostyleError::Unauthorized),
    }
}
