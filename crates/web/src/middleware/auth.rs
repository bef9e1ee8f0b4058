use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::roles::{Permission, Role};
use crate::error::WebError;

/// API keys and the role each one grants
#[derive(Clone, Default)]
pub struct ApiKeys {
    keys: Arc<HashMap<String, Role>>,
}

impl ApiKeys {
    /// Parses `role:key` pairs separated by commas. Malformed pairs are
    /// skipped with a warning.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let mut keys = HashMap::new();

        for entry in keys_str.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let Some((role, key)) = entry.split_once(':') else {
                tracing::warn!("Ignoring API key entry without a role");
                continue;
            };
            match role.parse::<Role>() {
                Ok(role) if !key.trim().is_empty() => {
                    keys.insert(key.trim().to_string(), role);
                }
                Ok(_) => tracing::warn!("Ignoring empty API key for role {}", role),
                Err(e) => tracing::warn!("Ignoring API key entry: {}", e),
            }
        }

        Self {
            keys: Arc::new(keys),
        }
    }

    pub fn role_for(&self, key: &str) -> Option<Role> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// State for the auth layer of one group of routes
#[derive(Clone)]
pub struct AuthState {
    pub keys: ApiKeys,
    pub permission: Permission,
}

impl AuthState {
    pub fn new(keys: ApiKeys, permission: Permission) -> Self {
        Self { keys, permission }
    }
}

pub async fn require_auth(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(role) = token.and_then(|token| auth.keys.role_for(token)) else {
        tracing::warn!("Invalid API key attempt");
        return Err(WebError::Unauthorized);
    };

    if !role.allows(auth.permission) {
        tracing::warn!(%role, permission = ?auth.permission, "Role not allowed");
        return Err(WebError::Forbidden);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_key_pairs() {
        let keys = ApiKeys::from_comma_separated("manager:abc, registration:def ,start_finish:ghi");

        assert_eq!(keys.len(), 3);
        assert_eq!(keys.role_for("abc"), Some(Role::Manager));
        assert_eq!(keys.role_for("def"), Some(Role::Registration));
        assert_eq!(keys.role_for("ghi"), Some(Role::StartFinish));
        assert_eq!(keys.role_for("nope"), None);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let keys = ApiKeys::from_comma_separated("justakey,timer:abc,manager:,,manager:ok");

        assert_eq!(keys.len(), 1);
        assert_eq!(keys.role_for("ok"), Some(Role::Manager));
    }

    #[test]
    fn test_empty_config_has_no_keys() {
        assert!(ApiKeys::from_comma_separated("").is_empty());
    }
}
