use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::repositories::session_tokens::SessionTokenRepository;
use crate::domain::value_objects::cache_keys::CacheKey;
use crate::domain::value_objects::iam::AuthenticatedUser;

/// Sessions die this many days after issuance, no matter what.
const MAX_SESSION_AGE_DAYS: i64 = 14;
/// Cached identities never outlive this, so a stale identity is bounded
/// even when the session itself has most of its lifetime left.
const CACHE_TTL_CAP_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

impl AuthError {
    pub fn business_code(&self) -> u16 {
        match self {
            AuthError::MissingToken => 1021,
            AuthError::InvalidToken => 1022,
            AuthError::Expired => 1023,
            AuthError::Transient(_) => 1500,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::Expired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Cache-aside token-to-identity resolver in front of the durable session
/// store.
///
/// A cache hit is trusted as-is: revoking or re-issuing a session does not
/// evict the cached identity, which stays authoritative until its TTL
/// lapses. That availability-over-freshness tradeoff is intentional.
pub struct TokenAuthUseCase<S, K>
where
    S: SessionTokenRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    session_repo: Arc<S>,
    kv: Arc<K>,
}

impl<S, K> TokenAuthUseCase<S, K>
where
    S: SessionTokenRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    pub fn new(session_repo: Arc<S>, kv: Arc<K>) -> Self {
        Self { session_repo, kv }
    }

    /// Resolve `token` to an identity and the cache key it lives under.
    pub async fn authenticate(
        &self,
        token: Option<&str>,
    ) -> Result<(AuthenticatedUser, String), AuthError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => {
                warn!("token_auth: no token supplied");
                return Err(AuthError::MissingToken);
            }
        };

        let cache_key = CacheKey::token_cache(token);
        if let Some(cached) = self.kv.get(cache_key.as_str()).await? {
            let user: AuthenticatedUser =
                serde_json::from_str(&cached).map_err(anyhow::Error::from)?;
            debug!(account_id = user.id, "token_auth: cache hit");
            return Ok((user, cache_key.into_string()));
        }

        let (session, account) = self
            .session_repo
            .find_by_token(token.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "token_auth: failed to load session");
                AuthError::Transient(err)
            })?
            .ok_or_else(|| {
                warn!("token_auth: unknown token");
                AuthError::InvalidToken
            })?;

        let age = Utc::now() - session.created_at;
        let max_age = chrono::Duration::days(MAX_SESSION_AGE_DAYS);
        if age > max_age {
            warn!(
                account_id = account.id,
                age_days = age.num_days(),
                "token_auth: session past max age"
            );
            return Err(AuthError::Expired);
        }

        let user = AuthenticatedUser {
            id: account.id,
            username: account.username,
        };
        let ttl = (max_age - age).min(chrono::Duration::days(CACHE_TTL_CAP_DAYS));
        let ttl = Duration::from_secs(ttl.num_seconds().max(0) as u64);
        let payload = serde_json::to_string(&user).map_err(anyhow::Error::from)?;
        self.kv
            .set_with_ttl(cache_key.as_str(), payload, ttl)
            .await?;

        info!(
            account_id = user.id,
            ttl_secs = ttl.as_secs(),
            "token_auth: identity cached"
        );
        Ok((user, cache_key.into_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    use crate::domain::entities::accounts::AccountEntity;
    use crate::domain::entities::session_tokens::SessionTokenEntity;
    use crate::domain::repositories::kv_store::MockKeyValueStore;
    use crate::domain::repositories::session_tokens::MockSessionTokenRepository;
    use crate::infrastructure::kv::memory::InMemoryKv;

    fn session_row(created_at: DateTime<Utc>) -> (SessionTokenEntity, AccountEntity) {
        (
            SessionTokenEntity {
                id: 1,
                account_id: 5,
                token: "tok".to_string(),
                created_at,
            },
            AccountEntity {
                id: 5,
                username: "alice".to_string(),
                password_hash: "irrelevant".to_string(),
                created_at,
            },
        )
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_any_lookup() {
        let usecase = TokenAuthUseCase::new(
            Arc::new(MockSessionTokenRepository::new()),
            Arc::new(InMemoryKv::new()),
        );

        assert!(matches!(
            usecase.authenticate(None).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            usecase.authenticate(Some("")).await,
            Err(AuthError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn unknown_token_fails_invalid() {
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo
            .expect_find_by_token()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = TokenAuthUseCase::new(Arc::new(session_repo), Arc::new(InMemoryKv::new()));

        assert!(matches!(
            usecase.authenticate(Some("nope")).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn session_past_fourteen_days_fails_expired() {
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo.expect_find_by_token().returning(|_| {
            Box::pin(async { Ok(Some(session_row(Utc::now() - chrono::Duration::days(20)))) })
        });

        let usecase = TokenAuthUseCase::new(Arc::new(session_repo), Arc::new(InMemoryKv::new()));

        assert!(matches!(
            usecase.authenticate(Some("tok")).await,
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn fresh_session_caches_with_ttl_capped_at_seven_days() {
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo.expect_find_by_token().returning(|_| {
            // 1 day old: 13 days of session left, but the cache cap wins.
            Box::pin(async { Ok(Some(session_row(Utc::now() - chrono::Duration::days(1)))) })
        });

        let mut kv = MockKeyValueStore::new();
        kv.expect_get()
            .returning(|_| Box::pin(async { Ok(None) }));
        kv.expect_set_with_ttl()
            .withf(|key, _, ttl| {
                let seven_days = Duration::from_secs(7 * 24 * 3600);
                key == "token_tok" && *ttl <= seven_days && *ttl > seven_days - Duration::from_secs(5)
            })
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let usecase = TokenAuthUseCase::new(Arc::new(session_repo), Arc::new(kv));
        let (user, cache_key) = usecase.authenticate(Some("tok")).await.unwrap();

        assert_eq!(user.id, 5);
        assert_eq!(cache_key, "token_tok");
    }

    #[tokio::test]
    async fn nearly_expired_session_caches_with_remaining_validity() {
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo.expect_find_by_token().returning(|_| {
            // 13 days old: only 1 day of validity left, TTL must not exceed it.
            Box::pin(async { Ok(Some(session_row(Utc::now() - chrono::Duration::days(13)))) })
        });

        let mut kv = MockKeyValueStore::new();
        kv.expect_get()
            .returning(|_| Box::pin(async { Ok(None) }));
        kv.expect_set_with_ttl()
            .withf(|_, _, ttl| *ttl <= Duration::from_secs(24 * 3600))
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let usecase = TokenAuthUseCase::new(Arc::new(session_repo), Arc::new(kv));
        usecase.authenticate(Some("tok")).await.unwrap();
    }

    #[tokio::test]
    async fn cache_hit_skips_the_durable_store() {
        let kv = Arc::new(InMemoryKv::new());
        let user = AuthenticatedUser {
            id: 5,
            username: "alice".to_string(),
        };
        kv.set_with_ttl(
            "token_tok",
            serde_json::to_string(&user).unwrap(),
            Duration::from_secs(60),
        )
        .await
        .unwrap();

        // No expectations: any call to the session repo panics the test.
        let usecase = TokenAuthUseCase::new(Arc::new(MockSessionTokenRepository::new()), kv);
        let (resolved, cache_key) = usecase.authenticate(Some("tok")).await.unwrap();

        assert_eq!(resolved, user);
        assert_eq!(cache_key, "token_tok");
    }
}
