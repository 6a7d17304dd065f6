use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::session_tokens::UpsertSessionTokenEntity;
use crate::domain::repositories::accounts::AccountRepository;
use crate::domain::repositories::session_tokens::SessionTokenRepository;
use crate::domain::value_objects::iam::LoginResponseModel;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid username or password")]
    BadCredentials,
    #[error(transparent)]
    Transient(#[from] anyhow::Error),
}

impl LoginError {
    pub fn business_code(&self) -> u16 {
        match self {
            LoginError::BadCredentials => 1003,
            LoginError::Transient(_) => 1500,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            LoginError::BadCredentials => StatusCode::UNAUTHORIZED,
            LoginError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Issues opaque session tokens. One session row per account; logging in
/// again replaces the previous token and restarts the session clock.
pub struct LoginUseCase<A, S>
where
    A: AccountRepository + Send + Sync + 'static,
    S: SessionTokenRepository + Send + Sync + 'static,
{
    account_repo: Arc<A>,
    session_repo: Arc<S>,
}

impl<A, S> LoginUseCase<A, S>
where
    A: AccountRepository + Send + Sync + 'static,
    S: SessionTokenRepository + Send + Sync + 'static,
{
    pub fn new(account_repo: Arc<A>, session_repo: Arc<S>) -> Self {
        Self {
            account_repo,
            session_repo,
        }
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponseModel, LoginError> {
        let account = self
            .account_repo
            .find_by_username(username.to_string())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "login: failed to load account");
                LoginError::Transient(err)
            })?
            .ok_or_else(|| {
                warn!("login: unknown username");
                LoginError::BadCredentials
            })?;

        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|err| LoginError::Transient(anyhow!("stored password hash unreadable: {err}")))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!(account_id = account.id, "login: password mismatch");
            return Err(LoginError::BadCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        self.session_repo
            .upsert_for_account(UpsertSessionTokenEntity {
                account_id: account.id,
                token: token.clone(),
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(account_id = account.id, db_error = ?err, "login: failed to write session");
                LoginError::Transient(err)
            })?;

        info!(account_id = account.id, "login: session issued");
        Ok(LoginResponseModel {
            token,
            name: account.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::{SaltString, rand_core::OsRng};

    use crate::domain::entities::accounts::AccountEntity;
    use crate::domain::repositories::accounts::MockAccountRepository;
    use crate::domain::repositories::session_tokens::MockSessionTokenRepository;

    fn account_row(password: &str) -> AccountEntity {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();
        AccountEntity {
            id: 5,
            username: "alice".to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_issue_a_session_token() {
        let account = account_row("hunter2");
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .withf(|username| username.as_str() == "alice")
            .returning(move |_| {
                let account = account.clone();
                Box::pin(async move { Ok(Some(account)) })
            });

        let mut session_repo = MockSessionTokenRepository::new();
        session_repo
            .expect_upsert_for_account()
            .withf(|entity| entity.account_id == 5 && !entity.token.is_empty())
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = LoginUseCase::new(Arc::new(account_repo), Arc::new(session_repo));
        let response = usecase.login("alice", "hunter2").await.unwrap();

        assert_eq!(response.name, "alice");
        assert_eq!(response.token.len(), 32);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_without_touching_sessions() {
        let account = account_row("hunter2");
        let mut account_repo = MockAccountRepository::new();
        account_repo.expect_find_by_username().returning(move |_| {
            let account = account.clone();
            Box::pin(async move { Ok(Some(account)) })
        });

        let usecase = LoginUseCase::new(
            Arc::new(account_repo),
            Arc::new(MockSessionTokenRepository::new()),
        );

        assert!(matches!(
            usecase.login("alice", "wrong").await,
            Err(LoginError::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn issued_token_resolves_through_the_auth_cache() {
        use std::sync::Mutex;

        use crate::application::usecases::token_auth::TokenAuthUseCase;
        use crate::domain::entities::session_tokens::SessionTokenEntity;
        use crate::infrastructure::kv::memory::InMemoryKv;

        let account = account_row("hunter2");
        let account_for_session = account.clone();

        let mut account_repo = MockAccountRepository::new();
        account_repo.expect_find_by_username().returning(move |_| {
            let account = account.clone();
            Box::pin(async move { Ok(Some(account)) })
        });

        let issued: Arc<Mutex<Option<UpsertSessionTokenEntity>>> = Arc::new(Mutex::new(None));
        let issued_writer = Arc::clone(&issued);
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo
            .expect_upsert_for_account()
            .returning(move |entity| {
                *issued_writer.lock().unwrap() = Some(entity);
                Box::pin(async { Ok(()) })
            });

        let login_usecase = LoginUseCase::new(Arc::new(account_repo), Arc::new(session_repo));
        let response = login_usecase.login("alice", "hunter2").await.unwrap();

        let issued = issued.lock().unwrap().take().unwrap();
        assert_eq!(issued.token, response.token);
        assert_eq!(issued.account_id, 5);

        // The freshly issued row is what the auth gate resolves on a cold
        // cache.
        let session_row = SessionTokenEntity {
            id: 1,
            account_id: issued.account_id,
            token: issued.token.clone(),
            created_at: issued.created_at,
        };
        let expected_token = issued.token.clone();
        let mut session_repo = MockSessionTokenRepository::new();
        session_repo
            .expect_find_by_token()
            .withf(move |token| *token == expected_token)
            .returning(move |_| {
                let row = (session_row.clone(), account_for_session.clone());
                Box::pin(async move { Ok(Some(row)) })
            });

        let auth_usecase =
            TokenAuthUseCase::new(Arc::new(session_repo), Arc::new(InMemoryKv::new()));
        let (user, _cache_key) = auth_usecase
            .authenticate(Some(&response.token))
            .await
            .unwrap();

        assert_eq!(user.id, 5);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn unknown_username_is_rejected() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_find_by_username()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = LoginUseCase::new(
            Arc::new(account_repo),
            Arc::new(MockSessionTokenRepository::new()),
        );

        assert!(matches!(
            usecase.login("mallory", "whatever").await,
            Err(LoginError::BadCredentials)
        ));
    }
}
