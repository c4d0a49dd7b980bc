/// Login and registration
use crate::{
    account::{AccountStore, NewAccount, RegisterRequest},
    auth::{hash_password, verify_password, IssuedToken, TokenKeys},
    db::models::AccountRecord,
    error::{AppError, AppResult},
    metrics,
};
use std::sync::Arc;
use validator::Validate;

/// Verifies credentials and issues access tokens
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenKeys>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn AccountStore>, tokens: Arc<TokenKeys>) -> Self {
        Self { store, tokens }
    }

    /// Check a login identifier and password, returning a fresh token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("email and password are required"));
        }

        let account = match self.store.find_by_login(email).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                metrics::record_login_attempt("unknown_account");
                tracing::warn!("Login failed: no account for identifier");
                return Err(AppError::not_found("account not found"));
            }
            Err(e) => {
                metrics::record_login_attempt("error");
                return Err(e);
            }
        };

        if !verify_password(password, &account.password_hash).await? {
            metrics::record_login_attempt("bad_password");
            tracing::warn!(account_id = account.id, "Login failed: incorrect password");
            return Err(AppError::unauthorized("incorrect credentials"));
        }

        if !account.active {
            metrics::record_login_attempt("inactive");
            tracing::warn!(account_id = account.id, "Login refused: account is inactive");
            return Err(AppError::unauthorized("account is inactive"));
        }

        let issued = self.tokens.issue(account.id)?;
        metrics::record_login_attempt("success");
        tracing::info!(account_id = account.id, token_id = %issued.token_id, "Login succeeded");

        Ok(issued)
    }

    /// Create an active account and sign it in
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> AppResult<(AccountRecord, IssuedToken)> {
        request.validate()?;

        let password_hash = hash_password(&request.password).await?;
        let account = self
            .store
            .insert(NewAccount {
                email: request.email,
                password_hash,
                name: request.name,
                paternal_surname: request.paternal_surname,
                maternal_surname: request.maternal_surname,
                active: true,
                created_by: None,
            })
            .await?;

        let issued = self.tokens.issue(account.id)?;
        tracing::info!(account_id = account.id, "Account registered");

        Ok((account, issued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        account::{AccountChanges, SqliteAccountStore},
        db,
    };
    use async_trait::async_trait;
    use chrono::Duration;

    const SECRET: &str = "authenticator-test-secret-0123456789ab";

    async fn setup() -> (Authenticator, Arc<SqliteAccountStore>, Arc<TokenKeys>) {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let store = Arc::new(SqliteAccountStore::new(pool));
        let tokens = Arc::new(TokenKeys::new(SECRET));
        let authenticator = Authenticator::new(store.clone(), tokens.clone());
        (authenticator, store, tokens)
    }

    fn registration(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: "Ana".to_string(),
            paternal_surname: None,
            maternal_surname: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login_scenario() {
        let (authenticator, store, tokens) = setup().await;

        let (account, registered) = authenticator
            .register(registration("a@b.com", "pw123456"))
            .await
            .unwrap();
        assert!(account.active);
        assert_ne!(account.password_hash, "pw123456");
        assert_eq!(tokens.verify(&registered.token).unwrap().account_id, account.id);

        let login = authenticator.authenticate("a@b.com", "pw123456").await.unwrap();
        assert_eq!(tokens.verify(&login.token).unwrap().account_id, account.id);

        let err = authenticator.authenticate("a@b.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = authenticator.authenticate("x@y.com", "pw123456").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let later = login.expires_at + Duration::seconds(1);
        assert!(tokens.verify_at(&login.token, later).is_err());

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_conflict() {
        let (authenticator, store, _) = setup().await;

        authenticator
            .register(registration("a@b.com", "pw123456"))
            .await
            .unwrap();
        let err = authenticator
            .register(registration("a@b.com", "other-pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_inputs_are_rejected() {
        let (authenticator, store, _) = setup().await;

        assert!(matches!(
            authenticator.authenticate("", "pw").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            authenticator.register(registration("a@b.com", "")).await,
            Err(AppError::Validation(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_account_cannot_login() {
        let (authenticator, store, _) = setup().await;
        let (account, _) = authenticator
            .register(registration("a@b.com", "pw123456"))
            .await
            .unwrap();

        store
            .update(
                account.id,
                AccountChanges {
                    active: Some(false),
                    ..Default::default()
                },
                account.id,
            )
            .await
            .unwrap();

        match authenticator.authenticate("a@b.com", "pw123456").await {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "account is inactive"),
            other => panic!("unexpected result {:?}", other.map(|t| t.account_id)),
        }
    }

    #[tokio::test]
    async fn test_wrong_password_still_runs_hash_comparison() {
        let (authenticator, _, _) = setup().await;
        authenticator
            .register(registration("slow@b.com", "pw123456"))
            .await
            .unwrap();

        let bad_before = metrics::AUTH_LOGIN_ATTEMPTS_TOTAL
            .with_label_values(&["bad_password"])
            .get();

        let mut correct = std::time::Duration::MAX;
        let mut wrong = std::time::Duration::MAX;
        for _ in 0..3 {
            let started = std::time::Instant::now();
            authenticator.authenticate("slow@b.com", "pw123456").await.unwrap();
            correct = correct.min(started.elapsed());

            let started = std::time::Instant::now();
            let err = authenticator
                .authenticate("slow@b.com", "pw123457")
                .await
                .unwrap_err();
            wrong = wrong.min(started.elapsed());
            assert!(matches!(err, AppError::Unauthorized(_)));
        }

        // Both paths pay for one bcrypt verification
        assert!(
            wrong * 10 >= correct,
            "mismatch took {:?}, match took {:?}",
            wrong,
            correct
        );
        assert!(
            metrics::AUTH_LOGIN_ATTEMPTS_TOTAL
                .with_label_values(&["bad_password"])
                .get()
                >= bad_before + 3
        );
    }

    struct BrokenStore;

    #[async_trait]
    impl AccountStore for BrokenStore {
        async fn find_by_login(&self, _email: &str) -> AppResult<Option<AccountRecord>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn insert(&self, _account: NewAccount) -> AppResult<AccountRecord> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_storage_fault_surfaces_as_internal() {
        let authenticator = Authenticator::new(Arc::new(BrokenStore), Arc::new(TokenKeys::new(SECRET)));

        let err = authenticator.authenticate("a@b.com", "pw").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let err = authenticator
            .register(registration("a@b.com", "pw123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
