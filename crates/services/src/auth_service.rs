use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use exam_core::model::{Account, Credentials, Role};
use storage::repository::{AccountRepository, NewAccountRecord};

use crate::Clock;
use crate::error::AuthError;

const SALT_LEN: usize = 16;

/// Outcome of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub account: Account,
    /// The account did not exist and was created by this call.
    pub registered: bool,
}

impl SignIn {
    /// Role used for routing: always the stored one.
    #[must_use]
    pub fn role(&self) -> Role {
        self.account.role()
    }
}

/// Email/password sign-in with implicit registration.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    accounts: Arc<dyn AccountRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { clock, accounts }
    }

    /// Sign in, or register with `requested_role` if the email is unknown.
    ///
    /// For an existing account the stored role wins; a different
    /// `requested_role` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credential` for a malformed email or short
    /// password, `AuthError::WrongPassword` on a mismatch,
    /// `AuthError::CorruptHash` for an unreadable stored hash and
    /// `AuthError::Storage` for repository failures.
    pub async fn sign_in_or_register(
        &self,
        email: &str,
        password: &str,
        requested_role: Role,
    ) -> Result<SignIn, AuthError> {
        let credentials = Credentials::new(email, password)?;

        if let Some(record) = self.accounts.find_account(credentials.email()).await? {
            if !verify_password(credentials.password(), &record.password_hash)? {
                tracing::info!(email = %credentials.email(), "sign-in rejected");
                return Err(AuthError::WrongPassword);
            }
            if record.account.role() != requested_role {
                tracing::warn!(
                    email = %credentials.email(),
                    stored = %record.account.role(),
                    requested = %requested_role,
                    "requested role ignored; using stored role"
                );
            }
            return Ok(SignIn {
                account: record.account,
                registered: false,
            });
        }

        let account = self
            .accounts
            .insert_account(NewAccountRecord {
                email: credentials.email().clone(),
                role: requested_role,
                password_hash: hash_password(credentials.password())?,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(email = %account.email(), role = %account.role(), "account registered");
        Ok(SignIn {
            account,
            registered: true,
        })
    }
}

/// PHC string (`$argon2id$v=19$...`) with a random 16-byte salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt_bytes: [u8; SALT_LEN] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|_| AuthError::Hashing)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::Hashing)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|_| AuthError::CorruptHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(AuthError::CorruptHash),
    }
}
