use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::{IssuedToken, JwtKeys, TokenError},
        password::{hash_password, verify_password},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::AppError,
};

const MAX_PASSWORD_BYTES: usize = 128;
const MAX_NAME_CHARS: usize = 100;

/// Why a presented credential was rejected. Only logged; callers see `Unauthorized`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("token subject does not exist")]
    UnknownSubject,
    #[error("credential store failure")]
    Store(#[source] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => AppError::Store(e),
            other => {
                warn!(reason = %other, "authentication rejected");
                AppError::Unauthorized
            }
        }
    }
}

pub(crate) fn is_valid_user_id(id: &str) -> bool {
    lazy_static! {
        static ref USER_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_.@-]{1,64}$").unwrap();
    }
    USER_ID_RE.is_match(id)
}

fn validate_registration(payload: &mut RegisterRequest) -> Result<(), AppError> {
    payload.id = payload.id.trim().to_string();
    payload.name = payload.name.trim().to_string();

    if !is_valid_user_id(&payload.id) {
        return Err(AppError::InvalidInput(
            "id must be 1-64 characters of letters, digits, '_', '.', '@' or '-'".into(),
        ));
    }
    if payload.password.is_empty() || payload.password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::InvalidInput(format!(
            "password must be 1-{MAX_PASSWORD_BYTES} bytes"
        )));
    }
    if payload.name.is_empty() || payload.name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::InvalidInput(format!(
            "name must be 1-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Creates a user. Two concurrent registrations of one id yield one `Ok` and one `Conflict`.
pub async fn register(users: &dyn UserStore, mut payload: RegisterRequest) -> Result<User, AppError> {
    validate_registration(&mut payload)?;

    let password_hash = hash_password(&payload.password)?;
    let created = users
        .insert_if_absent(NewUser {
            id: payload.id.clone(),
            password_hash,
            name: payload.name,
        })
        .await?;

    match created {
        Some(user) => {
            info!(user_id = %user.id, "user registered");
            Ok(user)
        }
        None => {
            warn!(user_id = %payload.id, "id already registered");
            Err(AppError::Conflict("User already exists".into()))
        }
    }
}

/// Verifies credentials and issues an access token. Unknown id and wrong password look the same.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    mut payload: LoginRequest,
) -> Result<(User, IssuedToken), AppError> {
    payload.id = payload.id.trim().to_string();
    if !is_valid_user_id(&payload.id) || payload.password.is_empty() {
        return Err(AppError::InvalidInput("id and password are required".into()));
    }

    let Some(user) = users.find_by_id(&payload.id).await? else {
        warn!(user_id = %payload.id, "login unknown id");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized);
    }

    let issued = keys.issue(&user.id, None).map_err(signing_failure)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, issued))
}

fn signing_failure(err: TokenError) -> AppError {
    AppError::Store(anyhow::Error::from(err).context("sign access token"))
}

/// Resolves a bearer token to the user it names.
pub async fn authenticate(
    users: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<User, AuthError> {
    let verified = keys.verify(token)?;
    users
        .find_by_id(&verified.subject_id)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::UnknownSubject)
}
