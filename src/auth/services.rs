use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::{AuthGrant, LoginRequest, PublicUser, SignupRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        repo::{CreateUserError, NewUser, User, UserStore},
    },
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_TAKEN: &str = "User with this email already exists";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Treats absent and empty strings alike.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

pub async fn signup(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: SignupRequest,
) -> AppResult<AuthGrant> {
    let (Some(full_name), Some(email), Some(password), Some(confirm_password)) = (
        present(req.full_name),
        present(req.email),
        present(req.password),
        present(req.confirm_password),
    ) else {
        return Err(AppError::Validation("All fields are required".into()));
    };

    if password != confirm_password {
        return Err(AppError::Validation(
            "Password and confirm password do not match".into(),
        ));
    }

    // Length in UTF-16 code units, as browser clients count it.
    if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let password_hash = hash_password_blocking(password).await?;

    let user = match users
        .create(NewUser {
            full_name,
            email,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!("email taken between lookup and insert");
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }
        Err(CreateUserError::Other(e)) => {
            error!(error = %e, "create user failed");
            return Err(AppError::Internal(e));
        }
    };

    info!(user_id = %user.id, "user registered");
    grant(keys, user)
}

pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> AppResult<AuthGrant> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::Validation(
            "Email and password are required".into(),
        ));
    };

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Auth(BAD_CREDENTIALS.into()));
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Auth(BAD_CREDENTIALS.into()));
    }

    info!(user_id = %user.id, "user logged in");
    grant(keys, user)
}

fn grant(keys: &JwtKeys, user: User) -> AppResult<AuthGrant> {
    let token = keys.sign(user.id, &user.email)?;
    Ok(AuthGrant {
        token,
        user: PublicUser::from(user),
    })
}
