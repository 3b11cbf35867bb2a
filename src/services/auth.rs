use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{Session, User};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};

/// Validates password complexity requirements:
/// - 10-72 characters long
/// - Contains uppercase letter
/// - Contains lowercase letter
/// - Contains digit
/// - Contains special character
pub fn validate_password_complexity(password: &str) -> ApiResult<()> {
    let len = password.len();
    if !(10..=72).contains(&len) {
        return Err(ApiError::BadRequest(
            "Password must be 10-72 characters long".to_string(),
        ));
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_special = password
        .chars()
        .any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c));

    if !has_uppercase {
        return Err(ApiError::BadRequest(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !has_lowercase {
        return Err(ApiError::BadRequest(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !has_digit {
        return Err(ApiError::BadRequest(
            "Password must contain at least one digit".to_string(),
        ));
    }

    if !has_special {
        return Err(ApiError::BadRequest(
            "Password must contain at least one special character (!@#$%^&*()_+-=[]{}|;:,.<>?)"
                .to_string(),
        ));
    }

    Ok(())
}

/// Hash password using Argon2id (m=19456 KiB, t=2, p=1).
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .build()
        .map_err(|_| ApiError::Internal("Failed to build Argon2 params".to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify password against Argon2id hash.
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| ApiError::Internal("Invalid password hash format".to_string()))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate secure random token for sessions (32 bytes = 64 hex characters).
pub fn generate_session_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Result of a successful operator authentication.
pub struct AuthResult {
    pub session: Session,
    pub user: User,
}

/// Authenticate a console user with email and password and open a session.
pub async fn authenticate(
    db: &Database,
    email: &str,
    password: &str,
    session_duration_hours: i64,
) -> ApiResult<AuthResult> {
    let email = crate::services::validators::validate_and_normalize_email(email)?;

    // Generic Unauthorized on every failure path so the response does not
    // reveal whether the account exists.
    let user = db
        .get_user_by_email(&email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let password_valid = verify_password(password, &user.password_hash)?;
    if !password_valid {
        return Err(ApiError::Unauthorized);
    }

    let token = generate_session_token();
    let session = Session::new(user.id.clone(), token, session_duration_hours);
    db.create_session(&session).await?;

    Ok(AuthResult { session, user })
}

/// Open an anonymous chat session. Guests get a token bound to a display
/// name only; they can reach the chat endpoints and nothing else.
pub async fn create_guest_session(
    db: &Database,
    display_name: &str,
    session_duration_hours: i64,
) -> ApiResult<Session> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("Display name is required".to_string()));
    }
    if display_name.len() > 64 {
        return Err(ApiError::BadRequest(
            "Display name must be at most 64 characters".to_string(),
        ));
    }

    let token = generate_session_token();
    let session = Session::new_guest(token, display_name.to_string(), session_duration_hours);
    db.create_session(&session).await?;

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        assert!(validate_password_complexity("Short1!").is_err());
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(73) + "A1!";
        assert!(validate_password_complexity(&long_password).is_err());
    }

    #[test]
    fn test_password_no_uppercase() {
        assert!(validate_password_complexity("lowercase123!").is_err());
    }

    #[test]
    fn test_password_no_digit() {
        assert!(validate_password_complexity("Lowercase!").is_err());
    }

    #[test]
    fn test_password_no_special() {
        assert!(validate_password_complexity("Lowercase123").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password_complexity("SecureP@ssw0rd").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "SecureP@ssw0rd123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("WrongPassword1!", &hash).unwrap());
    }

    #[test]
    fn test_session_token_generation() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_eq!(token1.len(), 64);
        assert_eq!(token2.len(), 64);
        assert_ne!(token1, token2);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
