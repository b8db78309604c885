//! # Authentication Handlers
//!
//! HTTP request handlers for user authentication endpoints.
//!
//! ## Overview
//!
//! This module implements the authentication flow including:
//! - User signup with email/password and an optional role
//! - User login with email or username
//! - JWT token generation
//!
//! Dermatologist accounts are created in `PENDING` moderation status: they
//! receive no token at signup and cannot log in until an admin approves them.

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_auth::{encode_jwt, hash_password, verify_password};
use lib_core::dto::auth::{AuthResponse, ErrorResponse, LoginRequest, SignupRequest, UserInfo};
use lib_core::model::store::models::{AccountStatus, Role, UserForCreate};
use lib_core::model::store::UserRepository;
use lib_core::{Config, DbPool};
use tracing::{debug, error, info, instrument, warn};

/// Signup handler - creates a new user account.
///
/// # Returns
///
/// * `Ok((StatusCode::CREATED, AuthResponse))` - User created; a JWT token is
///   included only for accounts that are immediately approved
/// * `Err((StatusCode, ErrorResponse))` - Validation error, duplicate user, or server error
///
/// # Validation
///
/// - Username must be at least 3 characters
/// - Email must contain '@' symbol
/// - Email and username must be unique
/// - Password must be at least 8 characters (validated in hash_password)
/// - Admin accounts cannot be self-registered
#[instrument(skip(pool, config, req), fields(username = %req.username, email = %req.email))]
pub async fn signup(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!("[SIGNUP] New user signup request");
    debug!("   Username: {}", req.username);
    debug!("   Email: {}", req.email);

    if req.username.len() < 3 {
        warn!("[SIGNUP] Username too short");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Username must be at least 3 characters".to_string(),
            }),
        ));
    }

    if !req.email.contains('@') {
        warn!("[SIGNUP] Invalid email format");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid email format".to_string(),
            }),
        ));
    }

    let role = req.role.unwrap_or(Role::User);
    if role == Role::Admin {
        warn!("[SIGNUP] Attempt to self-register an admin account");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid role".to_string(),
            }),
        ));
    }

    match UserRepository::find_by_email(&pool, &req.email).await {
        Ok(Some(_)) => {
            warn!("[SIGNUP] Email already registered: {}", req.email);
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Email already registered".to_string(),
                }),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!("[SIGNUP] Database error checking email: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    }

    match UserRepository::find_by_username(&pool, &req.username).await {
        Ok(Some(_)) => {
            warn!("[SIGNUP] Username already taken: {}", req.username);
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "Username already taken".to_string(),
                }),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!("[SIGNUP] Database error checking username: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    }

    // Hash password
    debug!("[SIGNUP] Hashing password...");
    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("[SIGNUP] Password hashing failed: {}", e);
            return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })));
        }
    };

    // Create user
    debug!("[SIGNUP] Creating user in database...");
    let user_c = UserForCreate::new(req.username.clone(), req.email.clone(), password_hash, role);
    let user = match UserRepository::create(&pool, user_c).await {
        Ok(user) => user,
        Err(e) => {
            error!("[SIGNUP] Failed to create user: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create user".to_string(),
                }),
            ));
        }
    };

    // Accounts awaiting moderation get no token; they must log in once
    // approved. Issuing one here would let a pending account reach every
    // bearer-protected route until the token expires.
    let (token, message) = match user.account_status {
        AccountStatus::Approved => {
            debug!("[SIGNUP] Generating JWT token...");
            let token = match encode_jwt(
                user.id,
                user.username.clone(),
                user.role.to_string(),
                &config.jwt_secret,
                config.jwt_expiration_hours,
            ) {
                Ok(token) => token,
                Err(e) => {
                    error!("[SIGNUP] JWT encoding failed: {}", e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to generate token".to_string(),
                        }),
                    ));
                }
            };
            (Some(token), "Signup successful".to_string())
        }
        _ => (
            None,
            "Signup successful, your account is pending approval".to_string(),
        ),
    };

    info!("[SIGNUP] User created: {} (id: {})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserInfo::from(user),
            message,
        }),
    ))
}

/// Login handler - authenticates an existing user.
///
/// # Authentication
///
/// - Accepts either email (contains '@') or username
/// - Verifies password using Argon2
/// - Rejects deactivated, pending, and rejected accounts
/// - Generates JWT token with user claims
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Config>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, Json<ErrorResponse>)> {
    info!("[LOGIN] Login attempt");
    debug!("   Identifier: {}", req.username);

    // Find user by email or username
    let user = if req.username.contains('@') {
        debug!("[LOGIN] Looking up by email...");
        UserRepository::find_by_email(&pool, &req.username).await
    } else {
        debug!("[LOGIN] Looking up by username...");
        UserRepository::find_by_username(&pool, &req.username).await
    };

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("[LOGIN] User not found: {}", req.username);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid credentials".to_string(),
                }),
            ));
        }
        Err(e) => {
            error!("[LOGIN] Database error: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Database error".to_string(),
                }),
            ));
        }
    };

    // Check if user is active
    if !user.is_active {
        warn!("[LOGIN] Account deactivated: {}", user.username);
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Account is deactivated".to_string(),
            }),
        ));
    }

    // Moderation gate: pending and rejected accounts cannot log in.
    match user.account_status {
        AccountStatus::Approved => {}
        AccountStatus::Pending => {
            warn!("[LOGIN] Account pending approval: {}", user.username);
            return Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Account is pending approval".to_string(),
                }),
            ));
        }
        AccountStatus::Rejected => {
            warn!("[LOGIN] Account rejected: {}", user.username);
            return Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    error: "Account has been rejected".to_string(),
                }),
            ));
        }
    }

    // Verify password
    debug!("[LOGIN] Verifying password...");
    let is_valid = match verify_password(&req.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!("[LOGIN] Password verification error: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Authentication error".to_string(),
                }),
            ));
        }
    };

    if !is_valid {
        warn!("[LOGIN] Invalid password for user: {}", user.username);
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid credentials".to_string(),
            }),
        ));
    }

    // Generate JWT
    debug!("[LOGIN] Generating JWT token...");
    let token = match encode_jwt(
        user.id,
        user.username.clone(),
        user.role.to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("[LOGIN] JWT encoding failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate token".to_string(),
                }),
            ));
        }
    };

    info!("[LOGIN] User authenticated: {} (id: {})", user.username, user.id);

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            token: Some(token),
            user: UserInfo::from(user),
            message: "Login successful".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests;
