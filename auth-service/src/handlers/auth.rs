use service_core::{
    axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        Json,
    },
    error::{AppError, AuthFailure},
    extract::{bearer_token, validated, JsonBody},
    middleware::security_context::SecurityContext,
};

use crate::{
    dtos::auth::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, VerifyRequest,
        VerifyResponse,
    },
    services::ServiceError,
    utils::Password,
    AppState,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Missing email or password", body = crate::dtos::ErrorResponse),
        (status = 500, description = "Registration failed", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    ctx: SecurityContext,
    body: JsonBody<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let claimed_email = body.as_ref().ok().and_then(|req| req.email.clone());

    state
        .security_log
        .normal("RegistrationAttempt")
        .request(&ctx)
        .detail("email", claimed_email.as_deref().unwrap_or("-"))
        .emit();

    let req = match validated(body) {
        Ok(req) => req,
        Err(e) => {
            state
                .security_log
                .suspicious("RegistrationFailure")
                .request(&ctx)
                .detail("email", claimed_email.as_deref().unwrap_or("-"))
                .detail("reason", "ValidationError")
                .emit();
            return Err(e);
        }
    };

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Email and password are required"
        )));
    };

    match state
        .auth_service
        .register(email.clone(), Password::new(password))
        .await
    {
        Ok(registered) => {
            state
                .security_log
                .normal("RegistrationSuccess")
                .request(&ctx)
                .detail("email", &email)
                .detail("userId", &registered.account_id)
                .emit();

            Ok(Json(RegisterResponse {
                message: "User registered successfully".to_string(),
                user_id: registered.account_id,
            }))
        }
        Err(e) => {
            state
                .security_log
                .suspicious("RegistrationFailure")
                .request(&ctx)
                .detail("email", &email)
                .detail("error", e.kind())
                .emit();
            Err(e.into())
        }
    }
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = crate::dtos::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::dtos::ErrorResponse),
        (status = 500, description = "Login failed", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ctx: SecurityContext,
    body: JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let claimed_email = body.as_ref().ok().and_then(|req| req.email.clone());

    state
        .security_log
        .normal("LoginAttempt")
        .request(&ctx)
        .detail("email", claimed_email.as_deref().unwrap_or("-"))
        .emit();

    let req = match validated(body) {
        Ok(req) => req,
        Err(e) => {
            state
                .security_log
                .suspicious("LoginFailure")
                .request(&ctx)
                .detail("email", claimed_email.as_deref().unwrap_or("-"))
                .detail("reason", "ValidationError")
                .emit();
            return Err(e);
        }
    };

    let (Some(email), Some(password)) = (req.email, req.password) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Email and password are required"
        )));
    };

    match state
        .auth_service
        .login(&email, Password::new(password))
        .await
    {
        Ok(issued) => {
            state
                .security_log
                .normal("LoginSuccess")
                .request(&ctx)
                .detail("email", &email)
                .detail("userId", &issued.account_id)
                .emit();

            Ok(Json(LoginResponse {
                token: issued.token,
                user_id: issued.account_id,
            }))
        }
        Err(ServiceError::InvalidCredentials) => {
            state
                .security_log
                .suspicious("LoginFailure")
                .request(&ctx)
                .detail("email", &email)
                .detail("reason", AuthFailure::InvalidCredentials)
                .emit();
            Err(AppError::AuthError(AuthFailure::InvalidCredentials))
        }
        Err(e) => {
            state
                .security_log
                .suspicious("LoginError")
                .request(&ctx)
                .detail("email", &email)
                .detail("error", e.kind())
                .emit();
            Err(e.into())
        }
    }
}

/// Verify a bearer token
///
/// The token is read from `Authorization: Bearer` first, then from the
/// `token` field of a JSON body.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Token is valid", body = VerifyResponse),
        (status = 401, description = "Missing, invalid or expired token", body = VerifyResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    ctx: SecurityContext,
    headers: HeaderMap,
    body: Option<Json<VerifyRequest>>,
) -> Response {
    let token = bearer_token(&headers).map(str::to_string).or_else(|| {
        body.and_then(|Json(req)| req.token)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    });

    state
        .security_log
        .normal("TokenVerificationAttempt")
        .request(&ctx)
        .detail("hasToken", token.is_some())
        .emit();

    let Some(token) = token else {
        state
            .security_log
            .suspicious("TokenVerificationFailure")
            .request(&ctx)
            .detail("reason", AuthFailure::NoTokenProvided)
            .emit();
        return unauthorized(AuthFailure::NoTokenProvided);
    };

    match state.auth_service.verify(&token) {
        Ok(verified) => {
            state
                .security_log
                .normal("TokenVerificationSuccess")
                .request(&ctx)
                .detail("userId", &verified.account_id)
                .detail("email", &verified.email)
                .emit();

            Json(VerifyResponse::valid(verified.account_id, verified.email)).into_response()
        }
        Err(e) => {
            state
                .security_log
                .suspicious("TokenVerificationFailure")
                .request(&ctx)
                .detail("reason", AuthFailure::InvalidToken)
                .detail("errorKind", e.kind())
                .emit();
            unauthorized(AuthFailure::InvalidToken)
        }
    }
}

fn unauthorized(reason: AuthFailure) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(VerifyResponse::invalid(reason.message())),
    )
        .into_response()
}
