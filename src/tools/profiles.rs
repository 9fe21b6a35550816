//! Profile MCP Tools
//!
//! Save and load biometric profiles under six-digit user codes.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    generate_user_code, is_valid_user_code, BiometricProfile, ProfileInput, UserProfile,
};

use super::{ToolError, ToolResult};

/// Attempts at drawing an unused code before giving up
const MAX_CODE_ATTEMPTS: usize = 20;

/// Response for save_profile
#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub success: bool,
    pub user_code: String,
    pub created: bool,
    pub message: String,
}

/// Response for load_profile
#[derive(Debug, Serialize)]
pub struct LoadProfileResponse {
    pub user_code: String,
    pub profile: BiometricProfile,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for LoadProfileResponse {
    fn from(stored: UserProfile) -> Self {
        Self {
            height_cm: stored.profile.height.to_cm(),
            weight_kg: stored.profile.weight.to_kg(),
            user_code: stored.user_code,
            profile: stored.profile,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}

/// Check a client-supplied code
pub fn validate_user_code(code: &str) -> ToolResult<&str> {
    let code = code.trim();
    if !is_valid_user_code(code) {
        return Err(ToolError::InvalidInput(format!(
            "Invalid user code '{}': expected 6 digits",
            code
        )));
    }
    Ok(code)
}

/// Save a profile. Without a code a fresh one is generated; with a code the
/// stored profile is updated (or created under that code).
pub fn save_profile(
    db: &Database,
    user_code: Option<&str>,
    input: &ProfileInput,
) -> ToolResult<SaveProfileResponse> {
    let profile = input
        .validate()
        .map_err(|e| ToolError::InvalidInput(e.to_string()))?;
    let code = user_code.map(validate_user_code).transpose()?;
    let conn = db
        .get_conn()
        .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;

    let (code, created) = match code {
        Some(code) => {
            let exists = UserProfile::exists(&conn, code)
                .map_err(|e| ToolError::internal(format!("Failed to check user code: {}", e)))?;
            (code.to_string(), !exists)
        }
        None => (unused_code(&conn)?, true),
    };

    let stored = UserProfile::upsert(&conn, &code, &profile)
        .map_err(|e| ToolError::internal(format!("Failed to save profile: {}", e)))?;

    tracing::info!(user_code = %stored.user_code, created, "saved profile");

    let message = if created {
        format!(
            "Profile saved! Your code is: {}. Save this code to load your profile later.",
            stored.user_code
        )
    } else {
        "Profile updated successfully!".to_string()
    };

    Ok(SaveProfileResponse {
        success: true,
        user_code: stored.user_code,
        created,
        message,
    })
}

fn unused_code(conn: &rusqlite::Connection) -> ToolResult<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_user_code();
        let taken = UserProfile::exists(conn, &code)
            .map_err(|e| ToolError::internal(format!("Failed to check user code: {}", e)))?;
        if !taken {
            return Ok(code);
        }
        tracing::debug!(user_code = %code, "generated code already taken, retrying");
    }
    Err(ToolError::internal("Could not allocate a free user code"))
}

/// Load a profile by code
pub fn load_profile(db: &Database, user_code: &str) -> ToolResult<Option<LoadProfileResponse>> {
    let code = validate_user_code(user_code)?;
    let conn = db
        .get_conn()
        .map_err(|e| ToolError::internal(format!("Database error: {}", e)))?;

    let stored = UserProfile::get_by_code(&conn, code)
        .map_err(|e| ToolError::internal(format!("Failed to load profile: {}", e)))?;

    if stored.is_none() {
        tracing::warn!(user_code = %code, "profile not found");
    }

    Ok(stored.map(LoadProfileResponse::from))
}
