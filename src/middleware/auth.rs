// Authenticated principal extracted from a validated JWT

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user information extracted from JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub exp: u64,
}
