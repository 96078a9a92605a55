use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Expiration time (UTC timestamp).
    pub exp: usize,
    /// Issued at (UTC timestamp).
    pub iat: usize,
}

impl Claims {
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user = User::test_user("johndoe");
        let claims = Claims::new(&user, 24);

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "johndoe");
        assert_eq!(claims.email, "johndoe@example.com");
        assert!(claims.exp > claims.iat);
    }
}
