use std::env;

use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub badge_policy: BadgePolicy,
}

/// Thresholds for dashboard badges and streaks, kept here so tuning them never
/// touches the aggregation logic.
#[derive(Clone, Debug)]
pub struct BadgePolicy {
    pub top_contributor_comments: i64,
    pub quick_learner_average: f64,
    pub team_player_groups: usize,
    pub streak_master_days: i64,
    pub quiz_master_results: usize,
}

impl Default for BadgePolicy {
    fn default() -> Self {
        Self {
            top_contributor_comments: 20,
            quick_learner_average: 80.0,
            team_player_groups: 3,
            streak_master_days: 7,
            quiz_master_results: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "studygroups-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            badge_policy: BadgePolicy::default(),
        }
    }

    /// Validate that production-critical configuration is set.
    /// Panics if required secrets are using default values.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "studygroups-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            badge_policy: BadgePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(config.jwt_expiration_hours > 0);
    }

    #[test]
    fn test_badge_policy_defaults() {
        let policy = BadgePolicy::default();

        assert_eq!(policy.top_contributor_comments, 20);
        assert_eq!(policy.streak_master_days, 7);
        assert_eq!(policy.quiz_master_results, 10);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_db_name, "studygroups-test");
        assert_eq!(config.jwt_expiration_hours, 1);
    }
}
