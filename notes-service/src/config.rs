use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub http_port: u16,

    // Database configuration
    pub database_url: String,
    pub db_max_connections: u32,

    // Auth provider token verification
    pub jwt_secret: String,

    // CORS configuration
    pub cors_allowed_origins: String,

    // Service configuration
    pub service_name: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(value) => value,
            Err(_) if environment.eq_ignore_ascii_case("production") => {
                return Err("JWT_SECRET must be set in production".to_string())
            }
            Err(_) => "insecure-dev-secret".to_string(),
        };

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if environment.eq_ignore_ascii_case("production") => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "http://localhost:3000".to_string(),
        };

        Ok(Self {
            host: env::var("NOTES_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("NOTES_SERVICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/campusnotes".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            jwt_secret,
            cors_allowed_origins,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "notes-service".to_string()),
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::from_env().unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.service_name, "notes-service");
        assert_eq!(config.db_max_connections, 20);
    }
}
