use std::path::PathBuf;

use beatstore_cloud::media::{CloudinaryConfig, DEFAULT_CLOUDINARY_API_BASE};
use beatstore_cloud::payments::{StripeConfig, DEFAULT_STRIPE_API_BASE};
use beatstore_cloud::webhook::DEFAULT_TOLERANCE_SECS;

use crate::auth::jwt::JwtConfig;
use crate::auth::password::hash_password;

/// Deployment environment, from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Anything other than `development` / `dev` is treated as production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub environment: Environment,
    /// Directory holding the built browser client, served for non-API paths.
    pub client_dir: Option<PathBuf>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub checkout: CheckoutConfig,
    /// Present when `STRIPE_SECRET_KEY` is set.
    pub stripe: Option<StripeConfig>,
    /// Present when all three Cloudinary variables are set.
    pub cloudinary: Option<CloudinaryConfig>,
}

/// The designated administrator.
#[derive(Clone, Default)]
pub struct AdminConfig {
    /// Address that is always an administrator.
    pub email: Option<String>,
    /// Argon2id hash of `ADMIN_PASSWORD`. The plaintext is not retained.
    pub password_hash: Option<String>,
    /// Whether the designated admin may log in with `ADMIN_PASSWORD` when the
    /// stored hash does not match.
    pub password_login: bool,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("password_login", &self.password_login)
            .finish()
    }
}

/// Checkout and webhook settings.
#[derive(Clone)]
pub struct CheckoutConfig {
    /// ISO currency code, lower case.
    pub currency: String,
    /// Base URL the processor redirects back to.
    pub frontend_url: String,
    pub webhook_secret: Option<String>,
    pub webhook_tolerance_secs: i64,
}

impl std::fmt::Debug for CheckoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutConfig")
            .field("currency", &self.currency)
            .field("frontend_url", &self.frontend_url)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}

impl CheckoutConfig {
    /// Where the processor sends the customer after paying. The
    /// `{CHECKOUT_SESSION_ID}` placeholder is filled in by the processor.
    pub fn success_url(&self) -> String {
        format!(
            "{}/#success?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_url.trim_end_matches('/')
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/#cart", self.frontend_url.trim_end_matches('/'))
    }
}

/// Read a variable, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> bool {
    optional_env(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `APP_ENV`              | `production`               |
    /// | `CLIENT_DIR`           | unset                      |
    ///
    /// See [`JwtConfig::from_env`], [`AdminConfig::from_env`] and
    /// [`CheckoutConfig::from_env`] for the remaining variables.
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values or a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let environment = Environment::parse(
            &std::env::var("APP_ENV").unwrap_or_else(|_| "production".into()),
        );

        let client_dir = optional_env("CLIENT_DIR").map(PathBuf::from);

        let stripe = optional_env("STRIPE_SECRET_KEY").map(|secret_key| StripeConfig {
            secret_key,
            api_base: optional_env("STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
        });

        let cloudinary = match (
            optional_env("CLOUDINARY_CLOUD_NAME"),
            optional_env("CLOUDINARY_API_KEY"),
            optional_env("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            environment,
            client_dir,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            checkout: CheckoutConfig::from_env(),
            stripe,
            cloudinary,
        }
    }
}

impl AdminConfig {
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `ADMIN_EMAIL`          | unset   |
    /// | `ADMIN_PASSWORD`       | unset   |
    /// | `ADMIN_PASSWORD_LOGIN` | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `ADMIN_PASSWORD` cannot be hashed.
    pub fn from_env() -> Self {
        let password_hash = optional_env("ADMIN_PASSWORD").map(|password| {
            hash_password(&password).expect("ADMIN_PASSWORD could not be hashed")
        });

        Self {
            email: optional_env("ADMIN_EMAIL"),
            password_hash,
            password_login: env_flag("ADMIN_PASSWORD_LOGIN"),
        }
    }
}

impl CheckoutConfig {
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `CHECKOUT_CURRENCY`     | `usd`                   |
    /// | `FRONTEND_URL`          | `http://localhost:3000` |
    /// | `STRIPE_WEBHOOK_SECRET` | unset                   |
    pub fn from_env() -> Self {
        Self {
            currency: optional_env("CHECKOUT_CURRENCY")
                .unwrap_or_else(|| "usd".into())
                .to_ascii_lowercase(),
            frontend_url: optional_env("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            webhook_secret: optional_env("STRIPE_WEBHOOK_SECRET"),
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(frontend_url: &str) -> CheckoutConfig {
        CheckoutConfig {
            currency: "usd".into(),
            frontend_url: frontend_url.into(),
            webhook_secret: None,
            webhook_tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse(" DEV "), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Production);
    }

    #[test]
    fn redirect_urls_keep_placeholder_and_hash_routes() {
        let config = checkout("https://shop.test/");
        assert_eq!(
            config.success_url(),
            "https://shop.test/#success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(config.cancel_url(), "https://shop.test/#cart");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let admin = AdminConfig {
            email: Some("admin@shop.test".into()),
            password_hash: Some("$argon2id$secret".into()),
            password_login: false,
        };
        let rendered = format!("{admin:?}");
        assert!(!rendered.contains("$argon2id$secret"));
        assert!(rendered.contains("admin@shop.test"));

        let mut with_secret = checkout("http://localhost:3000");
        with_secret.webhook_secret = Some("whsec_live".into());
        assert!(!format!("{with_secret:?}").contains("whsec_live"));
    }
}
