use std::env;
use std::time::Duration;

use crate::features::categories::InactivePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub catalog: CatalogConfig,
    pub admin: AdminConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Upstream catalog API settings
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog REST API (e.g. "https://api.example.com/v1")
    pub api_base_url: String,
    /// Path of the category listing endpoint, appended to the base URL
    pub categories_path: String,
    /// Request timeout for upstream calls
    pub timeout: Duration,
    /// How long a fetched category list is served from memory (zero disables)
    pub cache_ttl: Duration,
    /// Handling of inactive categories in public views
    pub inactive_policy: InactivePolicy,
}

/// Optional basic auth guard for the admin endpoints
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            catalog: CatalogConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CatalogConfig {
    const DEFAULT_CATEGORIES_PATH: &'static str = "/categories";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let api_base_url = env::var("CATALOG_API_URL")
            .map_err(|_| "CATALOG_API_URL environment variable is required".to_string())?;

        let categories_path = env::var("CATALOG_CATEGORIES_PATH")
            .unwrap_or_else(|_| Self::DEFAULT_CATEGORIES_PATH.to_string());

        let timeout_secs = env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CATALOG_TIMEOUT_SECS must be a valid number".to_string())?;

        let cache_ttl_secs = env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CATALOG_CACHE_TTL_SECS must be a valid number".to_string())?;

        let inactive_policy = match env::var("CATALOG_INACTIVE_POLICY") {
            Ok(value) => value
                .parse::<InactivePolicy>()
                .map_err(|e| format!("CATALOG_INACTIVE_POLICY: {}", e))?,
            Err(_) => InactivePolicy::default(),
        };

        Ok(Self {
            api_base_url,
            categories_path,
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            inactive_policy,
        })
    }

    /// Full URL of the category listing endpoint
    pub fn categories_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.categories_path.trim_start_matches('/')
        )
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        Ok(Self { username, password })
    }

    /// Returns credentials in "username:password" format if the guard is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Storefront Catalog API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Category navigation and admin listing for the storefront".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
