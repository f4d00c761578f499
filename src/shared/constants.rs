/// Longest admin search term accepted
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Basic auth realm for the admin endpoints
pub const ADMIN_REALM: &str = "Catalog Admin";

/// Basic auth realm for Swagger UI
pub const SWAGGER_REALM: &str = "Swagger UI";
