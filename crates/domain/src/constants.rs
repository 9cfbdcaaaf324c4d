//! API paths and protocol constants
//!
//! Centralized location for endpoint paths shared by the services and the
//! transport.

// Auth endpoints
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout";
pub const AUTH_PASSWORD_REQUEST_PATH: &str = "/auth/password/request";
pub const AUTH_PASSWORD_RESET_PATH: &str = "/auth/password/reset";

// Collections
pub const ITEMS_PATH: &str = "/items";
pub const USERS_PATH: &str = "/users";
pub const ROLES_PATH: &str = "/roles";
pub const FILES_PATH: &str = "/files";

// GraphQL
pub const GRAPHQL_PATH: &str = "/graphql";
pub const GRAPHQL_SYSTEM_PATH: &str = "/graphql/system";

// Server
pub const SERVER_HEALTH_PATH: &str = "/server/health";
pub const SERVER_INFO_PATH: &str = "/server/info";

// Realtime
pub const REALTIME_PATH: &str = "/websocket";

/// Refresh tokens this many seconds before they expire.
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "vellum.sdk";
pub const DEFAULT_KEYCHAIN_ACCOUNT: &str = "default";
