//! Data-transfer records exchanged with the CMS API

pub mod auth;
pub mod envelope;
pub mod file;
pub mod graphql;
pub mod realtime;
pub mod user;

pub use auth::{
    AuthTokens, LoginRequest, LogoutRequest, PasswordRequest, PasswordReset, RefreshRequest,
    RegisterRequest, TokenPayload, TOKEN_MODE_JSON,
};
pub use envelope::{ApiErrorDetail, ApiResponse, ErrorEnvelope, ErrorExtensions, ListResponse, ResponseMeta};
pub use file::{FileImport, FileRecord, FileUpload};
pub use graphql::{GraphqlRequest, GraphqlResponse};
pub use realtime::{
    ClientFrame, FrameError, FrameStatus, RealtimeEventKind, ServerFrame, SubscriptionEvent,
};
pub use user::{Role, User};
