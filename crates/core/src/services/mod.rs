//! Typed services over the transport port

pub mod auth;
pub mod files;
pub mod graphql;
pub mod items;
pub mod roles;
pub mod server;
pub mod users;

pub use auth::AuthService;
pub use files::FilesService;
pub use graphql::GraphqlService;
pub use items::ItemsService;
pub use roles::RolesService;
pub use server::{ServerHealth, ServerService};
pub use users::UsersService;
