pub mod auth;
pub mod backend;
pub mod links;

pub use auth::{AuthService, Session};
pub use backend::BackendClient;
pub use links::LinkService;
