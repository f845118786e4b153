pub mod auth;
pub mod health;
pub mod links;
pub mod pages;

pub use health::health_check;
pub use links::resolve;
pub use pages::{create_page, inventory_page};
