pub mod inventory;
pub mod profile;

pub use inventory::{Inventory, LinkEntry, LookupResponse};
pub use profile::{ProfileResponse, UserProfile};
