// src/commands/mod.rs
//! Command implementations for the cookbook CLI

mod system;
mod users;

pub use system::{cmd_init, cmd_serve};
pub use users::{cmd_create_user, cmd_shopping_list};
