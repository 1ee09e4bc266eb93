//! Stage bodies

pub mod acquire;
pub mod install;
pub mod layout;
