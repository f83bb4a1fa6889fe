//! Command implementations

pub mod list;
pub mod roots;
pub mod watch;
