//! Command implementations

pub mod login;
pub mod report;
pub mod session;
