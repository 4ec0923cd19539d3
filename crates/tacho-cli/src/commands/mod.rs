pub mod classify;
pub mod config;
pub mod limits;
pub mod replay;
