// src/lib.rs

pub mod config;
pub mod db;
pub mod platforms;
pub mod repositories;
pub mod services;

pub use config::{CommandSurfaceMode, ModSlashConfig};
pub use db::Database;
pub use modslash_common::error::Error;
