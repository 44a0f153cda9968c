// File: modslash-core/src/platforms/mod.rs

pub mod discord;
