// src/lib.rs
// Main library module declarations

pub mod analysis;
pub mod bot;
pub mod config;
pub mod domain;
pub mod exchange;
pub mod storage;
pub mod trading;
