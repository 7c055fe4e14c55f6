pub mod commands;
pub mod config;
pub mod converter;
pub mod keyboard;
pub mod pipeline;
pub mod project;
