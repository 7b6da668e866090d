pub mod account;
pub mod analyzer;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod scan;
pub mod scanner;
pub mod settings_editor;
