pub mod application;
pub mod commands;
pub mod error;
pub mod filesystem;
pub mod package;
pub mod project;
pub mod repository;
pub mod resolver;
pub mod runtime;
