pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod lint;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod session;
pub mod snippets;
pub mod store;
