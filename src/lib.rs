/// Planet browsing library: HTTP API layers and client-side stores
pub mod catalog;
pub mod clients;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repo;
pub mod resolver;
pub mod routes;
pub mod services;
pub mod store;
pub mod sync;
pub mod utils;
