//! API module - routing and request handlers

pub mod handlers;
pub mod routes;
