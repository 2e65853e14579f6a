pub mod auth;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod promo;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
