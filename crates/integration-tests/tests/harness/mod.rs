#![allow(dead_code)]

pub mod config;
pub mod routes;
pub mod server;
pub mod tokens;
