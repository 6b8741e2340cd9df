pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod paths;
pub mod review;
pub mod sessions;
pub mod state;

#[cfg(test)]
pub mod testing;
