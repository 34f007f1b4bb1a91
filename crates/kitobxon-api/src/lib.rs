//! Kitobxon API: HTTP and Telegram surface of the quiz engine.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telegram;

#[cfg(test)]
mod testing;
