//! Webhook authentication

pub mod feed_token;

pub use feed_token::feed_token_middleware;
