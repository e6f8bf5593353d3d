pub mod classify;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod map;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod popup;
pub mod stats;
