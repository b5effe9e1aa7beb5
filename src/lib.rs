pub mod config;
pub mod diagram;
pub mod metadata;
pub mod output;
