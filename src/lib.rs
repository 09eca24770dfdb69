pub mod classifier;
pub mod configuration;
pub mod console;
pub mod gateway;
pub mod history;
pub mod models;
pub mod normalizer;
pub mod render;
pub mod resolver;
