pub mod config;
pub mod evaluation;
pub mod influencer;
pub mod output;
pub mod random;
pub mod scoring;
pub mod service;
pub mod store;
pub mod telemetry;
