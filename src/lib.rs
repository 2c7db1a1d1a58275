pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod logging;
pub mod map;
pub mod pipeline;
pub mod report;
pub mod scheduler;
pub mod station;
