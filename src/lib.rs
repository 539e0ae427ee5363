pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod external;
pub mod planner;
pub mod telemetry;
