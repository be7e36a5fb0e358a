//! CLI command implementations.

mod config;
mod doctor;
mod hosts;
mod produce;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use hosts::run_hosts;
pub use produce::run_produce;
pub use serve::run_serve;
