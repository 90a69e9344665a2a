pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod legend;
pub mod output;
pub mod pollen;
pub mod region;
pub mod service;
pub mod severity;
pub mod snapshot;
pub mod stats;
pub mod transform;
