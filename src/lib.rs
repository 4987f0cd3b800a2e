pub mod cli;
pub mod config;
pub mod dataset;
pub mod dedup;
pub mod logging;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod transform;
