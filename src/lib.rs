pub mod graph;
pub mod pacing;
pub mod snapshot;
pub mod babelnet;
pub mod backend;
pub mod config;
pub mod distractors;
pub mod assembler;
pub mod task;
pub mod wic;
pub mod results;
pub mod charts;
pub mod logging;

#[cfg(test)]
mod stub;
