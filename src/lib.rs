//! casplot - scaling charts for CAS contention benchmarks
//!
//! This library turns benchmark logs containing lines such as
//! `Threads: 4, Time: 0.0123 s, Avg attempts per op: 1.50` into two
//! log-log scaling charts and a merged CSV table keyed by thread count.

pub mod chart;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod inputs;
pub mod parser;
pub mod pipeline;
pub mod table;
