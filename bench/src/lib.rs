//! Benchmark utilities for the Hydrogen engine.
//!
//! This crate provides benchmarking infrastructure for singleton conversion:
//!
//! - **Microbenchmarks**: Arbitration and single controller ticks at growing candidate counts
//! - **Scenario benchmarks**: Frame-shaped workloads with many producers per singleton type
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p hydrogen_bench
//!
//! # Run specific benchmark group
//! cargo bench -p hydrogen_bench -- tick
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod scenarios;
pub mod singletons;
