/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Command implementations for quarto-cite
//!
//! Each command builds its inputs from the merged [`Config`](crate::config::Config),
//! produces its output as a string, and prints it to stdout.

pub mod locator;
pub mod scan;
pub mod terms;
