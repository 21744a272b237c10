#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod flow;
pub mod inject;
pub mod logging;
pub mod paths;
pub mod stage;
pub mod vm_state;
