//! B2B administration workflows for Microsoft Entra ID
//!
//! The command modules hold the workflows themselves, written against the
//! [`b2b_directory::Directory`] trait so they can run against any backend.

pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod logging;
pub mod output;
pub mod report;
