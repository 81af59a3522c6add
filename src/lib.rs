// socialguard: copy-cat detection for token launches.
//
// This is the library root. Each module corresponds to a major subsystem
// of the social link registry.

pub mod config;
pub mod db;
pub mod output;
pub mod registry;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
