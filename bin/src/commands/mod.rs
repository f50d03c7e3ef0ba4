//! CLI command implementations.

pub(crate) mod check_config;
pub(crate) mod export;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod replay;
