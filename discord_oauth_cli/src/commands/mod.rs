//! CLI subcommand implementations.

pub mod callback;
pub mod guilds;
pub mod whoami;
