//! CLI Commands module
//!
//! One module per subcommand, each with dedicated Args and Command
//! structs.

pub mod browse;
pub mod events;
pub mod markets;
pub mod version;
