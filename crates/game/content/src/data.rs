//! Sample content compiled into the binary.

/// Skills, statuses and unit definitions (RON).
pub const CATALOG: &str = include_str!("../data/catalog.ron");

/// Two starter parties built from [`CATALOG`] (RON).
pub const PARTIES: &str = include_str!("../data/parties.ron");

/// Default battle configuration (TOML).
pub const CONFIG: &str = include_str!("../data/config.toml");
