// Build-time identity, logged at startup.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `name vX.Y.Z`
pub fn banner() -> String {
    format!("{} v{}", NAME, VERSION)
}
