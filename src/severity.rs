use log::Level;

/// Bridges the Standard Logging Library's levels into the renderings the
/// layouts need.
pub trait Severity {
    /// Returns an integer severity representation.
    fn as_i32(&self) -> i32;

    /// Returns the log4j-style string rendering.
    fn as_str(&self) -> &'static str;
}

impl Severity for Level {
    fn as_i32(&self) -> i32 {
        match *self {
            Level::Error => 1,
            Level::Warn => 2,
            Level::Info => 3,
            Level::Debug => 4,
            Level::Trace => 5,
        }
    }

    fn as_str(&self) -> &'static str {
        match *self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}
