//! Macro for implementing Display and FromStr for wire-level status enums
//!
//! Concourse reports statuses as lowercase strings. The macro gives each
//! status enum a single mapping used for both rendering and parsing.
//!
//! # Example
//!
//! ```rust
//! use glide_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum CheckStatus {
//!     Started,
//!     Succeeded,
//!     Errored,
//! }
//!
//! impl_status_conversions!(CheckStatus {
//!     Started => "started",
//!     Succeeded => "succeeded",
//!     Errored => "errored",
//! });
//!
//! assert_eq!("SUCCEEDED".parse::<CheckStatus>(), Ok(CheckStatus::Succeeded));
//! ```

/// Implements Display and FromStr for status enums
///
/// - Display writes the wire string
/// - FromStr parses it case-insensitively and names the enum on failure
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
