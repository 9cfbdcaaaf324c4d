//! Macro for implementing Display and FromStr for wire-level string enums
//!
//! Several protocol values (realtime event kinds, message types) travel as
//! lowercase strings. This macro keeps their `Display` and `FromStr`
//! implementations in one place with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use vellum_domain::impl_wire_str_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum AuthStatus {
//!     Ok,
//!     Error,
//! }
//!
//! impl_wire_str_conversions!(AuthStatus {
//!     Ok => "ok",
//!     Error => "error",
//! });
//!
//! assert_eq!(AuthStatus::Ok.to_string(), "ok");
//! assert_eq!("ERROR".parse::<AuthStatus>(), Ok(AuthStatus::Error));
//! ```

/// Implements `Display` and `FromStr` for enums that map one-to-one onto
/// lowercase wire strings.
///
/// Parsing ignores ASCII case; the error names the enum and the rejected
/// input.
#[macro_export]
macro_rules! impl_wire_str_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
