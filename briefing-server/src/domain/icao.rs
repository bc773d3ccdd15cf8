//! Station identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid ICAO code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ICAO code: {reason}")]
pub struct InvalidIcao {
    reason: &'static str,
}

/// A valid 4-letter ICAO airport code.
///
/// ICAO codes are always 4 uppercase ASCII letters. This type guarantees
/// that any `Icao` value is valid by construction.
///
/// # Examples
///
/// ```
/// use briefing_server::domain::Icao;
///
/// let ebbr = Icao::parse("EBBR").unwrap();
/// assert_eq!(ebbr.as_str(), "EBBR");
///
/// // Lowercase is rejected by the strict parser...
/// assert!(Icao::parse("ebbr").is_err());
/// // ...but accepted by the normalizing one
/// assert_eq!(Icao::parse_normalized(" ebbr ").unwrap(), ebbr);
///
/// // Wrong length is rejected
/// assert!(Icao::parse("EBB").is_err());
/// assert!(Icao::parse("EBBRR").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Icao([u8; 4]);

impl Icao {
    /// Parse an ICAO code from a string.
    ///
    /// The input must be exactly 4 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidIcao> {
        let bytes = s.as_bytes();

        if bytes.len() != 4 {
            return Err(InvalidIcao {
                reason: "must be exactly 4 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidIcao {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(Icao([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Build a code from a literal, checked at compile time in const context.
    ///
    /// Panics if `code` is not four uppercase ASCII letters.
    pub const fn from_static(code: &'static str) -> Self {
        let b = code.as_bytes();
        assert!(b.len() == 4, "ICAO literal must be 4 characters");
        assert!(
            b[0].is_ascii_uppercase()
                && b[1].is_ascii_uppercase()
                && b[2].is_ascii_uppercase()
                && b[3].is_ascii_uppercase(),
            "ICAO literal must be uppercase ASCII letters"
        );
        Icao([b[0], b[1], b[2], b[3]])
    }

    /// Parse user input: surrounding whitespace is trimmed and letters uppercased.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidIcao> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the ICAO code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icao({})", self.as_str())
    }
}

impl fmt::Display for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Icao {
    type Error = InvalidIcao;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Icao::parse(&value)
    }
}

impl From<Icao> for String {
    fn from(value: Icao) -> Self {
        value.as_str().to_string()
    }
}
