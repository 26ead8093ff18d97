//! [`PersonalId`], the personal identifier exchanged by callers of the PRS.

use std::fmt;
use std::str::FromStr;

use crate::error::PrsError;

/// The identifier type carried by a [`PersonalId`].
///
/// Currently only the Dutch `bsn` is supported (spec §3); the type is an
/// enum rather than a bare string so that adding a new id type is a
/// compile-time decision, not a silent runtime acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdType {
    /// Dutch citizen service number (burgerservicenummer).
    Bsn,
}

impl IdType {
    fn as_str(&self) -> &'static str {
        match self {
            IdType::Bsn => "bsn",
        }
    }
}

impl FromStr for IdType {
    type Err = PrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bsn" => Ok(IdType::Bsn),
            other => Err(PrsError::InvalidInput(format!("unknown id_type: {other}"))),
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A personal identifier: `(country_code, id_type, id_number)`.
///
/// Immutable once constructed. The canonical string form is
/// `"CC:type:value"` (spec §3); this is the exact string the
/// `PseudonymEngine` consumes as input, so any change here changes every
/// pseudonym derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonalId {
    country_code: String,
    id_type: IdType,
    id_number: String,
}

impl PersonalId {
    /// Constructs a [`PersonalId`], validating the country code, id type,
    /// and (for `bsn`) the 11-check (see GLOSSARY).
    ///
    /// # Errors
    /// Returns [`PrsError::InvalidInput`] if the country code is not two
    /// ASCII letters, the id type is unsupported, the id number is empty,
    /// contains `|`, or (for `bsn`) fails the 11-check.
    pub fn new(country_code: &str, id_type: &str, id_number: &str) -> Result<Self, PrsError> {
        if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(PrsError::InvalidInput(
                "country_code must be a 2-letter ISO country code".into(),
            ));
        }
        let id_type: IdType = id_type.parse()?;
        let id_number = id_number.trim();
        if id_number.is_empty() {
            return Err(PrsError::InvalidInput("id_number must not be empty".into()));
        }
        if id_number.contains('|') {
            return Err(PrsError::InvalidInput("id_number must not contain '|'".into()));
        }
        if matches!(id_type, IdType::Bsn) && !is_valid_bsn(id_number) {
            return Err(PrsError::InvalidInput("invalid BSN checksum".into()));
        }

        Ok(Self {
            country_code: country_code.to_ascii_uppercase(),
            id_type,
            id_number: id_number.to_string(),
        })
    }

    /// Returns the canonical `"CC:type:value"` string form.
    pub fn canonical(&self) -> String {
        format!("{}:{}:{}", self.country_code, self.id_type, self.id_number)
    }

    /// Returns the ISO country code.
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the id type.
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Returns the raw id number.
    pub fn id_number(&self) -> &str {
        &self.id_number
    }
}

impl fmt::Display for PersonalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl FromStr for PersonalId {
    type Err = PrsError;

    /// Parses the canonical `"CC:type:value"` form. Rejects anything that
    /// does not split into exactly three `:`-separated parts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [country_code, id_type, id_number] = parts.as_slice() else {
            return Err(PrsError::InvalidInput("invalid personal id format".into()));
        };
        PersonalId::new(country_code, id_type, id_number)
    }
}

/// Validates a BSN using the 11-check (GLOSSARY): with digits `d1..d9`,
/// `(9*d1 + 8*d2 + ... + 2*d8 - d9) mod 11 == 0`.
fn is_valid_bsn(id_number: &str) -> bool {
    if id_number.len() != 9 || !id_number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<i64> = id_number
        .chars()
        .map(|c| c.to_digit(10).expect("checked ascii digit") as i64)
        .collect();
    let weighted: i64 = digits[..8]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (9 - i as i64))
        .sum();
    (weighted - digits[8]).rem_euclid(11) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_bsn_roundtrips() {
        // 123456782 passes the 11-check: 9*1+8*2+7*3+6*4+5*5+4*6+3*7+2*8 - 2 = 154, 154 % 11 == 0
        let pid = PersonalId::new("NL", "bsn", "123456782").unwrap();
        assert_eq!(pid.canonical(), "NL:bsn:123456782");
        assert_eq!(PersonalId::from_str(&pid.canonical()).unwrap(), pid);
    }

    #[test]
    fn invalid_bsn_checksum_rejected() {
        assert!(PersonalId::new("NL", "bsn", "123456789").is_err());
    }

    #[test]
    fn rejects_pipe_in_id_number() {
        assert!(PersonalId::new("NL", "bsn", "1234|6782").is_err());
    }

    #[test]
    fn rejects_bad_country_code() {
        assert!(PersonalId::new("N", "bsn", "123456782").is_err());
        assert!(PersonalId::new("N1", "bsn", "123456782").is_err());
    }

    #[test]
    fn rejects_unsupported_id_type() {
        assert!(PersonalId::new("NL", "ssn", "123456782").is_err());
    }

    #[test]
    fn from_str_requires_three_parts() {
        assert!(PersonalId::from_str("NL:bsn").is_err());
        assert!(PersonalId::from_str("NL:bsn:123456782:extra").is_err());
    }
}
