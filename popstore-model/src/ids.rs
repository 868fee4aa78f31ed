use crate::error::ModelError;
use std::str::FromStr;

/// Strongly typed ID for popup-store listings.
///
/// The remote API numbers listings with positive integers and uses the bare
/// number both in paths and in JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ListingId(pub u64);

impl ListingId {
    pub fn new(raw: u64) -> Self {
        ListingId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ListingId {
    fn from(raw: u64) -> Self {
        ListingId(raw)
    }
}

impl FromStr for ListingId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ListingId)
            .map_err(|_| ModelError::InvalidId(s.to_string()))
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_segments() {
        assert_eq!("42".parse::<ListingId>().unwrap(), ListingId(42));
        assert_eq!(" 7 ".parse::<ListingId>().unwrap(), ListingId(7));
        assert!("abc".parse::<ListingId>().is_err());
        assert!("-1".parse::<ListingId>().is_err());
    }
}
