//! Delimited id lists for storing relationship lists as a single text value.
//!
//! `[1, 2, 3]` is stored as `"1,2,3"` and an empty list as `""`. Order is kept.

use std::num::ParseIntError;
use thiserror::Error;

use crate::models::ActivityId;

pub const ID_SEPARATOR: &str = ",";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdListError {
    #[error("invalid activity id {token:?}: {source}")]
    InvalidId {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

/// Join ids with [`ID_SEPARATOR`].
pub fn join_ids(ids: &[ActivityId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(ID_SEPARATOR)
}

/// Parse a delimited id list. Whitespace around each id is ignored.
pub fn parse_ids(s: &str) -> Result<Vec<ActivityId>, IdListError> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(ID_SEPARATOR)
        .map(|token| {
            let token = token.trim();
            token.parse().map_err(|source| IdListError::InvalidId {
                token: token.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[3, 1, 2]), "3,1,2");
        assert_eq!(join_ids(&[42]), "42");
        assert_eq!(join_ids(&[]), "");
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("3,1,2"), Ok(vec![3, 1, 2]));
        assert_eq!(parse_ids(" 4 , 5,-6 "), Ok(vec![4, 5, -6]));
        assert_eq!(parse_ids(""), Ok(vec![]));
        assert_eq!(parse_ids("   "), Ok(vec![]));
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(matches!(
            parse_ids("1,x,3"),
            Err(IdListError::InvalidId { ref token, .. }) if token == "x"
        ));
        // Trailing separator leaves an empty token
        assert!(parse_ids("1,2,").is_err());
    }

    #[test]
    fn test_join_then_parse_keeps_order() {
        let ids = vec![10, 2, 33, 4];
        assert_eq!(parse_ids(&join_ids(&ids)), Ok(ids));
    }
}
