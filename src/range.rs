//! Server range expressions such as `"978-1012,1015-1020"`.
//!
//! Each comma-separated token is either a single ID or a closed interval
//! `start-end`. IDs come out in the order written, duplicates included.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range expression is empty")]
    Empty,
    #[error("token #{position} is empty")]
    EmptyToken { position: usize },
    #[error("malformed token `{0}`")]
    Malformed(String),
    #[error("server id out of range in `{0}`")]
    Overflow(String),
    #[error("reversed range `{start}-{end}`")]
    Reversed { start: u32, end: u32 },
    #[error("expression expands to more than {} servers", MAX_SERVERS)]
    TooLarge,
}

/// Upper bound on an expanded list.
pub const MAX_SERVERS: usize = 100_000;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]+)(?:\s*-\s*([0-9]+))?$").expect("token pattern is a valid regex")
    })
}

fn parse_id(digits: &str, token: &str) -> Result<u32, RangeError> {
    digits
        .parse::<u32>()
        .map_err(|_| RangeError::Overflow(token.to_string()))
}

/// Expands a range expression into the ordered list of server IDs.
pub fn parse_server_range(input: &str) -> Result<Vec<u32>, RangeError> {
    let body = input.trim().trim_matches('"').trim();
    if body.is_empty() {
        return Err(RangeError::Empty);
    }

    let mut servers = Vec::new();
    for (position, raw) in body.split(',').enumerate() {
        let token = raw.trim();
        if token.is_empty() {
            return Err(RangeError::EmptyToken { position: position + 1 });
        }
        let caps = token_pattern()
            .captures(token)
            .ok_or_else(|| RangeError::Malformed(token.to_string()))?;

        let start = parse_id(&caps[1], token)?;
        match caps.get(2) {
            Some(end) => {
                let end = parse_id(end.as_str(), token)?;
                if end < start {
                    return Err(RangeError::Reversed { start, end });
                }
                if (end - start) as usize >= MAX_SERVERS - servers.len() {
                    return Err(RangeError::TooLarge);
                }
                servers.extend(start..=end);
            }
            None => servers.push(start),
        }
        if servers.len() > MAX_SERVERS {
            return Err(RangeError::TooLarge);
        }
    }
    Ok(servers)
}

/// Parsed form of a range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRangeSpec(Vec<u32>);

impl ServerRangeSpec {
    pub fn servers(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ServerRangeSpec {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_server_range(s).map(Self)
    }
}

impl fmt::Display for ServerRangeSpec {
    /// Compacts consecutive ascending runs back into `a-b` tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut i = 0;
        while i < self.0.len() {
            let start = self.0[i];
            let mut j = i;
            while j + 1 < self.0.len() && self.0[j].checked_add(1) == Some(self.0[j + 1]) {
                j += 1;
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if j > i {
                write!(f, "{}-{}", start, self.0[j])?;
            } else {
                write!(f, "{}", start)?;
            }
            i = j + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_two_ranges_in_order() {
        let servers = parse_server_range("978-1012,1015-1020").unwrap();
        let expected: Vec<u32> = (978..=1012).chain(1015..=1020).collect();
        assert_eq!(servers, expected);
        assert_eq!(servers.len(), 35 + 6);
    }

    #[test]
    fn single_ids_and_whitespace() {
        assert_eq!(parse_server_range(" 5 , 7-9 ,3").unwrap(), vec![5, 7, 8, 9, 3]);
        assert_eq!(parse_server_range("10 - 12").unwrap(), vec![10, 11, 12]);
    }

    #[test]
    fn strips_json_quotes() {
        assert_eq!(parse_server_range("\"999-1001\"").unwrap(), vec![999, 1000, 1001]);
    }

    #[test]
    fn keeps_duplicates_as_written() {
        assert_eq!(parse_server_range("3,1-3,3").unwrap(), vec![3, 1, 2, 3, 3]);
    }

    #[test]
    fn degenerate_range_is_one_id() {
        assert_eq!(parse_server_range("1000-1000").unwrap(), vec![1000]);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_server_range(""), Err(RangeError::Empty));
        assert_eq!(parse_server_range("\"\""), Err(RangeError::Empty));
        assert_eq!(
            parse_server_range("1,,2"),
            Err(RangeError::EmptyToken { position: 2 })
        );
        assert_eq!(
            parse_server_range("abc"),
            Err(RangeError::Malformed("abc".into()))
        );
        assert_eq!(
            parse_server_range("-5"),
            Err(RangeError::Malformed("-5".into()))
        );
        assert_eq!(
            parse_server_range("1-2-3"),
            Err(RangeError::Malformed("1-2-3".into()))
        );
    }

    #[test]
    fn rejects_reversed_range() {
        assert_eq!(
            parse_server_range("1020-1015"),
            Err(RangeError::Reversed { start: 1020, end: 1015 })
        );
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            parse_server_range("99999999999"),
            Err(RangeError::Overflow(_))
        ));
    }

    #[test]
    fn rejects_huge_expansion() {
        assert_eq!(parse_server_range("0-4000000000"), Err(RangeError::TooLarge));
    }

    #[test]
    fn spec_round_trips_through_display() {
        let spec: ServerRangeSpec = "978-1012,1015-1020,7".parse().unwrap();
        assert_eq!(spec.to_string(), "978-1012,1015-1020,7");
    }

    #[test]
    fn display_does_not_wrap_at_u32_max() {
        let spec: ServerRangeSpec = "4294967295,0".parse().unwrap();
        assert_eq!(spec.to_string(), "4294967295,0");
        let back: ServerRangeSpec = spec.to_string().parse().unwrap();
        assert_eq!(back, spec);

        let tail: ServerRangeSpec = "4294967294-4294967295,0-1".parse().unwrap();
        assert_eq!(tail.to_string(), "4294967294-4294967295,0-1");
    }
}
