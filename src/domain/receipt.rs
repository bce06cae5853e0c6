use std::fmt;

use crate::error::{AppError, AppResult};

const ACCEPTED: &str = "OK";

/// Number the backend assigned to a logged ticket. Opaque; not assumed to
/// be numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketNumber(pub String);

impl TicketNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses the backend acknowledgement `STATUS DETAIL COUNT:NUMBER`.
pub fn parse_acknowledgement(raw: &str) -> AppResult<TicketNumber> {
    let malformed = || AppError::MalformedResponse {
        raw: raw.to_string(),
    };

    let tokens: Vec<&str> = raw.trim_end().split(' ').collect();
    let [status, _detail, counter] = tokens.as_slice() else {
        return Err(malformed());
    };

    let number = counter
        .split_once(':')
        .map(|(_, number)| number)
        .filter(|number| !number.is_empty())
        .ok_or_else(malformed)?;

    if *status != ACCEPTED {
        return Err(AppError::BackendRejected {
            raw: raw.to_string(),
        });
    }

    Ok(TicketNumber(number.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_the_ticket_number() {
        let number = parse_acknowledgement("OK LOGGED COUNT:12345").unwrap();
        assert_eq!(number.as_str(), "12345");
    }

    #[test]
    fn tolerates_a_trailing_newline() {
        let number = parse_acknowledgement("OK LOGGED COUNT:SR-77\n").unwrap();
        assert_eq!(number.to_string(), "SR-77");
    }

    #[test]
    fn reports_backend_rejections() {
        let err = parse_acknowledgement("FAIL BAD COUNT:0").unwrap_err();
        assert!(matches!(err, AppError::BackendRejected { ref raw } if raw == "FAIL BAD COUNT:0"));
    }

    #[test]
    fn reports_malformed_responses() {
        for raw in ["garbage", "", "OK LOGGED", "OK LOGGED COUNT", "OK LOGGED COUNT:", "OK A B C:1"] {
            let err = parse_acknowledgement(raw).unwrap_err();
            assert!(
                matches!(err, AppError::MalformedResponse { .. }),
                "expected malformed for {raw:?}"
            );
        }
    }

    #[test]
    fn malformed_wins_over_rejection() {
        let err = parse_acknowledgement("FAIL BAD").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }
}
