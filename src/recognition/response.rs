//! Interpret the recognition endpoint's JSON answer.
//!
//! The server replies with a flat object. Four keys are recognized; any may
//! be missing, in which case the field reads `Unknown <Field>`. Other keys
//! (the server also sends `year`, and `error` on scrape failures) are
//! ignored. A body that is not a JSON object is a contract violation.

use super::error::RecognitionError;
use crate::types::CardDetails;
use serde::Deserialize;

pub const UNKNOWN_PLAYER: &str = "Unknown Player";
pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const UNKNOWN_SET: &str = "Unknown Set";
pub const UNKNOWN_NUMBER: &str = "Unknown Number";

/// Wire shape of the response. `null` counts as missing.
#[derive(Debug, Deserialize)]
struct RawCardResponse {
    player_name: Option<String>,
    team_name: Option<String>,
    set_name: Option<String>,
    card_number: Option<String>,
}

/// Parse a response body into card details.
pub fn parse_card_response(body: &[u8]) -> Result<CardDetails, RecognitionError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| RecognitionError::InvalidResponseFormat)?;
    card_details_from_value(value)
}

/// Convert an already-parsed JSON value into card details.
pub fn card_details_from_value(value: serde_json::Value) -> Result<CardDetails, RecognitionError> {
    // serde would also accept a 4-element array for the struct; only objects are valid here
    if !value.is_object() {
        return Err(RecognitionError::InvalidResponseFormat);
    }
    let raw: RawCardResponse =
        serde_json::from_value(value).map_err(|_| RecognitionError::InvalidResponseFormat)?;

    Ok(CardDetails {
        player_name: raw.player_name.unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
        team_name: raw.team_name.unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
        set_name: raw.set_name.unwrap_or_else(|| UNKNOWN_SET.to_string()),
        card_number: raw.card_number.unwrap_or_else(|| UNKNOWN_NUMBER.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload() {
        let body = br#"{"player_name":"J. Doe","team_name":"Bulls","set_name":"1997 Topps","card_number":"23"}"#;
        let details = parse_card_response(body).unwrap();
        assert_eq!(
            details,
            CardDetails {
                player_name: "J. Doe".into(),
                team_name: "Bulls".into(),
                set_name: "1997 Topps".into(),
                card_number: "23".into(),
            }
        );
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let details = parse_card_response(br#"{"player_name": "A"}"#).unwrap();
        assert_eq!(details.player_name, "A");
        assert_eq!(details.team_name, "Unknown Team");
        assert_eq!(details.set_name, "Unknown Set");
        assert_eq!(details.card_number, "Unknown Number");
    }

    #[test]
    fn empty_object_is_all_placeholders() {
        let details = parse_card_response(b"{}").unwrap();
        assert_eq!(details.player_name, UNKNOWN_PLAYER);
        assert_eq!(details.team_name, UNKNOWN_TEAM);
        assert_eq!(details.set_name, UNKNOWN_SET);
        assert_eq!(details.card_number, UNKNOWN_NUMBER);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let body = br#"{"player_name":"A","year":"1997","error":"Scraping failed","extra":[1,2]}"#;
        let details = parse_card_response(body).unwrap();
        assert_eq!(details.player_name, "A");
        assert_eq!(details.set_name, UNKNOWN_SET);
    }

    #[test]
    fn null_field_counts_as_missing() {
        let details = parse_card_response(br#"{"team_name": null}"#).unwrap();
        assert_eq!(details.team_name, UNKNOWN_TEAM);
    }

    #[test]
    fn non_string_recognized_field_is_invalid() {
        let result = parse_card_response(br#"{"card_number": 23}"#);
        assert_eq!(result, Err(RecognitionError::InvalidResponseFormat));
    }

    #[test]
    fn non_object_payloads_are_invalid() {
        for body in [
            &br#"["J. Doe","Bulls","1997 Topps","23"]"#[..],
            b"\"J. Doe\"",
            b"42",
            b"null",
            b"true",
        ] {
            assert_eq!(
                parse_card_response(body),
                Err(RecognitionError::InvalidResponseFormat),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn non_json_body_is_invalid() {
        let result = parse_card_response(b"<html>502 Bad Gateway</html>");
        assert_eq!(result, Err(RecognitionError::InvalidResponseFormat));
    }
}
