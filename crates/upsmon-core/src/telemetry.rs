use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// One decoded controller report.
///
/// Every wire field is optional; absent or wrong-typed values fall back to
/// zero/false rather than failing the decode. `capacity_percent` is nominally
/// 0..=100 but the decoder does not clamp it, so downstream code must not
/// assume the range holds.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub capacity_percent: i64,
    pub is_charging: bool,
    pub is_connected: bool,
    pub voltage_mv: u64,
    pub current_ma: i64,
    pub temperature_celsius: Option<i64>,
    pub consecutive_failures: u64,
    pub last_update_ms: u64,
    /// Host wall-clock time at decode, never read from the wire.
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
#[error("malformed telemetry payload {payload:?}: {source}")]
pub struct DecodeError {
    pub payload: String,
    #[source]
    pub source: serde_json::Error,
}

/// Parses a frame payload into a [`TelemetryRecord`].
///
/// Fails only on syntax: anything that is not a JSON document is a
/// [`DecodeError`] the caller should log and skip. Field-level problems never
/// fail the decode.
pub fn decode(payload: &str) -> Result<TelemetryRecord, DecodeError> {
    let doc: serde_json::Value =
        serde_json::from_str(payload).map_err(|source| DecodeError {
            payload: payload.to_string(),
            source,
        })?;

    Ok(TelemetryRecord {
        capacity_percent: doc["capacity_percent"].as_i64().unwrap_or(0),
        is_charging: doc["is_charging"].as_bool().unwrap_or(false),
        is_connected: doc["is_connected"].as_bool().unwrap_or(false),
        voltage_mv: doc["voltage_mV"].as_u64().unwrap_or(0),
        current_ma: doc["current_mA"].as_i64().unwrap_or(0),
        temperature_celsius: doc["temperature_celsius"].as_i64(),
        consecutive_failures: doc["consecutive_failures"].as_u64().unwrap_or(0),
        last_update_ms: doc["last_update_ms"].as_u64().unwrap_or(0),
        received_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_decodes() {
        let record = decode(
            r#"{"capacity_percent":87,"is_charging":true,"is_connected":true,
                "voltage_mV":12450,"current_mA":-320,"temperature_celsius":31,
                "consecutive_failures":2,"last_update_ms":918273}"#,
        )
        .expect("decode");

        assert_eq!(record.capacity_percent, 87);
        assert!(record.is_charging);
        assert!(record.is_connected);
        assert_eq!(record.voltage_mv, 12450);
        assert_eq!(record.current_ma, -320);
        assert_eq!(record.temperature_celsius, Some(31));
        assert_eq!(record.consecutive_failures, 2);
        assert_eq!(record.last_update_ms, 918273);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record = decode("{}").expect("decode");

        assert_eq!(record.capacity_percent, 0);
        assert!(!record.is_charging);
        assert!(!record.is_connected);
        assert_eq!(record.voltage_mv, 0);
        assert_eq!(record.current_ma, 0);
        assert_eq!(record.temperature_celsius, None);
        assert_eq!(record.consecutive_failures, 0);
        assert_eq!(record.last_update_ms, 0);
    }

    #[test]
    fn wrong_typed_fields_fall_back_too() {
        let record =
            decode(r#"{"capacity_percent":"full","is_charging":1,"voltage_mV":-5}"#)
                .expect("decode");

        assert_eq!(record.capacity_percent, 0);
        assert!(!record.is_charging);
        assert_eq!(record.voltage_mv, 0);
    }

    #[test]
    fn out_of_range_capacity_still_decodes() {
        let record = decode(r#"{"capacity_percent":250}"#).expect("decode");
        assert_eq!(record.capacity_percent, 250);
    }

    #[test]
    fn truncated_json_is_a_decode_error() {
        let err = decode(r#"{not valid json"#).expect_err("must fail");
        assert_eq!(err.payload, r#"{not valid json"#);
    }

    #[test]
    fn empty_payload_is_a_decode_error() {
        assert!(decode("").is_err());
    }

    #[test]
    fn received_at_comes_from_the_host_clock() {
        let before = Utc::now();
        let record = decode(r#"{"last_update_ms":1}"#).expect("decode");
        let after = Utc::now();

        assert!(record.received_at >= before && record.received_at <= after);
    }
}
