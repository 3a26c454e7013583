use serde::Serialize;
use serde_json::{Map, Value};

pub const PERSIST_KEY_DATE: &str = "PERSIST_KEY_DATE";
pub const PERSIST_KEY_DAY: &str = "PERSIST_KEY_DAY";
pub const PERSIST_KEY_BT: &str = "PERSIST_KEY_BT";
pub const PERSIST_KEY_BATTERY: &str = "PERSIST_KEY_BATTERY";
pub const PERSIST_KEY_SECOND_HAND: &str = "PERSIST_KEY_SECOND_HAND";

/// Form fields the bridge reads out of a closed-page result. The form also
/// declares a `steps` toggle, but the watch side has no persist key for it,
/// so it is never forwarded.
pub const EXTRACTED_FIELDS: [&str; 5] = ["date", "day", "bluetooth", "battery", "second_hand"];

/// Sentinel for a field absent from the page result. The watch app expects
/// all five keys on every update, so absent fields are sent as this literal
/// string rather than omitted.
pub const MISSING_VALUE: &str = "undefined";

/// The outbound settings message. Every value is a string; the watch app
/// parses `"true"`/`"false"` and treats anything else as unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsPayload {
    #[serde(rename = "PERSIST_KEY_DATE")]
    pub date: String,
    #[serde(rename = "PERSIST_KEY_DAY")]
    pub day: String,
    #[serde(rename = "PERSIST_KEY_BT")]
    pub bluetooth: String,
    #[serde(rename = "PERSIST_KEY_BATTERY")]
    pub battery: String,
    #[serde(rename = "PERSIST_KEY_SECOND_HAND")]
    pub second_hand: String,
}

impl SettingsPayload {
    /// Builds the outbound options from a parsed page result, coercing each
    /// extracted field to its string form.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        SettingsPayload {
            date: coerce_field(record, "date"),
            day: coerce_field(record, "day"),
            bluetooth: coerce_field(record, "bluetooth"),
            battery: coerce_field(record, "battery"),
            second_hand: coerce_field(record, "second_hand"),
        }
    }
}

// String-concatenation coercion: booleans become "true"/"false", strings
// pass through, anything else keeps its JSON text, absent becomes
// "undefined". The watch app depends on these exact spellings.
fn coerce_field(record: &Map<String, Value>, name: &str) -> String {
    match record.get(name) {
        None => MISSING_VALUE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{settings_form, toggle_keys};
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn every_toggle_except_steps_is_extracted() {
        let form = settings_form();
        let unextracted: Vec<&str> = toggle_keys(&form)
            .iter()
            .filter(|key| !EXTRACTED_FIELDS.contains(*key))
            .copied()
            .collect();
        // The form declares a step-count toggle the bridge knowingly drops;
        // it never reaches the watch. Kept for parity with the hosted page.
        assert_eq!(unextracted, vec!["steps"]);
    }

    #[test]
    fn missing_fields_coerce_to_undefined() {
        let payload = SettingsPayload::from_record(&record(json!({
            "date": true,
            "day": false,
            "bluetooth": true
        })));
        assert_eq!(payload.date, "true");
        assert_eq!(payload.day, "false");
        assert_eq!(payload.bluetooth, "true");
        assert_eq!(payload.battery, MISSING_VALUE);
        assert_eq!(payload.second_hand, MISSING_VALUE);
    }

    #[test]
    fn well_formed_record_round_trips() {
        let payload = SettingsPayload::from_record(&record(json!({
            "date": true,
            "day": true,
            "bluetooth": true,
            "battery": true,
            "second_hand": true
        })));
        assert_eq!(
            payload,
            SettingsPayload {
                date: "true".into(),
                day: "true".into(),
                bluetooth: "true".into(),
                battery: "true".into(),
                second_hand: "true".into(),
            }
        );
    }

    #[test]
    fn empty_record_still_carries_all_five_keys() {
        let payload = SettingsPayload::from_record(&Map::new());
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        for key in [
            PERSIST_KEY_DATE,
            PERSIST_KEY_DAY,
            PERSIST_KEY_BT,
            PERSIST_KEY_BATTERY,
            PERSIST_KEY_SECOND_HAND,
        ] {
            assert_eq!(object[key], MISSING_VALUE);
        }
    }

    #[test]
    fn steps_field_is_ignored() {
        let payload = SettingsPayload::from_record(&record(json!({
            "steps": false,
            "second_hand": true
        })));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 5);
        assert_eq!(payload.second_hand, "true");
    }

    #[test]
    fn non_boolean_values_keep_their_text() {
        let payload = SettingsPayload::from_record(&record(json!({
            "date": "yes",
            "day": 1,
            "bluetooth": null
        })));
        assert_eq!(payload.date, "yes");
        assert_eq!(payload.day, "1");
        assert_eq!(payload.bluetooth, "null");
    }
}
