use serde::Serialize;

/// One entry of the settings form, in the JSON shape the hosted
/// configuration page renders. Pure data, no behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Field {
    Heading {
        #[serde(rename = "defaultValue")]
        default: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<u8>,
    },
    Text {
        #[serde(rename = "defaultValue")]
        default: String,
    },
    Toggle {
        label: String,
        #[serde(rename = "messageKey")]
        key: String,
        #[serde(rename = "defaultValue")]
        default: bool,
    },
    Section {
        items: Vec<Field>,
    },
    Submit {
        #[serde(rename = "defaultValue")]
        default: String,
    },
}

impl Field {
    pub fn heading(text: &str) -> Self {
        Field::Heading {
            default: text.to_string(),
            size: None,
        }
    }

    pub fn sized_heading(text: &str, size: u8) -> Self {
        Field::Heading {
            default: text.to_string(),
            size: Some(size),
        }
    }

    pub fn text(text: &str) -> Self {
        Field::Text {
            default: text.to_string(),
        }
    }

    pub fn toggle(label: &str, key: &str, default: bool) -> Self {
        Field::Toggle {
            label: label.to_string(),
            key: key.to_string(),
            default,
        }
    }

    pub fn section(items: Vec<Field>) -> Self {
        Field::Section { items }
    }

    pub fn submit(label: &str) -> Self {
        Field::Submit {
            default: label.to_string(),
        }
    }

    /// Identifier the closed-page result reports this field under.
    /// Only toggles carry one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Field::Toggle { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// The complete watchface settings form, in display order.
pub fn settings_form() -> Vec<Field> {
    vec![
        Field::sized_heading("Thin Configuration", 3),
        Field::section(vec![
            Field::heading("Features"),
            Field::text("Turn additional features on or off."),
            Field::toggle("Show weekday and month", "date", true),
            Field::toggle("Show day of the month", "day", true),
            Field::toggle("Show disconnected indicator", "bluetooth", true),
            Field::toggle("Show battery level (hour markers)", "battery", true),
            Field::toggle("Show second hand (uses more power)", "second_hand", true),
            Field::toggle("Show step count", "steps", true),
        ]),
        Field::submit("Save"),
    ]
}

/// Toggle keys in display order. Sections nest one level only.
pub fn toggle_keys(fields: &[Field]) -> Vec<&str> {
    let mut keys = Vec::new();
    for field in fields {
        match field {
            Field::Toggle { key, .. } => keys.push(key.as_str()),
            Field::Section { items } => keys.extend(items.iter().filter_map(Field::key)),
            _ => {}
        }
    }
    keys
}
