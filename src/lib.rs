mod bridge;
mod schema;

pub use bridge::controller::*;
pub use bridge::events::HostEvent;
pub use bridge::payload::*;
pub use schema::{Field, settings_form, toggle_keys};
