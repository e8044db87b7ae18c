//! Backend response restructuring

use serde_json::Value;

use super::LabelResult;

/// Key under which the backend returns its tagged label string
pub const LABEL_RESULT_KEY: &str = "label_result";

/// Replace a string `label_result` field with its decoded form.
///
/// Objects without the key, non-string values under the key, and non-object
/// responses are returned unchanged.
pub fn restructure_response(mut response: Value) -> Value {
    if let Some(slot) = response
        .as_object_mut()
        .and_then(|map| map.get_mut(LABEL_RESULT_KEY))
    {
        if let Some(raw) = slot.as_str() {
            let decoded = LabelResult::decode(raw);
            // LabelResult only holds strings, serialization cannot fail
            if let Ok(value) = serde_json::to_value(decoded) {
                *slot = value;
            }
        }
    }
    response
}
