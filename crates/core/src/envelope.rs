use serde::{Deserialize, Serialize};

/// Uniform wrapper for every API result in the system.
///
/// # Invariants
/// - `is_success == false` implies `message` is non-empty and `result` is
///   not meaningful.
/// - `is_success == true` implies `result` holds the operation's payload
///   (possibly absent for delete-like operations).
///
/// Constructed only through [`Envelope::ok`], [`Envelope::ok_empty`] and
/// [`Envelope::fail`]; handlers return fresh values, never a shared field
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub is_success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl Envelope {
    /// Success envelope carrying a payload.
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            is_success: true,
            message: String::new(),
            result: Some(result),
        }
    }

    /// Success envelope with no payload (register, delete).
    pub fn ok_empty() -> Self {
        Self {
            is_success: true,
            message: String::new(),
            result: None,
        }
    }

    /// Failure envelope carrying a human-readable message.
    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "failure envelope needs a message");
        Self {
            is_success: false,
            message,
            result: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success
    }
}
