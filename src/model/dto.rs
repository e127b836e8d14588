//! Transfer record exchanged over the REST interface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::car::CarId;

/// Externally facing representation of a car.
///
/// `id` is absent on create requests and ignored if a client sends one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CarId>,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
}

/// A transfer record that cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required text field is empty or whitespace
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}

impl CarDto {
    /// Check the text fields a stored car requires.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("brand", &self.brand),
            ("model", &self.model),
            ("vin", &self.vin),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(name));
            }
        }
        Ok(())
    }
}
