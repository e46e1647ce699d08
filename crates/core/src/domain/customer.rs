use serde::{Deserialize, Serialize};

/// Customer details available to the action executor for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    pub email: Option<String>,
    pub name: Option<String>,
    pub message: String,
}

impl CustomerData {
    pub fn new(email: Option<String>, name: Option<String>, message: impl Into<String>) -> Self {
        Self { email, name, message: message.into() }
    }

    /// The email address if one with visible characters was supplied.
    pub fn contact_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|email| !email.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}
