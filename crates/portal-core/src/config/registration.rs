//! Self-registration configuration.

use serde::{Deserialize, Serialize};

/// Registration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Institutional email domain required for student and supervisor sign-up.
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            email_domain: default_email_domain(),
        }
    }
}

fn default_email_domain() -> String {
    "bouesti.edu.ng".to_string()
}
