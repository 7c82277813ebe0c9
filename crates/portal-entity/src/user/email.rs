//! Institutional email formats.
//!
//! Students register as `letters.digits@<domain>` and the digits become
//! their matriculation number. Supervisors register as
//! `letters.letters@<domain>`.

use portal_core::AppError;
use regex::Regex;

/// Email format rules for one institutional domain.
#[derive(Debug, Clone)]
pub struct EmailPolicy {
    domain: String,
    student: Regex,
    supervisor: Regex,
}

impl EmailPolicy {
    /// Build the policy for `domain`.
    pub fn new(domain: &str) -> Result<Self, AppError> {
        let domain = domain.trim().to_string();
        if domain.is_empty() {
            return Err(AppError::configuration("Registration email domain is empty"));
        }
        let escaped = regex::escape(&domain);
        let student = Regex::new(&format!(r"^[A-Za-z]+\.([0-9]+)@{escaped}$"))
            .map_err(|e| AppError::configuration(format!("Invalid student email pattern: {e}")))?;
        let supervisor = Regex::new(&format!(r"^[A-Za-z]+\.[A-Za-z]+@{escaped}$"))
            .map_err(|e| {
                AppError::configuration(format!("Invalid supervisor email pattern: {e}"))
            })?;
        Ok(Self {
            domain,
            student,
            supervisor,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Validate a student email and return the matriculation number in it.
    pub fn student_matric_no(&self, email: &str) -> Result<String, AppError> {
        self.student
            .captures(email)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Email must follow the format: name.matricno@{}",
                    self.domain
                ))
            })
    }

    /// Validate a supervisor email.
    pub fn check_supervisor(&self, email: &str) -> Result<(), AppError> {
        if self.supervisor.is_match(email) {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Email must follow the format: firstname.lastname@{}",
                self.domain
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::error::ErrorKind;

    fn policy() -> EmailPolicy {
        EmailPolicy::new("bouesti.edu.ng").unwrap()
    }

    #[test]
    fn test_student_matric_extracted() {
        assert_eq!(
            policy().student_matric_no("ada.2021001@bouesti.edu.ng").unwrap(),
            "2021001"
        );
    }

    #[test]
    fn test_student_rejects_other_shapes() {
        let policy = policy();
        for email in [
            "ada.lovelace@bouesti.edu.ng",
            "ada.2021001@example.com",
            "ada2021001@bouesti.edu.ng",
            "ada.2021001@bouestiXedu.ng",
        ] {
            let err = policy.student_matric_no(email).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "{email}");
        }
    }

    #[test]
    fn test_supervisor_shape() {
        let policy = policy();
        assert!(policy.check_supervisor("grace.hopper@bouesti.edu.ng").is_ok());
        assert!(policy.check_supervisor("grace.1906@bouesti.edu.ng").is_err());
        assert!(policy.check_supervisor("grace@bouesti.edu.ng").is_err());
    }

    #[test]
    fn test_empty_domain_rejected() {
        assert_eq!(
            EmailPolicy::new("  ").unwrap_err().kind,
            ErrorKind::Configuration
        );
    }
}
