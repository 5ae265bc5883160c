use crate::types::Email;

use super::{FieldErrors, Validate, is_blank};

const MIN_MESSAGE_LENGTH: usize = 10;

/// Public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.name) {
            errors.add("name", "Name is required");
        }
        if Email::parse(&self.email).is_err() {
            errors.add("email", "A valid email is required");
        }
        if self.message.trim().chars().count() < MIN_MESSAGE_LENGTH {
            errors.add(
                "message",
                format!("Message must be at least {MIN_MESSAGE_LENGTH} characters"),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_rules() {
        let form = ContactForm {
            name: "Lina".to_string(),
            email: "lina@example.com".to_string(),
            subject: String::new(),
            message: "Do you ship to Oran?".to_string(),
        };
        assert!(form.validate().is_empty());

        let errors = ContactForm::default().validate();
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("message"));
        assert!(!errors.has("subject"));
    }
}
