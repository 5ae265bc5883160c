use crate::types::Email;

use super::{FieldErrors, ImageSelection, Validate, is_blank, is_mobile_number};

/// Administrator profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Optional; validated only when filled in.
    pub phone: String,
    pub picture: ImageSelection,
}

impl Validate for ProfileForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if is_blank(&self.first_name) {
            errors.add("firstName", "First name is required");
        }
        if is_blank(&self.last_name) {
            errors.add("lastName", "Last name is required");
        }

        if let Err(e) = Email::parse(&self.email) {
            errors.add("email", format!("Invalid email: {e}"));
        }

        if !is_blank(&self.phone) && !is_mobile_number(&self.phone) {
            errors.add("phone", "Phone number must be 10 digits starting with 05, 06 or 07");
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileForm {
        ProfileForm {
            first_name: "Karim".to_string(),
            last_name: "Haddad".to_string(),
            email: "karim@bookshelf.dz".to_string(),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn test_phone_is_optional() {
        assert!(profile().validate().is_empty());
    }

    #[test]
    fn test_phone_checked_when_present() {
        let form = ProfileForm {
            phone: "0123".to_string(),
            ..profile()
        };
        assert!(form.validate().has("phone"));
    }

    #[test]
    fn test_email_error_carries_reason() {
        let form = ProfileForm {
            email: "karim".to_string(),
            ..profile()
        };
        assert_eq!(
            form.validate().get("email"),
            Some("Invalid email: email must look like name@domain")
        );
    }
}
