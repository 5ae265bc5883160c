use super::{FieldErrors, Validate};

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Administrator password change form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordForm")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for PasswordForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }

        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(
                "newPassword",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        } else if self.new_password == self.current_password {
            errors.add("newPassword", "New password must differ from the current one");
        }

        if self.confirm_password != self.new_password {
            errors.add("confirmPassword", "Passwords do not match");
        }

        errors
    }
}
