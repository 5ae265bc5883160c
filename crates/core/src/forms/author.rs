use crate::types::AuthorId;

use super::{FieldErrors, Validate, is_blank};

/// Author create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorForm {
    /// `Some` when editing an existing author.
    pub id: Option<AuthorId>,
    pub name: String,
    pub biography: String,
    pub nationality: String,
}

impl Validate for AuthorForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if is_blank(&self.name) {
            errors.add("name", "Author name is required");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_name_is_required() {
        let form = AuthorForm {
            name: "Assia Djebar".to_string(),
            ..AuthorForm::default()
        };
        assert!(form.validate().is_empty());
        assert!(AuthorForm::default().validate().has("name"));
    }
}
