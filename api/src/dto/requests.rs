use async_graphql::InputObject;
use validator::{Validate, ValidationErrors};

use super::FieldError;

#[derive(Debug, Validate, InputObject)]
pub struct RegisterInput {
    #[validate(length(min = 6, message = "Username must be at least 6 characters."))]
    pub username: String,
    #[validate(contains(pattern = "@", message = "Email is not valid."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Validate, InputObject)]
pub struct PostInput {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    #[validate(length(min = 1, message = "Content is required."))]
    pub body: String,
}

/// Runs the input's rules and reports every failing field, sorted by field name.
pub fn field_errors<T: Validate>(input: &T) -> Option<Vec<FieldError>> {
    input.validate().err().map(|errors| to_field_errors(&errors))
}

fn to_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            let field = field.to_string();
            failures.iter().map(move |failure| FieldError {
                field: field.clone(),
                message: failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| failure.code.to_string()),
            })
        })
        .collect();

    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}
