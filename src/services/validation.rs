//! Form validation
//!
//! Each HTML form has a raw form type (what the browser posts) and a
//! validator that turns it into a typed input or a set of [`FormErrors`]
//! to re-render the form with.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::CreateUserInput;

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").ok()
});

/// Field-level and form-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormErrors {
    /// Messages keyed by form field name
    pub fields: BTreeMap<String, Vec<String>>,
    /// Messages not tied to a single field
    pub form: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error not tied to a field, e.g. "Invalid credentials"
    pub fn form_error(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.form.push(message.into());
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.form.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if !is_valid_email(email) {
        errors.add("email", "Invalid email address");
    }
}

fn check_password(errors: &mut FormErrors, field: &str, password: &str, message: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, message);
    }
}

/// Login form as posted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Validated credentials
#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub fn validate_login(form: &LoginForm) -> Result<LoginInput, FormErrors> {
    let mut errors = FormErrors::new();
    let email = form.email.trim();

    check_email(&mut errors, email);
    check_password(
        &mut errors,
        "password",
        &form.password,
        "Password must be at least 8 characters",
    );

    errors.into_result(LoginInput {
        email: email.to_string(),
        password: form.password.clone(),
    })
}

/// Signup form as posted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

pub fn validate_signup(form: &SignupForm) -> Result<CreateUserInput, FormErrors> {
    let mut errors = FormErrors::new();
    let name = form.name.trim();
    let email = form.email.trim();

    if name.is_empty() {
        errors.add("name", "Name is required");
    }
    check_email(&mut errors, email);
    check_password(
        &mut errors,
        "password",
        &form.password,
        "Password must be at least 8 characters",
    );
    check_password(
        &mut errors,
        "confirmPassword",
        &form.confirm_password,
        "Please confirm your password",
    );
    if form.password != form.confirm_password {
        errors.add("confirmPassword", "Passwords don't match");
    }

    errors.into_result(CreateUserInput {
        name: name.to_string(),
        email: email.to_string(),
        password: form.password.clone(),
    })
}

/// New/edit todo form as posted.
///
/// Built from raw key/value pairs because the category checkboxes repeat
/// the `categories` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub completed: bool,
}

impl TodoForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value.clone(),
                "description" => form.description = value.clone(),
                "categories" => form.categories.push(value.clone()),
                "completed" => form.completed = is_checked(value),
                _ => {}
            }
        }
        form
    }
}

/// Checkbox and hidden-input truthiness
pub fn is_checked(value: &str) -> bool {
    matches!(value, "true" | "on" | "1")
}

/// Validated todo fields
#[derive(Debug, Clone, PartialEq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub category_ids: Vec<i64>,
    pub completed: bool,
}

pub fn validate_todo(form: &TodoForm) -> Result<TodoDraft, FormErrors> {
    let mut errors = FormErrors::new();
    let title = form.title.trim();
    if title.is_empty() {
        errors.add("title", "Title is required");
    }

    let description = Some(form.description.trim())
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let mut category_ids = Vec::with_capacity(form.categories.len());
    for raw in &form.categories {
        match raw.trim().parse::<i64>() {
            Ok(id) if !category_ids.contains(&id) => category_ids.push(id),
            Ok(_) => {}
            Err(_) => {
                errors.add("categories", "Invalid category");
                break;
            }
        }
    }

    errors.into_result(TodoDraft {
        title: title.to_string(),
        description,
        category_ids,
        completed: form.completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// First message recorded for a field
    fn first<'a>(errors: &'a FormErrors, field: &str) -> Option<&'a str> {
        errors
            .fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn signup(name: &str, email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("al ice@example.com"));
    }

    #[test]
    fn test_valid_login() {
        let form = LoginForm {
            email: " alice@example.com ".to_string(),
            password: "password123".to_string(),
        };
        let input = validate_login(&form).unwrap();
        assert_eq!(input.email, "alice@example.com");
        assert_eq!(input.password, "password123");
    }

    #[test]
    fn test_login_errors() {
        let form = LoginForm {
            email: "nope".to_string(),
            password: "short".to_string(),
        };
        let errors = validate_login(&form).unwrap_err();
        assert_eq!(first(&errors, "email"), Some("Invalid email address"));
        assert_eq!(
            first(&errors, "password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_valid_signup() {
        let input =
            validate_signup(&signup("Alice", "alice@example.com", "password123", "password123"))
                .unwrap();
        assert_eq!(input.name, "Alice");
        assert_eq!(input.email, "alice@example.com");
    }

    #[test]
    fn test_signup_requires_name() {
        let errors =
            validate_signup(&signup("  ", "alice@example.com", "password123", "password123"))
                .unwrap_err();
        assert_eq!(first(&errors, "name"), Some("Name is required"));
        assert_eq!(errors.fields.len(), 1);
    }

    #[test]
    fn test_signup_password_mismatch_on_confirm_field() {
        let errors =
            validate_signup(&signup("Alice", "alice@example.com", "password123", "password124"))
                .unwrap_err();
        assert_eq!(first(&errors, "confirmPassword"), Some("Passwords don't match"));
        assert!(first(&errors, "password").is_none());
    }

    #[test]
    fn test_signup_short_confirmation() {
        let errors = validate_signup(&signup("Alice", "alice@example.com", "password123", "pw"))
            .unwrap_err();
        let messages = &errors.fields["confirmPassword"];
        assert!(messages.contains(&"Please confirm your password".to_string()));
        assert!(messages.contains(&"Passwords don't match".to_string()));
    }

    #[test]
    fn test_todo_form_collects_repeated_categories() {
        let form = TodoForm::from_pairs(&pairs(&[
            ("title", "Buy milk"),
            ("description", ""),
            ("categories", "2"),
            ("categories", "4"),
            ("ignored", "x"),
        ]));
        assert_eq!(form.categories, vec!["2", "4"]);
        assert!(!form.completed);
    }

    #[test]
    fn test_validate_todo() {
        let form = TodoForm::from_pairs(&pairs(&[
            ("title", "  Buy milk "),
            ("description", "   "),
            ("categories", "3"),
            ("categories", "3"),
            ("completed", "on"),
        ]));
        let draft = validate_todo(&form).unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, None);
        assert_eq!(draft.category_ids, vec![3]);
        assert!(draft.completed);
    }

    #[test]
    fn test_validate_todo_errors() {
        let form = TodoForm::from_pairs(&pairs(&[("title", ""), ("categories", "abc")]));
        let errors = validate_todo(&form).unwrap_err();
        assert_eq!(first(&errors, "title"), Some("Title is required"));
        assert_eq!(first(&errors, "categories"), Some("Invalid category"));
    }

    #[test]
    fn test_form_error() {
        let errors = FormErrors::form_error("Invalid credentials");
        assert!(!errors.is_empty());
        assert_eq!(errors.form, vec!["Invalid credentials"]);
    }

    proptest! {
        #[test]
        fn property_short_passwords_rejected(password in "[a-zA-Z0-9]{0,7}") {
            let form = LoginForm { email: "a@example.com".to_string(), password };
            let errors = validate_login(&form).unwrap_err();
            prop_assert!(first(&errors, "password").is_some());
            prop_assert!(first(&errors, "email").is_none());
        }

        #[test]
        fn property_matching_passwords_accepted(password in "[a-zA-Z0-9]{8,30}") {
            let form = signup("Bob", "bob@example.com", &password, &password);
            prop_assert!(validate_signup(&form).is_ok());
        }
    }
}
