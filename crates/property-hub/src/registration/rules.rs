use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::domain::RegistrationInput;
use super::role::Role;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\S+@\S+$").expect("email pattern compiles"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern compiles"));

/// Input fields of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Role,
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    AcceptTerms,
}

/// First failing rule message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    fn record(&mut self, field: Field, message: Option<&'static str>) {
        if let Some(message) = message {
            self.0.insert(field, message);
        }
    }
}

/// Raw, unvalidated form values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationValues {
    pub role: Option<Role>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl std::fmt::Debug for RegistrationValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationValues")
            .field("role", &self.role)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("accept_terms", &self.accept_terms)
            .finish_non_exhaustive()
    }
}

enum Rule<'a> {
    Required(&'static str),
    MinLength(usize, &'static str),
    Pattern(&'static Lazy<Regex>, &'static str),
    MixedCaseAndDigit(&'static str),
    Equals(&'a str, &'static str),
}

impl Rule<'_> {
    fn check(&self, value: &str) -> Option<&'static str> {
        match self {
            Rule::Required(message) => value.trim().is_empty().then_some(*message),
            Rule::MinLength(min, message) => (value.chars().count() < *min).then_some(*message),
            Rule::Pattern(pattern, message) => (!pattern.is_match(value)).then_some(*message),
            Rule::MixedCaseAndDigit(message) => {
                let lower = value.chars().any(|c| c.is_ascii_lowercase());
                let upper = value.chars().any(|c| c.is_ascii_uppercase());
                let digit = value.chars().any(|c| c.is_ascii_digit());
                (!(lower && upper && digit)).then_some(*message)
            }
            Rule::Equals(other, message) => (value != *other).then_some(*message),
        }
    }
}

fn first_failure(value: &str, rules: &[Rule<'_>]) -> Option<&'static str> {
    rules.iter().find_map(|rule| rule.check(value))
}

fn name_rules(required: &'static str, too_short: &'static str) -> [Rule<'static>; 2] {
    [Rule::Required(required), Rule::MinLength(2, too_short)]
}

/// Evaluate every field rule; all fields are checked so each can show its own error.
pub fn validate(values: &RegistrationValues) -> Result<RegistrationInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    if values.role.is_none() {
        errors.record(Field::Role, Some("Please select your role"));
    }
    errors.record(
        Field::FirstName,
        first_failure(
            &values.first_name,
            &name_rules(
                "First name is required",
                "First name must be at least 2 characters",
            ),
        ),
    );
    errors.record(
        Field::LastName,
        first_failure(
            &values.last_name,
            &name_rules(
                "Last name is required",
                "Last name must be at least 2 characters",
            ),
        ),
    );
    errors.record(
        Field::Email,
        first_failure(
            &values.email,
            &[
                Rule::Required("Email is required"),
                Rule::Pattern(&EMAIL_PATTERN, "Invalid email address"),
            ],
        ),
    );
    errors.record(
        Field::Phone,
        first_failure(
            &values.phone,
            &[
                Rule::Required("Phone number is required"),
                Rule::Pattern(&PHONE_PATTERN, "Invalid phone number"),
            ],
        ),
    );
    errors.record(
        Field::Password,
        first_failure(
            &values.password,
            &[
                Rule::Required("Password is required"),
                Rule::MinLength(8, "Password must be at least 8 characters"),
                Rule::MixedCaseAndDigit("Password must contain uppercase, lowercase, and number"),
            ],
        ),
    );
    errors.record(
        Field::ConfirmPassword,
        first_failure(
            &values.confirm_password,
            &[
                Rule::Required("Please confirm your password"),
                Rule::Equals(&values.password, "Passwords do not match"),
            ],
        ),
    );
    if !values.accept_terms {
        errors.record(
            Field::AcceptTerms,
            Some("You must accept the terms and conditions"),
        );
    }

    match values.role {
        Some(role) if errors.is_empty() => Ok(RegistrationInput {
            role,
            first_name: values.first_name.trim().to_string(),
            last_name: values.last_name.trim().to_string(),
            email: values.email.clone(),
            phone: values.phone.clone(),
            password: values.password.clone(),
            confirm_password: values.confirm_password.clone(),
            accept_terms: values.accept_terms,
        }),
        _ => Err(errors),
    }
}
