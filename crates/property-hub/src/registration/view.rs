use std::fmt;

use serde::Serialize;

use super::form::{Phase, RegistrationForm, SubmissionError};
use super::role::Role;
use super::rules::{Field, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    Submitting,
    Redirected,
    Error,
}

impl ViewState {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Submitting => "submitting",
            ViewState::Redirected => "redirected",
            ViewState::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

/// Inline error per field, `None` when the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrorMessages {
    pub role: Option<&'static str>,
    pub first_name: Option<&'static str>,
    pub last_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
    pub accept_terms: Option<&'static str>,
}

impl From<&FieldErrors> for FieldErrorMessages {
    fn from(errors: &FieldErrors) -> Self {
        Self {
            role: errors.get(Field::Role),
            first_name: errors.get(Field::FirstName),
            last_name: errors.get(Field::LastName),
            email: errors.get(Field::Email),
            phone: errors.get(Field::Phone),
            password: errors.get(Field::Password),
            confirm_password: errors.get(Field::ConfirmPassword),
            accept_terms: errors.get(Field::AcceptTerms),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationView {
    pub state: ViewState,
    pub role_options: Vec<RoleOptionView>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub accept_terms: bool,
    pub show_password: bool,
    pub show_confirm_password: bool,
    pub password_input_type: &'static str,
    pub confirm_password_input_type: &'static str,
    pub errors: FieldErrorMessages,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    pub error: Option<SubmissionError>,
    pub redirect_to: Option<&'static str>,
}

impl fmt::Debug for RegistrationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationView")
            .field("state", &self.state)
            .field("email", &self.email)
            .field("errors", &self.errors)
            .field("submit_disabled", &self.submit_disabled)
            .field("error", &self.error)
            .field("redirect_to", &self.redirect_to)
            .finish_non_exhaustive()
    }
}

impl RegistrationView {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

pub(super) fn render(form: &RegistrationForm) -> RegistrationView {
    match form.phase() {
        Phase::Idle { error: None } => idle(form),
        Phase::Idle { error: Some(error) } => failed(form, error),
        Phase::Submitting => submitting(form),
        Phase::Redirected { path } => redirected(form, path),
    }
}

fn idle(form: &RegistrationForm) -> RegistrationView {
    base(form, ViewState::Idle)
}

fn failed(form: &RegistrationForm, error: SubmissionError) -> RegistrationView {
    RegistrationView {
        error: Some(error),
        ..base(form, ViewState::Error)
    }
}

fn submitting(form: &RegistrationForm) -> RegistrationView {
    RegistrationView {
        submit_label: "Creating account...",
        submit_disabled: true,
        ..base(form, ViewState::Submitting)
    }
}

fn redirected(form: &RegistrationForm, path: &'static str) -> RegistrationView {
    RegistrationView {
        password: String::new(),
        confirm_password: String::new(),
        submit_disabled: true,
        redirect_to: Some(path),
        ..base(form, ViewState::Redirected)
    }
}

fn base(form: &RegistrationForm, state: ViewState) -> RegistrationView {
    let values = form.values();
    let selected = form.selected_role();
    RegistrationView {
        state,
        role_options: Role::ALL
            .into_iter()
            .map(|role| RoleOptionView {
                value: role.as_str(),
                label: role.label(),
                description: role.description(),
                selected: selected == Some(role),
            })
            .collect(),
        first_name: values.first_name.clone(),
        last_name: values.last_name.clone(),
        email: values.email.clone(),
        phone: values.phone.clone(),
        password: values.password.clone(),
        confirm_password: values.confirm_password.clone(),
        accept_terms: values.accept_terms,
        show_password: form.show_password(),
        show_confirm_password: form.show_confirm_password(),
        password_input_type: input_type(form.show_password()),
        confirm_password_input_type: input_type(form.show_confirm_password()),
        errors: FieldErrorMessages::from(form.errors()),
        submit_label: "Create Account",
        submit_disabled: form.is_busy(),
        error: None,
        redirect_to: None,
    }
}

fn input_type(visible: bool) -> &'static str {
    if visible {
        "text"
    } else {
        "password"
    }
}
