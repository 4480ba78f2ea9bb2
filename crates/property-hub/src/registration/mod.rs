//! Sign-up form: field rules, role selection, and the post-registration redirect.

pub mod domain;
pub mod form;
pub mod role;
pub mod rules;
pub mod view;


pub use domain::{
    AccountRegistrar, RegisteredUser, RegistrarError, RegistrationInput, RegistrationResult,
    SessionState,
};
pub use form::{
    BusyFlag, Phase, RegistrationForm, SubmissionError, SubmissionErrorKind, SubmitOutcome,
};
pub use role::{Role, RoleRedirectMap, ROLE_REDIRECTS};
pub use rules::{validate, Field, FieldErrors, RegistrationValues};
pub use view::{FieldErrorMessages, RegistrationView, RoleOptionView, ViewState};
