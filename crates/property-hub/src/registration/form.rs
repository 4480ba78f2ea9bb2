use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::domain::{
    AccountRegistrar, RegisteredUser, RegistrarError, RegistrationInput, RegistrationResult,
    SessionState,
};
use super::role::{Role, RoleRedirectMap, ROLE_REDIRECTS};
use super::rules::{self, FieldErrors, RegistrationValues};
use super::view::{self, RegistrationView};
use crate::navigation::{paths, NavigateOptions, Navigator};

/// Shared flag that is set only while a registrar call is pending.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionErrorKind {
    Rejected,
    Unavailable,
    Cancelled,
    TimedOut,
}

impl SubmissionErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            SubmissionErrorKind::Rejected => "rejected",
            SubmissionErrorKind::Unavailable => "unavailable",
            SubmissionErrorKind::Cancelled => "cancelled",
            SubmissionErrorKind::TimedOut => "timed_out",
        }
    }
}

/// Failure surfaced to the user after a submission. Copy is supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionError {
    pub kind: SubmissionErrorKind,
}

impl SubmissionError {
    pub fn new(kind: SubmissionErrorKind) -> Self {
        Self { kind }
    }
}

impl From<&RegistrarError> for SubmissionError {
    fn from(value: &RegistrarError) -> Self {
        let kind = match value {
            RegistrarError::Rejected(_) => SubmissionErrorKind::Rejected,
            RegistrarError::Unavailable(_) => SubmissionErrorKind::Unavailable,
            RegistrarError::Cancelled => SubmissionErrorKind::Cancelled,
        };
        Self::new(kind)
    }
}

/// Per-submission lifecycle: Idle -> Submitting -> Redirected | Idle with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle { error: Option<SubmissionError> },
    Submitting,
    Redirected { path: &'static str },
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; the registrar was not called.
    Invalid(FieldErrors),
    /// A submission is already in flight.
    Busy,
    Redirected {
        path: &'static str,
        user: RegisteredUser,
    },
    Failed(SubmissionError),
}

/// Registration form state holder.
#[derive(Debug)]
pub struct RegistrationForm {
    values: RegistrationValues,
    show_password: bool,
    show_confirm_password: bool,
    errors: FieldErrors,
    phase: Phase,
    busy: BusyFlag,
    redirects: RoleRedirectMap,
    timeout: Option<Duration>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            values: RegistrationValues {
                role: Some(Role::default()),
                ..RegistrationValues::default()
            },
            show_password: false,
            show_confirm_password: false,
            errors: FieldErrors::default(),
            phase: Phase::Idle { error: None },
            busy: BusyFlag::default(),
            redirects: ROLE_REDIRECTS,
            timeout: None,
        }
    }

    /// Give up on the registrar after `timeout` and surface a timed-out error.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Share a busy flag with other forms so only one of them can submit at a time.
    pub fn with_busy_flag(mut self, busy: BusyFlag) -> Self {
        self.busy = busy;
        self
    }

    pub fn with_redirects(mut self, redirects: RoleRedirectMap) -> Self {
        self.redirects = redirects;
        self
    }

    pub fn values(&self) -> &RegistrationValues {
        &self.values
    }

    pub fn selected_role(&self) -> Option<Role> {
        self.values.role
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn show_password(&self) -> bool {
        self.show_password
    }

    pub fn show_confirm_password(&self) -> bool {
        self.show_confirm_password
    }

    pub fn select_role(&mut self, role: Role) {
        self.values.role = Some(role);
    }

    /// Set the role from a raw value; unknown values leave the form without a role.
    pub fn set_role_value(&mut self, value: &str) {
        self.values.role = Role::parse(value);
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.values.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.values.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.values.email = value.into();
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.values.phone = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.values.password = value.into();
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.values.confirm_password = value.into();
    }

    pub fn set_accept_terms(&mut self, accepted: bool) {
        self.values.accept_terms = accepted;
    }

    pub fn toggle_password_visibility(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn toggle_confirm_password_visibility(&mut self) {
        self.show_confirm_password = !self.show_confirm_password;
    }

    /// Run the field rules and keep the resulting errors for rendering.
    pub fn validate(&mut self) -> Result<RegistrationInput, FieldErrors> {
        let result = rules::validate(&self.values);
        self.errors = match &result {
            Ok(_) => FieldErrors::default(),
            Err(errors) => errors.clone(),
        };
        result
    }

    /// Send already-signed-in visitors home instead of showing the form.
    pub fn redirect_if_authenticated<S, N>(&self, session: &S, navigator: &mut N) -> bool
    where
        S: SessionState + ?Sized,
        N: Navigator + ?Sized,
    {
        if !session.is_authenticated() {
            return false;
        }
        debug!("visitor already authenticated, leaving registration");
        navigator.navigate_to(paths::HOME, NavigateOptions::replace());
        true
    }

    pub async fn submit<R, N>(
        &mut self,
        registrar: &R,
        navigator: &mut N,
        cancel: &CancellationToken,
    ) -> SubmitOutcome
    where
        R: AccountRegistrar + ?Sized,
        N: Navigator + ?Sized,
    {
        if self.busy.is_set() {
            warn!("registration already in flight, ignoring submit");
            return SubmitOutcome::Busy;
        }

        let input = match self.validate() {
            Ok(input) => input,
            Err(errors) => {
                debug!(fields = errors.len(), "registration blocked by validation");
                self.phase = Phase::Idle { error: None };
                return SubmitOutcome::Invalid(errors);
            }
        };

        let timeout = self.timeout;
        let redirects = self.redirects;
        let Some(submission) = Submission::begin(&self.busy, &mut self.phase) else {
            return SubmitOutcome::Busy;
        };

        let outcome = match call_registrar(registrar, &input, cancel, timeout).await {
            Ok(RegistrationResult {
                success: true,
                user: Some(user),
            }) => {
                let path = redirects.resolve(&user.role);
                info!(user_id = %user.id, role = %user.role, path, "registration succeeded");
                navigator.navigate_to(path, NavigateOptions::replace());
                SubmitOutcome::Redirected { path, user }
            }
            Ok(RegistrationResult { success: true, .. }) => {
                warn!("registration reported success without a user");
                SubmitOutcome::Failed(SubmissionError::new(SubmissionErrorKind::Unavailable))
            }
            Ok(_) => {
                warn!("registration declined by provider");
                SubmitOutcome::Failed(SubmissionError::new(SubmissionErrorKind::Rejected))
            }
            Err(error) => SubmitOutcome::Failed(error),
        };

        submission.finish(match &outcome {
            SubmitOutcome::Redirected { path, .. } => Phase::Redirected { path: *path },
            SubmitOutcome::Failed(error) => Phase::Idle {
                error: Some(*error),
            },
            SubmitOutcome::Invalid(_) | SubmitOutcome::Busy => Phase::Idle { error: None },
        });
        outcome
    }

    pub fn view(&self) -> RegistrationView {
        view::render(self)
    }
}

async fn call_registrar<R>(
    registrar: &R,
    input: &RegistrationInput,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Result<RegistrationResult, SubmissionError>
where
    R: AccountRegistrar + ?Sized,
{
    let call_token = cancel.child_token();
    let call = async {
        tokio::select! {
            biased;
            _ = call_token.cancelled() => Err(RegistrarError::Cancelled),
            result = registrar.register(input, &call_token) => result,
        }
    };

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                call_token.cancel();
                warn!(timeout_ms = limit.as_millis() as u64, "registration timed out");
                return Err(SubmissionError::new(SubmissionErrorKind::TimedOut));
            }
        },
        None => call.await,
    };

    result.map_err(|error| {
        warn!(%error, "registration failed");
        SubmissionError::from(&error)
    })
}

/// Holds the busy flag for one registrar call and restores the phase if dropped mid-call.
struct Submission<'a> {
    busy: &'a BusyFlag,
    phase: &'a mut Phase,
}

impl<'a> Submission<'a> {
    fn begin(busy: &'a BusyFlag, phase: &'a mut Phase) -> Option<Self> {
        if !busy.try_acquire() {
            return None;
        }
        *phase = Phase::Submitting;
        Some(Self { busy, phase })
    }

    fn finish(mut self, next: Phase) {
        *self.phase = next;
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if matches!(self.phase, Phase::Submitting) {
            *self.phase = Phase::Idle {
                error: Some(SubmissionError::new(SubmissionErrorKind::Cancelled)),
            };
        }
        self.busy.clear();
    }
}
