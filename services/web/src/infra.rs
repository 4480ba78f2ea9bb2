use async_trait::async_trait;
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderMap};
use metrics_exporter_prometheus::PrometheusHandle;
use property_hub::config::RegistrationConfig;
use property_hub::registration::{
    AccountRegistrar, RegisteredUser, RegistrarError, RegistrationForm, RegistrationInput,
    RegistrationResult, Role, SessionState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub(crate) const SESSION_COOKIE: &str = "ph_session";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Collaborators shared by the portal pages.
pub(crate) struct PortalState {
    pub(crate) registrar: Arc<dyn AccountRegistrar>,
    pub(crate) sessions: Arc<SessionStore>,
    pub(crate) registration: RegistrationConfig,
}

impl PortalState {
    pub(crate) fn in_memory(registration: RegistrationConfig) -> Self {
        let sessions = Arc::new(SessionStore::default());
        let registrar = Arc::new(InMemoryAccountDirectory::new(sessions.clone()));
        Self {
            registrar,
            sessions,
            registration,
        }
    }

    pub(crate) fn registration_form(&self) -> RegistrationForm {
        RegistrationForm::new().with_timeout(self.registration.timeout)
    }

    pub(crate) fn session_for(&self, headers: &HeaderMap) -> SessionLookup {
        SessionLookup(
            session_token(headers).and_then(|token| self.sessions.lookup(&token)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionAccount {
    pub(crate) account_id: String,
    pub(crate) first_name: String,
    pub(crate) role: Role,
}

/// Sessions live for the lifetime of the process; nothing expires or evicts them.
#[derive(Default)]
pub(crate) struct SessionStore {
    sessions: Mutex<HashMap<String, SessionAccount>>,
}

impl SessionStore {
    pub(crate) fn create(&self, account: SessionAccount) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(token.clone(), account);
        token
    }

    pub(crate) fn lookup(&self, token: &str) -> Option<SessionAccount> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get(token).cloned()
    }
}

/// Session resolved from the request cookie, if any.
#[derive(Debug, Clone)]
pub(crate) struct SessionLookup(pub(crate) Option<SessionAccount>);

impl SessionLookup {
    pub(crate) fn account(&self) -> Option<&SessionAccount> {
        self.0.as_ref()
    }
}

impl SessionState for SessionLookup {
    fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    id: String,
    role: Role,
    first_name: String,
}

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> String {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("acct-{id:06}")
}

/// Stand-in auth provider keeping accounts in memory, keyed by lower-cased email.
/// Accounts are held for the lifetime of the process.
pub(crate) struct InMemoryAccountDirectory {
    accounts: Mutex<HashMap<String, StoredAccount>>,
    sessions: Arc<SessionStore>,
}

impl InMemoryAccountDirectory {
    pub(crate) fn new(sessions: Arc<SessionStore>) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            sessions,
        }
    }

    #[cfg(test)]
    pub(crate) fn account_count(&self) -> usize {
        self.accounts.lock().expect("account mutex poisoned").len()
    }
}

#[async_trait]
impl AccountRegistrar for InMemoryAccountDirectory {
    async fn register(
        &self,
        input: &RegistrationInput,
        cancel: &CancellationToken,
    ) -> Result<RegistrationResult, RegistrarError> {
        if cancel.is_cancelled() {
            return Err(RegistrarError::Cancelled);
        }

        let email = input.email.trim().to_ascii_lowercase();
        let account = {
            let mut guard = self
                .accounts
                .lock()
                .map_err(|_| RegistrarError::Unavailable("account directory poisoned".into()))?;
            if guard.contains_key(&email) {
                return Err(RegistrarError::Rejected("email already registered".into()));
            }
            let account = StoredAccount {
                id: next_account_id(),
                role: input.role,
                first_name: input.first_name.clone(),
            };
            guard.insert(email, account.clone());
            account
        };

        tracing::debug!(account_id = %account.id, role = %account.role, "account created");

        let token = self.sessions.create(SessionAccount {
            account_id: account.id.clone(),
            first_name: account.first_name.clone(),
            role: account.role,
        });

        Ok(RegistrationResult::accepted(RegisteredUser {
            id: account.id,
            role: account.role.as_str().to_string(),
            first_name: account.first_name,
            session_token: Some(token),
        }))
    }
}

pub(crate) fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// Same-site path to return to, or `None` for anything that could leave the site.
pub(crate) fn safe_return_path(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    if raw
        .chars()
        .any(|c| c.is_control() || c.is_whitespace() || c == '\\')
    {
        return None;
    }
    let parsed: PathAndQuery = raw.parse().ok()?;
    let path = parsed.path();
    let is_local = raw.starts_with('/') && path.starts_with('/') && !path.starts_with("//");
    is_local.then_some(raw)
}

/// Path component of a `Referer` header.
pub(crate) fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let path = match referer.split_once("://") {
        Some((_, rest)) => &rest[rest.find('/')?..],
        None => referer,
    };
    safe_return_path(path).map(str::to_string)
}
