use crate::error::AppError;
use crate::infra::{
    referer_path, safe_return_path, session_cookie, AppState, PortalState, SessionLookup,
};
use crate::pages::{
    render, DashboardPage, HomePage, NotFoundPage, PropertiesPage, RegisterPage,
};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Json, Router};
use property_hub::navigation::{paths, Navigation, RecordingNavigator};
use property_hub::not_found::NotFoundView;
use property_hub::registration::{RegistrationForm, SubmissionErrorKind, SubmitOutcome};
use property_hub::search::{
    DisplayMode, Location, PropertyType, QuickSelect, SearchCriteria, SearchFilterForm,
    SearchParams,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const SEARCH_SUBMIT: &str = "/properties/search";
const NAVIGATE_BACK: &str = "/navigate/back";

/// Search submission from either the main button or one of the quick-select chips.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchSubmission {
    #[serde(default)]
    pub(crate) query: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) property_type: Option<String>,
    #[serde(default)]
    pub(crate) location: Option<String>,
    #[serde(default)]
    pub(crate) quick_location: Option<String>,
    #[serde(default)]
    pub(crate) quick_type: Option<String>,
}

impl SearchSubmission {
    fn params(&self) -> SearchParams {
        SearchParams {
            query: self.query.clone(),
            property_type: self.property_type.clone(),
            location: self.location.clone(),
        }
    }

    fn quick_select(&self) -> Option<QuickSelect> {
        if let Some(location) = self.quick_location.as_deref().and_then(Location::parse) {
            return Some(QuickSelect::Location(location));
        }
        self.quick_type
            .as_deref()
            .and_then(PropertyType::parse)
            .map(QuickSelect::PropertyType)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RegistrationIntent {
    #[default]
    Submit,
    TogglePassword,
    ToggleConfirmPassword,
}

/// Raw sign-up form body. Checkboxes and hidden toggles arrive only when set.
#[derive(Default, Deserialize)]
pub(crate) struct RegistrationSubmission {
    #[serde(default)]
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default)]
    pub(crate) phone: String,
    #[serde(default)]
    pub(crate) password: String,
    #[serde(default)]
    pub(crate) confirm_password: String,
    #[serde(default)]
    pub(crate) accept_terms: Option<String>,
    #[serde(default)]
    pub(crate) show_password: Option<String>,
    #[serde(default)]
    pub(crate) show_confirm_password: Option<String>,
    #[serde(default)]
    pub(crate) intent: RegistrationIntent,
}

impl RegistrationSubmission {
    fn apply_to(self, form: &mut RegistrationForm) {
        form.set_role_value(&self.role);
        form.set_first_name(self.first_name);
        form.set_last_name(self.last_name);
        form.set_email(self.email);
        form.set_phone(self.phone);
        form.set_password(self.password);
        form.set_confirm_password(self.confirm_password);
        form.set_accept_terms(is_checked(self.accept_terms.as_deref()));
        if is_checked(self.show_password.as_deref()) {
            form.toggle_password_visibility();
        }
        if is_checked(self.show_confirm_password.as_deref()) {
            form.toggle_confirm_password_visibility();
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BackParams {
    #[serde(default)]
    pub(crate) to: Option<String>,
}

fn is_checked(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(raw) if !raw.is_empty() && raw != "0" && raw != "off")
}

pub(crate) fn portal_router(state: Arc<PortalState>) -> Router {
    Router::new()
        .route(paths::HOME, get(home_page))
        .route(paths::PROPERTIES, get(properties_page))
        .route(SEARCH_SUBMIT, axum::routing::post(search_submit))
        .route(paths::REGISTER, get(register_page).post(register_submit))
        .route(paths::ADMIN_DASHBOARD, get(admin_dashboard))
        .route(paths::AGENT_DASHBOARD, get(agent_dashboard))
        .route(paths::TENANT_DASHBOARD, get(tenant_dashboard))
        .route(NAVIGATE_BACK, get(navigate_back))
        .fallback(not_found_page)
        .with_state(state)
}

pub(crate) fn with_service_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn ignore_search(_criteria: SearchCriteria) {}

pub(crate) async fn home_page() -> Result<Html<String>, AppError> {
    let form = SearchFilterForm::new(SearchCriteria::default(), DisplayMode::Compact, ignore_search);
    render(&HomePage {
        search: form.view(),
    })
}

pub(crate) async fn properties_page(
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let criteria = SearchCriteria::from_params(&params);
    let summary = search_summary(&criteria);
    let form = SearchFilterForm::new(criteria, DisplayMode::Full, ignore_search);
    render(&PropertiesPage {
        search: form.view(),
        summary,
    })
}

pub(crate) async fn search_submit(
    Form(submission): Form<SearchSubmission>,
) -> Result<Redirect, AppError> {
    let initial = SearchCriteria::from_params(&submission.params());
    let mut emitted = None;
    {
        let mut form = SearchFilterForm::new(initial, DisplayMode::Full, |criteria: SearchCriteria| {
            emitted = Some(criteria)
        });
        match submission.quick_select() {
            Some(selection) => form.quick_select(selection),
            None => form.submit(),
        }
    }

    let criteria = emitted.unwrap_or_default();
    let query = criteria.to_query_string()?;
    let target = if query.is_empty() {
        paths::PROPERTIES.to_string()
    } else {
        format!("{}?{query}", paths::PROPERTIES)
    };
    Ok(Redirect::to(&target))
}

pub(crate) async fn register_page(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let form = state.registration_form();
    let session = state.session_for(&headers);
    let mut navigator = RecordingNavigator::default();
    if form.redirect_if_authenticated(&session, &mut navigator) {
        return Ok(navigation_response(&navigator, paths::HOME));
    }
    registration_page(&state, &form, StatusCode::OK)
}

pub(crate) async fn register_submit(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
    Form(submission): Form<RegistrationSubmission>,
) -> Result<Response, AppError> {
    let mut form = state.registration_form();
    let session = state.session_for(&headers);
    let mut navigator = RecordingNavigator::default();
    if form.redirect_if_authenticated(&session, &mut navigator) {
        return Ok(navigation_response(&navigator, paths::HOME));
    }

    let intent = submission.intent;
    submission.apply_to(&mut form);

    match intent {
        RegistrationIntent::TogglePassword => {
            form.toggle_password_visibility();
            return registration_page(&state, &form, StatusCode::OK);
        }
        RegistrationIntent::ToggleConfirmPassword => {
            form.toggle_confirm_password_visibility();
            return registration_page(&state, &form, StatusCode::OK);
        }
        RegistrationIntent::Submit => {}
    }

    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();
    let outcome = form
        .submit(state.registrar.as_ref(), &mut navigator, &cancel)
        .await;

    match outcome {
        SubmitOutcome::Redirected { user, .. } => {
            let mut response = navigation_response(&navigator, paths::HOME);
            if let Some(token) = user.session_token.as_deref() {
                let cookie = HeaderValue::from_str(&session_cookie(token))
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            Ok(response)
        }
        SubmitOutcome::Invalid(_) => {
            registration_page(&state, &form, StatusCode::UNPROCESSABLE_ENTITY)
        }
        SubmitOutcome::Failed(error) => {
            registration_page(&state, &form, failure_status(error.kind))
        }
        SubmitOutcome::Busy => registration_page(&state, &form, StatusCode::CONFLICT),
    }
}

fn failure_status(kind: SubmissionErrorKind) -> StatusCode {
    match kind {
        SubmissionErrorKind::Rejected => StatusCode::CONFLICT,
        SubmissionErrorKind::Unavailable | SubmissionErrorKind::Cancelled => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        SubmissionErrorKind::TimedOut => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn registration_page(
    state: &PortalState,
    form: &RegistrationForm,
    status: StatusCode,
) -> Result<Response, AppError> {
    let page = RegisterPage {
        view: form.view(),
        error_copy: state.registration.error_copy.clone(),
        login_href: paths::LOGIN,
        terms_href: paths::TERMS,
        privacy_href: paths::PRIVACY,
    };
    Ok((status, render(&page)?).into_response())
}

pub(crate) async fn admin_dashboard(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    dashboard("Admin Dashboard", &state.session_for(&headers))
}

pub(crate) async fn agent_dashboard(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    dashboard("Agent Dashboard", &state.session_for(&headers))
}

pub(crate) async fn tenant_dashboard(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    dashboard("Tenant Dashboard", &state.session_for(&headers))
}

fn dashboard(title: &'static str, session: &SessionLookup) -> Result<Html<String>, AppError> {
    let greeting = session
        .account()
        .map(|account| format!("Welcome, {}!", account.first_name))
        .unwrap_or_default();
    render(&DashboardPage { title, greeting })
}

/// Resolve the not-found page's "go back" against the page the visitor came from.
pub(crate) async fn navigate_back(Query(params): Query<BackParams>) -> Response {
    let back = params
        .to
        .as_deref()
        .and_then(safe_return_path)
        .unwrap_or(paths::HOME);
    let mut navigator = RecordingNavigator::default();
    NotFoundView::new().go_back(&mut navigator);
    navigation_response(&navigator, back)
}

pub(crate) async fn not_found_page(headers: HeaderMap) -> Result<Response, AppError> {
    let view = NotFoundView::new();
    let back_href = match referer_path(&headers) {
        Some(path) => format!(
            "{NAVIGATE_BACK}?{}",
            serde_urlencoded::to_string([("to", path.as_str())])?
        ),
        None => NAVIGATE_BACK.to_string(),
    };
    let page = NotFoundPage {
        view: view.view(),
        back_href,
    };
    Ok((StatusCode::NOT_FOUND, render(&page)?).into_response())
}

/// Turn the last navigation a component requested into a redirect.
fn navigation_response(navigator: &RecordingNavigator, back: &str) -> Response {
    match navigator.last() {
        Some(Navigation::To { path, .. }) => Redirect::to(path).into_response(),
        Some(Navigation::Back) => Redirect::to(back).into_response(),
        None => Redirect::to(paths::HOME).into_response(),
    }
}

fn search_summary(criteria: &SearchCriteria) -> String {
    if criteria.is_unconstrained() {
        return "Showing all properties".to_string();
    }

    let mut filters = Vec::with_capacity(3);
    if let Some(kind) = criteria.property_type {
        filters.push(format!("Type: {}", kind.long_label()));
    }
    if let Some(location) = criteria.location {
        filters.push(format!("Location: {}", location.name()));
    }
    let query = criteria.query.trim();
    if !query.is_empty() {
        filters.push(format!("Keyword: {query}"));
    }
    format!("Filters: {}", filters.join(" · "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use property_hub::config::RegistrationConfig;
    use tower::ServiceExt;

    const VALID_AGENT: &str = "role=agent&first_name=Wanjiru&last_name=Kamau\
        &email=wanjiru%40example.com&phone=%2B254712345678\
        &password=Passw0rdOK&confirm_password=Passw0rdOK&accept_terms=on&intent=submit";

    fn build_router() -> Router {
        let state = Arc::new(PortalState::in_memory(RegistrationConfig::default()));
        with_service_routes(portal_router(state))
    }

    fn form_post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request")
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn read_body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    fn location_header(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header")
    }

    #[tokio::test]
    async fn home_page_renders_compact_search_bar() {
        let response = build_router()
            .oneshot(get_request("/"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("search-form compact"));
        assert!(!body.contains("Popular Searches"));
    }

    #[tokio::test]
    async fn properties_page_seeds_form_from_query() {
        let response = build_router()
            .oneshot(get_request("/properties?type=house&location=mombasa&query=sea"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains(r#"<option value="house" selected>"#));
        assert!(body.contains(r#"<option value="mombasa" selected>"#));
        assert!(body.contains("Current Search:"));
        assert!(body.contains("Keyword: sea"));
    }

    #[tokio::test]
    async fn properties_page_treats_unknown_values_as_unconstrained() {
        let response = build_router()
            .oneshot(get_request("/properties?type=castle&location=atlantis"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains("Showing all properties"));
    }

    #[tokio::test]
    async fn search_submit_redirects_with_trimmed_criteria() {
        let response = build_router()
            .oneshot(form_post(
                SEARCH_SUBMIT,
                "query=++garden+flat++&type=apartment&location=",
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location_header(&response),
            "/properties?query=garden+flat&type=apartment"
        );
    }

    #[tokio::test]
    async fn quick_select_keeps_the_other_fields() {
        let response = build_router()
            .oneshot(form_post(
                SEARCH_SUBMIT,
                "query=garden&type=studio&location=nakuru&quick_location=kisumu",
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location_header(&response),
            "/properties?query=garden&type=studio&location=kisumu"
        );
    }

    #[tokio::test]
    async fn empty_search_goes_to_the_full_listing() {
        let response = build_router()
            .oneshot(form_post(SEARCH_SUBMIT, "query=+&type=&location="))
            .await
            .expect("router dispatch");

        assert_eq!(location_header(&response), "/properties");
    }

    #[tokio::test]
    async fn registration_redirects_agent_and_sets_session() {
        let router = build_router();

        let response = router
            .clone()
            .oneshot(form_post(paths::REGISTER, VALID_AGENT))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_header(&response), "/agent/dashboard");
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .expect("session cookie")
            .to_string();
        assert!(cookie.starts_with("ph_session="));

        let dashboard = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/agent/dashboard")
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(dashboard.status(), StatusCode::OK);
        assert!(read_body(dashboard).await.contains("Welcome, Wanjiru!"));

        let revisit = router
            .oneshot(
                Request::builder()
                    .uri(paths::REGISTER)
                    .header(header::COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(revisit.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_header(&revisit), "/");
    }

    #[tokio::test]
    async fn invalid_registration_rerenders_with_errors() {
        let response = build_router()
            .oneshot(form_post(
                paths::REGISTER,
                "role=tenant&first_name=A&last_name=Otieno&email=not-an-email\
                 &phone=0712&password=Passw0rdOK&confirm_password=Passw0rdXX",
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_body(response).await;
        assert!(body.contains("First name must be at least 2 characters"));
        assert!(body.contains("Invalid email address"));
        assert!(body.contains("Invalid phone number"));
        assert!(body.contains("Passwords do not match"));
        assert!(body.contains("You must accept the terms and conditions"));
    }

    #[tokio::test]
    async fn toggle_intent_reveals_password_without_submitting() {
        let response = build_router()
            .oneshot(form_post(
                paths::REGISTER,
                "role=seeker&password=secret&intent=toggle_password",
            ))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert!(body.contains(r#"type="text" name="password""#));
        assert!(body.contains(r#"type="password" name="confirm_password""#));
        assert!(!body.contains(r#"class="error-text""#));
    }

    #[tokio::test]
    async fn register_page_links_to_portal_routes() {
        let response = build_router()
            .oneshot(get_request(paths::REGISTER))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        for (path, escaped) in [
            (paths::LOGIN, "&#x2f;auth&#x2f;login"),
            (paths::TERMS, "&#x2f;terms"),
            (paths::PRIVACY, "&#x2f;privacy"),
        ] {
            let plain = format!(r#"href="{path}""#);
            let encoded = format!(r#"href="{escaped}""#);
            assert!(
                body.contains(&plain) || body.contains(&encoded),
                "missing link to {path}"
            );
        }
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_configured_copy() {
        let router = build_router();
        let first = router
            .clone()
            .oneshot(form_post(paths::REGISTER, VALID_AGENT))
            .await
            .expect("router dispatch");
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = router
            .oneshot(form_post(paths::REGISTER, VALID_AGENT))
            .await
            .expect("router dispatch");

        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = read_body(second).await;
        assert!(body.contains("We could not create your account right now. Please try again."));
        assert!(body.contains(r#"data-error="rejected""#));
    }

    #[tokio::test]
    async fn unknown_paths_render_not_found() {
        let response = build_router()
            .oneshot(get_request("/listings/does-not-exist"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_body(response).await;
        assert!(body.contains("Page Not Found"));
        assert!(body.contains("Go Back"));
        assert!(body.contains("Go Home"));
    }

    #[tokio::test]
    async fn navigate_back_only_follows_local_paths() {
        let router = build_router();

        let local = router
            .clone()
            .oneshot(get_request("/navigate/back?to=%2Fproperties%3Ftype%3Dhouse"))
            .await
            .expect("router dispatch");
        assert_eq!(location_header(&local), "/properties?type=house");

        for target in [
            "%2F%2Fevil.example",
            "%2F%09%2Fevil.example",
            "%2F%0A%2Fevil.example",
            "%2Fa%0Ab",
        ] {
            let external = router
                .clone()
                .oneshot(get_request(&format!("/navigate/back?to={target}")))
                .await
                .expect("router dispatch");
            assert_eq!(external.status(), StatusCode::SEE_OTHER, "target {target}");
            assert_eq!(location_header(&external), "/", "target {target}");
        }
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let response = build_router()
            .oneshot(get_request("/health"))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(read_body(response).await.contains("\"status\":\"ok\""));
    }
}
