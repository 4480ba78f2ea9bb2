use crate::error::AppError;
use askama::Template;
use axum::response::Html;
use property_hub::not_found::NotFoundViewModel;
use property_hub::registration::RegistrationView;
use property_hub::search::SearchFormView;

#[derive(Template)]
#[template(path = "home.html")]
pub(crate) struct HomePage {
    pub(crate) search: SearchFormView,
}

#[derive(Template)]
#[template(path = "properties.html")]
pub(crate) struct PropertiesPage {
    pub(crate) search: SearchFormView,
    pub(crate) summary: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub(crate) struct RegisterPage {
    pub(crate) view: RegistrationView,
    pub(crate) error_copy: String,
    pub(crate) login_href: &'static str,
    pub(crate) terms_href: &'static str,
    pub(crate) privacy_href: &'static str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub(crate) struct DashboardPage {
    pub(crate) title: &'static str,
    pub(crate) greeting: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub(crate) struct NotFoundPage {
    pub(crate) view: NotFoundViewModel,
    pub(crate) back_href: String,
}

pub(crate) fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}
