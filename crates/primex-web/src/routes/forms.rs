use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use primex_core::dashboard::{self, RECENT_DESIGNS, RECENT_EVENTS};
use primex_core::error::PrimexError;
use primex_core::forms::{EventForm, FormState, GraphicDesignForm, WebProjectForm};
use primex_core::model::{DESIGN_CATEGORIES, EVENT_CATEGORIES, TECHNOLOGIES};
use primex_core::remote::RemoteOutcome;

use crate::error::AppError;
use crate::session::AdminPage;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/add-web-project",
            get(web_project_page).post(submit_web_project),
        )
        .route("/add-event", get(event_page).post(event_action))
        .route(
            "/add-graphic-design",
            get(graphic_design_page).post(submit_graphic_design),
        )
}

type Pairs = Vec<(String, String)>;

/// Page messages shared by the three forms.
#[derive(Default)]
struct Notice {
    success: Option<String>,
    error: Option<String>,
}

impl Notice {
    fn success(message: String) -> Self {
        Self {
            success: Some(message),
            error: None,
        }
    }

    fn error(err: &PrimexError) -> Self {
        Self {
            success: None,
            error: Some(err.to_string()),
        }
    }

    fn status(&self) -> StatusCode {
        if self.error.is_some() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::OK
        }
    }
}

/// Apply posted pairs to a blank form. Fields the form does not know are
/// dropped so the rest of the input survives a re-render.
fn fill_form<F: FormState>(pairs: Pairs) -> F {
    let mut form = F::default();
    for (name, value) in pairs {
        if let Err(e) = form.set_field(&name, &value) {
            tracing::debug!(field = %name, error = %e, "ignoring posted field");
        }
    }
    form
}

/// Split off the `action` value posted by the clicked button.
fn take_action(pairs: Pairs) -> (Option<String>, Pairs) {
    let (actions, fields): (Pairs, Pairs) = pairs.into_iter().partition(|(k, _)| k == "action");
    (actions.into_iter().next().map(|(_, v)| v), fields)
}

struct CategoryOption {
    name: &'static str,
    selected: bool,
}

fn category_options(all: &[&'static str], current: &str) -> Vec<CategoryOption> {
    all.iter()
        .map(|&name| CategoryOption {
            name,
            selected: name == current,
        })
        .collect()
}

// -- Web project --

#[derive(Template)]
#[template(path = "web_project.html")]
struct WebProjectTemplate {
    form: WebProjectForm,
    technologies: Vec<TechOption>,
    success: Option<String>,
    error: Option<String>,
    remote: Option<RemoteBanner>,
}

struct TechOption {
    name: &'static str,
    checked: bool,
}

struct RemoteBanner {
    ok: bool,
    message: String,
}

impl RemoteBanner {
    fn from_outcome(outcome: &RemoteOutcome) -> Option<Self> {
        match outcome {
            RemoteOutcome::Skipped => None,
            RemoteOutcome::Accepted { message } => Some(Self {
                ok: true,
                message: message.clone(),
            }),
            RemoteOutcome::Rejected { message } | RemoteOutcome::Failed { message } => {
                Some(Self {
                    ok: false,
                    message: message.clone(),
                })
            }
        }
    }
}

fn render_web_project(
    form: WebProjectForm,
    notice: Notice,
    remote: Option<RemoteBanner>,
) -> Result<Response, AppError> {
    let technologies = TECHNOLOGIES
        .iter()
        .map(|&name| TechOption {
            name,
            checked: form.has_technology(name),
        })
        .collect();
    let status = notice.status();
    let tmpl = WebProjectTemplate {
        form,
        technologies,
        success: notice.success,
        error: notice.error,
        remote,
    };
    Ok((status, Html(tmpl.render()?)).into_response())
}

async fn web_project_page(_admin: AdminPage) -> Result<Response, AppError> {
    render_web_project(WebProjectForm::default(), Notice::default(), None)
}

async fn submit_web_project(
    _admin: AdminPage,
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Pairs>,
) -> Result<Response, AppError> {
    let form: WebProjectForm = fill_form(pairs);

    match state.forms.submit_web_project(&form).await {
        Ok(submission) => {
            let remote = RemoteBanner::from_outcome(&submission.remote);
            render_web_project(form, Notice::success(submission.outcome.message), remote)
        }
        Err(e) if e.is_user_error() => render_web_project(form, Notice::error(&e), None),
        Err(e) => Err(e.into()),
    }
}

// -- Event --

#[derive(Template)]
#[template(path = "event.html")]
struct EventTemplate {
    form: EventForm,
    categories: Vec<CategoryOption>,
    images: Vec<ImageRow>,
    recent: Vec<EventCard>,
    total: usize,
    success: Option<String>,
    error: Option<String>,
}

struct ImageRow {
    index: usize,
    url: String,
    is_main: bool,
}

struct EventCard {
    name: String,
    category: String,
    date: String,
    cover: String,
    image_count: usize,
}

/// Buttons on the event page.
#[derive(Debug, PartialEq, Eq)]
enum EventAction {
    AddImage,
    RemoveImage(usize),
    SetMain(usize),
    Submit,
}

impl EventAction {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.unwrap_or("submit") {
            "submit" => Some(Self::Submit),
            "add_image" => Some(Self::AddImage),
            other => {
                let (verb, index) = other.split_once(':')?;
                let index = index.parse().ok()?;
                match verb {
                    "remove_image" => Some(Self::RemoveImage(index)),
                    "set_main" => Some(Self::SetMain(index)),
                    _ => None,
                }
            }
        }
    }
}

async fn render_event(
    state: &AppState,
    form: EventForm,
    notice: Notice,
) -> Result<Response, AppError> {
    let total = state.portfolio.get_events().await?.len();
    let recent = dashboard::recent_events(&state.portfolio, RECENT_EVENTS)
        .await?
        .into_iter()
        .map(|e| EventCard {
            cover: e.cover_image().unwrap_or_default().to_string(),
            image_count: e.images.len(),
            name: e.name,
            category: e.category,
            date: e.date,
        })
        .collect();
    let images = form
        .images
        .iter()
        .enumerate()
        .map(|(index, url)| ImageRow {
            index,
            url: url.clone(),
            is_main: *url == form.main_image,
        })
        .collect();
    let status = notice.status();
    let tmpl = EventTemplate {
        categories: category_options(EVENT_CATEGORIES, &form.category),
        form,
        images,
        recent,
        total,
        success: notice.success,
        error: notice.error,
    };
    Ok((status, Html(tmpl.render()?)).into_response())
}

async fn event_page(
    _admin: AdminPage,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    render_event(&state, EventForm::default(), Notice::default()).await
}

async fn event_action(
    _admin: AdminPage,
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Pairs>,
) -> Result<Response, AppError> {
    let (action, fields) = take_action(pairs);
    let mut form: EventForm = fill_form(fields);

    let result = match EventAction::parse(action.as_deref()) {
        Some(EventAction::AddImage) => {
            form.add_pending_image();
            Ok(Notice::default())
        }
        Some(EventAction::RemoveImage(index)) => form.remove_image(index).map(|_| Notice::default()),
        Some(EventAction::SetMain(index)) => match form.images.get(index).cloned() {
            Some(url) => form.set_main_image(&url).map(|_| Notice::default()),
            None => Err(PrimexError::InvalidInput(format!(
                "no image at position {index}"
            ))),
        },
        Some(EventAction::Submit) => state
            .forms
            .submit_event(&mut form)
            .await
            .map(|outcome| Notice::success(outcome.message)),
        None => Err(PrimexError::InvalidInput("unknown action".into())),
    };

    match result {
        Ok(notice) => render_event(&state, form, notice).await,
        Err(e) if e.is_user_error() => render_event(&state, form, Notice::error(&e)).await,
        Err(e) => Err(e.into()),
    }
}

// -- Graphic design --

#[derive(Template)]
#[template(path = "graphic_design.html")]
struct GraphicDesignTemplate {
    form: GraphicDesignForm,
    categories: Vec<CategoryOption>,
    category_counts: Vec<CategoryCount>,
    recent: Vec<DesignCard>,
    total: usize,
    success: Option<String>,
    error: Option<String>,
}

struct CategoryCount {
    name: &'static str,
    count: usize,
}

struct DesignCard {
    title: String,
    category: String,
    image: String,
}

async fn render_graphic_design(
    state: &AppState,
    form: GraphicDesignForm,
    notice: Notice,
) -> Result<Response, AppError> {
    let designs = state.portfolio.get_graphic_designs().await?;
    let total = designs.len();
    let category_counts = dashboard::design_category_counts(&designs)
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect();
    let recent = dashboard::recent_designs(&state.portfolio, RECENT_DESIGNS)
        .await?
        .into_iter()
        .map(|d| DesignCard {
            title: d.title,
            category: d.category,
            image: d.image,
        })
        .collect();
    let status = notice.status();
    let tmpl = GraphicDesignTemplate {
        categories: category_options(DESIGN_CATEGORIES, &form.category),
        form,
        category_counts,
        recent,
        total,
        success: notice.success,
        error: notice.error,
    };
    Ok((status, Html(tmpl.render()?)).into_response())
}

async fn graphic_design_page(
    _admin: AdminPage,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    render_graphic_design(&state, GraphicDesignForm::default(), Notice::default()).await
}

async fn submit_graphic_design(
    _admin: AdminPage,
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Pairs>,
) -> Result<Response, AppError> {
    let mut form: GraphicDesignForm = fill_form(pairs);

    match state.forms.submit_graphic_design(&mut form).await {
        Ok(outcome) => render_graphic_design(&state, form, Notice::success(outcome.message)).await,
        Err(e) if e.is_user_error() => {
            render_graphic_design(&state, form, Notice::error(&e)).await
        }
        Err(e) => Err(e.into()),
    }
}
