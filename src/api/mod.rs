use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::{error, info};
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::commands::{ActionHandler, Export};
use crate::highlight::highlight_keywords_html;
use crate::papers::{MonthSession, SearchError, SearchParameters, PAPERS, YEARS};
use crate::session::{SessionState, SessionStore};

const SESSION_COOKIE: &str = "sid";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Clone)]
pub struct AppState {
    actions: Arc<ActionHandler>,
    sessions: SessionStore,
    templates: Arc<Environment<'static>>,
}

/// Raw form fields. Everything arrives as text so a malformed value is
/// reported on the page instead of being rejected by the extractor.
#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    month: String,
    #[serde(default)]
    paper: String,
    #[serde(default)]
    variant: String,
}

impl SearchForm {
    fn into_params(self) -> Result<SearchParameters, SearchError> {
        let year = self
            .year
            .trim()
            .parse::<u16>()
            .map_err(|_| SearchError::InvalidYear(self.year.trim().to_string()))?;
        let paper = self
            .paper
            .trim()
            .parse::<u8>()
            .map_err(|_| SearchError::InvalidPaper(self.paper.trim().to_string()))?;
        Ok(SearchParameters {
            month: self.month.parse::<MonthSession>()?,
            topic: self.topic,
            keywords: self.keywords,
            year,
            paper,
            variant: self.variant.trim().to_string(),
        })
    }
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

pub fn create_api(actions: ActionHandler, sessions: SessionStore) -> Result<Router, minijinja::Error> {
    let state = AppState {
        actions: Arc::new(actions),
        sessions,
        templates: Arc::new(build_templates()?),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/search", post(search_handler))
        .route("/answers", post(answers_handler))
        .route("/export/questions", get(export_questions_handler))
        .route("/export/answers", get(export_answers_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state);
    Ok(router)
}

fn build_templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", include_str!("templates/index.html"))?;
    Ok(env)
}

/// Returns the session id from the cookie, issuing a new one if missing.
fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let id = cookie.value().to_string();
        return (jar, id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

async fn index_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_id(jar);
    let (session, flash) = state
        .sessions
        .update(&sid, |s| {
            let flash = s.take_flash();
            (s.clone(), flash)
        })
        .await;

    match render_index(&state.templates, &session, flash) {
        Ok(page) => (jar, page).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

fn render_index(
    templates: &Environment<'static>,
    session: &SessionState,
    error: Option<String>,
) -> Result<Html<String>, minijinja::Error> {
    let questions_html = if session.has_questions() {
        highlight_keywords_html(&session.question_set, &session.form.keywords)
    } else {
        String::new()
    };
    let months: Vec<&str> = MonthSession::ALL.iter().map(|m| m.label()).collect();

    let page = templates.get_template("index.html")?.render(context! {
        form => &session.form,
        month => session.form.month.label(),
        years => YEARS,
        months => months,
        papers => PAPERS,
        questions_html => questions_html,
        answers => &session.answer_set,
        error => error,
    })?;
    Ok(Html(page))
}

async fn search_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SearchForm>,
) -> Response {
    let (jar, sid) = session_id(jar);

    let result = match form.into_params() {
        Ok(params) => {
            info!("Search requested: {}", params.filename());
            state.actions.search(&state.sessions, &sid, params).await
        }
        Err(e) => {
            state.sessions.update(&sid, |s| s.restart_search()).await;
            Err(e.into())
        }
    };
    if let Err(e) = result {
        error!("Search failed: {}", e);
        state.sessions.update(&sid, |s| s.set_flash(e.to_string())).await;
    }

    (jar, Redirect::to("/")).into_response()
}

async fn answers_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_id(jar);

    if let Err(e) = state.actions.generate_answers(&state.sessions, &sid).await {
        error!("Answer generation failed: {}", e);
        state.sessions.update(&sid, |s| s.set_flash(e.to_string())).await;
    }

    (jar, Redirect::to("/")).into_response()
}

async fn export_questions_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    export_response(state, jar, |actions, session| actions.export_questions(session)).await
}

async fn export_answers_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    export_response(state, jar, |actions, session| actions.export_answers(session)).await
}

async fn export_response<F>(state: AppState, jar: CookieJar, export: F) -> Response
where
    F: FnOnce(&ActionHandler, &SessionState) -> Result<Export, crate::commands::ActionError>,
{
    let (jar, sid) = session_id(jar);
    let session = state.sessions.get(&sid).await;

    match export(&state.actions, &session) {
        Ok(doc) => (
            jar,
            [
                (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&doc.filename)),
            ],
            doc.bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Export failed: {}", e);
            state.sessions.update(&sid, |s| s.set_flash(e.to_string())).await;
            (jar, Redirect::to("/")).into_response()
        }
    }
}

/// `attachment` header with an ASCII fallback name plus the RFC 5987 form.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

async fn health_check() -> Response {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}
