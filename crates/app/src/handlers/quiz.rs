use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use rccm_core::model::QuestionCount;
use serde::Deserialize;
use services::{QuizPhase, QuizStep};
use tracing::{info, warn};
use ui::vm::{FeedbackVm, QuestionVm, ResultVm, StartVm};

use crate::error::AppError;
use crate::session::{SESSION_COOKIE, check_csrf, load_quiz, session_cookie, session_key};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartForm {
    #[serde(default)]
    pub questions: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct NextForm {
    #[serde(default)]
    pub csrf_token: String,
}

fn to_home() -> Response {
    Redirect::to("/").into_response()
}

fn to_exam() -> Response {
    Redirect::to("/exam").into_response()
}

//
// ─── START ─────────────────────────────────────────────────────────────────────
//

pub async fn start_form(
    State(state): State<Arc<AppState>>,
    Path(department): Path<String>,
    Query(query): Query<StartQuery>,
) -> Result<Html<String>, AppError> {
    let (scope, available) = state
        .services
        .catalog()
        .resolve_scope(&department, query.year.as_deref())
        .await?;
    Ok(Html(ui::render_start(StartVm::new(scope, available))))
}

pub async fn start_exam(
    State(state): State<Arc<AppState>>,
    Path(department): Path<String>,
    jar: CookieJar,
    Form(form): Form<StartForm>,
) -> Result<(CookieJar, Redirect), AppError> {
    let (scope, _) = state
        .services
        .catalog()
        .resolve_scope(&department, form.year.as_deref())
        .await?;
    let count: QuestionCount = form.questions.parse()?;
    let session = state.services.quiz_loop().start_quiz(scope, count).await?;

    let sessions = state.services.sessions();
    if let Some(previous) = session_key(&jar) {
        sessions.remove(previous);
    }
    let (key, _) = sessions.create(session);
    info!(%key, scope = %scope.label(), count = count.get(), "quiz session opened");

    let jar = jar.add(session_cookie(key, state.secure_cookies));
    Ok((jar, Redirect::to("/exam")))
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

pub async fn show_exam(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some((_, stored)) = load_quiz(&state, &jar) else {
        return Ok(to_home());
    };
    let quiz = state.services.quiz_loop();
    let session = stored.lock().await;

    let page = match session.phase() {
        QuizPhase::Complete => return Ok(Redirect::to("/result").into_response()),
        QuizPhase::Feedback => {
            let Some(feedback) = quiz.feedback(&session).await? else {
                return Ok(to_home());
            };
            ui::render_feedback(FeedbackVm::new(
                session.scope(),
                &feedback,
                session.correct_count(),
                &stored.csrf_token,
            ))
        }
        QuizPhase::AwaitingAnswer => {
            let Some(question) = quiz.current(&session).await? else {
                return Ok(to_home());
            };
            ui::render_question(QuestionVm::new(
                session.scope(),
                &question,
                session.progress(),
                &stored.csrf_token,
            ))
        }
    };
    Ok(Html(page).into_response())
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AnswerForm>,
) -> Result<Response, AppError> {
    let Some((_, stored)) = load_quiz(&state, &jar) else {
        return Ok(to_home());
    };
    check_csrf(&stored, &form.csrf_token)?;
    let mut session = stored.lock().await;
    if session.phase() != QuizPhase::AwaitingAnswer {
        return Ok(to_exam());
    }

    let feedback = state
        .services
        .quiz_loop()
        .answer_current(&mut session, &form.answer)
        .await?;
    let vm = FeedbackVm::new(
        session.scope(),
        &feedback,
        session.correct_count(),
        &stored.csrf_token,
    );
    Ok(Html(ui::render_feedback(vm)).into_response())
}

pub async fn next_question(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<NextForm>,
) -> Result<Redirect, AppError> {
    let Some((_, stored)) = load_quiz(&state, &jar) else {
        return Ok(Redirect::to("/"));
    };
    check_csrf(&stored, &form.csrf_token)?;
    let mut session = stored.lock().await;
    // a repeated click lands here after the first one already moved on
    if session.phase() != QuizPhase::Feedback {
        return Ok(Redirect::to("/exam"));
    }

    let step = state.services.quiz_loop().next(&mut session).await?;
    Ok(match step {
        QuizStep::Next(_) => Redirect::to("/exam"),
        QuizStep::Complete { .. } => Redirect::to("/result"),
    })
}

/// Put the question on screen into the review list.
pub async fn bookmark_current(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<NextForm>,
) -> Result<Redirect, AppError> {
    let Some((key, stored)) = load_quiz(&state, &jar) else {
        return Ok(Redirect::to("/"));
    };
    check_csrf(&stored, &form.csrf_token)?;
    let question = stored.lock().await.current_question_id();
    if let Some(id) = question {
        let added = state.services.review().bookmark(id).await?;
        info!(%key, question = %id, added, "question bookmarked");
    }
    Ok(Redirect::to("/exam"))
}

/// Forget the running quiz of this browser.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    if let Some(key) = session_key(&jar) {
        if state.services.sessions().remove(key).is_some() {
            info!(%key, "quiz session reset");
        }
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/"))
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

pub async fn show_result(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let Some((key, stored)) = load_quiz(&state, &jar) else {
        return Ok(to_home());
    };
    let mut session = stored.lock().await;
    if !session.is_complete() {
        return Ok(to_exam());
    }

    let quiz = state.services.quiz_loop();
    let saved = if session.result_id().is_some() {
        true
    } else {
        match quiz.finalize_result(&mut session).await {
            Ok(id) => {
                if !state.services.sessions().contains(key) {
                    warn!(%key, result_id = id, "quiz session expired while its result was saved");
                }
                true
            }
            Err(err) => {
                warn!(%err, "quiz result still not saved");
                false
            }
        }
    };

    let summary = session.summary()?;
    let answered = quiz.answered_questions(&session).await?;
    Ok(Html(ui::render_result(ResultVm::new(&summary, &answered, saved))).into_response())
}
