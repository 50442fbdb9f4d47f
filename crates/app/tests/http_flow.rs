use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use rccm_core::model::{Choice, Department, ExamYear, Question, QuestionId};
use rccm_core::time::fixed_now;
use services::{AppServices, Clock};
use storage::QuestionBank;
use storage::repository::{QuizResultRepository, Storage};
use tower::ServiceExt;

use app::{AppState, create_router};

fn bank() -> QuestionBank {
    let y2015 = ExamYear::new(2015).unwrap();
    let mut ids: Vec<QuestionId> = (1..=3).map(QuestionId::basic).collect();
    ids.extend((1..=2).map(|n| QuestionId::specialist(Department::Road, y2015, n)));
    QuestionBank::from_questions(ids.into_iter().map(|id| {
        let options = ["ア", "イ", "ウ", "エ"].map(String::from);
        Question::new(id, format!("問題 {id}"), options, Choice::B)
            .unwrap()
            .with_explanation("解説文")
    }))
    .unwrap()
}

fn router() -> Router {
    let services = AppServices::in_memory(bank(), Clock::fixed(fixed_now()), Duration::hours(1));
    create_router(Arc::new(AppState::new(services, false)))
}

fn router_over(storage: &Storage) -> Router {
    let services = AppServices::new(storage, Clock::fixed(fixed_now()), Duration::hours(1));
    create_router(Arc::new(AppState::new(services, false)))
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    cookie: Option<String>,
    content_type: Option<String>,
    headers: axum::http::HeaderMap,
    body: String,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let headers = response.headers().clone();
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let location = header_str(header::LOCATION);
    let cookie = header_str(header::SET_COOKIE);
    let content_type = header_str(header::CONTENT_TYPE);
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        location,
        cookie,
        content_type,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn csrf_token(html: &str) -> String {
    hidden_value(html, "csrf_token")
}

fn hidden_value(html: &str, name: &str) -> String {
    let field = html.find(&format!("name=\"{name}\"")).expect("form field");
    let tag_start = html[..field].rfind("<input").expect("input tag");
    let tag = &html[tag_start..];
    let tag = &tag[..tag.find('>').expect("tag end")];
    let value = tag.split("value=\"").nth(1).expect("value attribute");
    value[..value.find('"').expect("closing quote")].to_string()
}

#[tokio::test]
async fn home_page_is_html_with_security_headers() {
    let app = router();
    let reply = send(&app, get("/", None)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(reply.headers["x-content-type-options"], "nosniff");
    assert_eq!(reply.headers["x-frame-options"], "DENY");
    assert_eq!(reply.headers["referrer-policy"], "same-origin");
    assert!(reply.body.contains("/start_exam/road"), "{}", reply.body);
    assert!(reply.body.contains("/year/2015"), "{}", reply.body);
}

#[tokio::test]
async fn full_quiz_flow_records_one_result() {
    let app = router();

    let start = send(&app, get("/start_exam/basic", None)).await;
    assert_eq!(start.status, StatusCode::OK);
    assert!(start.body.contains("出題可能な問題: 3問"), "{}", start.body);

    let created = send(&app, post("/start_exam/basic", None, "questions=10")).await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    assert_eq!(created.location.as_deref(), Some("/exam"));
    let set_cookie = created.cookie.expect("session cookie");
    assert!(set_cookie.starts_with("rccm_session="), "{set_cookie}");
    assert!(set_cookie.contains("HttpOnly"), "{set_cookie}");
    assert!(set_cookie.contains("SameSite=Lax"), "{set_cookie}");
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let cookie = Some(cookie.as_str());

    for number in 1..=3 {
        let page = send(&app, get("/exam", cookie)).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(page.body.contains(&format!("問題 {number} / 3")), "{}", page.body);
        let token = csrf_token(&page.body);

        let forged = send(&app, post("/exam", cookie, "answer=B&csrf_token=forged")).await;
        assert_eq!(forged.status, StatusCode::BAD_REQUEST);

        let answer = if number == 1 { "a" } else { "B" };
        let feedback = send(
            &app,
            post("/exam", cookie, &format!("answer={answer}&csrf_token={token}")),
        )
        .await;
        assert_eq!(feedback.status, StatusCode::OK);
        assert!(feedback.body.contains("解説文"), "{}", feedback.body);

        let again = send(&app, get("/exam", cookie)).await;
        assert!(again.body.contains("/exam/next"), "{}", again.body);

        let next = send(&app, post("/exam/next", cookie, &format!("csrf_token={token}"))).await;
        assert_eq!(next.status, StatusCode::SEE_OTHER);
        let expected = if number == 3 { "/result" } else { "/exam" };
        assert_eq!(next.location.as_deref(), Some(expected));
    }

    let finished = send(&app, get("/exam", cookie)).await;
    assert_eq!(finished.location.as_deref(), Some("/result"));

    let result = send(&app, get("/result", cookie)).await;
    assert_eq!(result.status, StatusCode::OK);
    assert!(result.body.contains("2 / 3 問正解"), "{}", result.body);
    assert!(result.body.contains("66.7%"), "{}", result.body);

    let reload = send(&app, get("/result", cookie)).await;
    assert_eq!(reload.status, StatusCode::OK);

    let history = send(&app, get("/history", None)).await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body.matches("2 / 3").count(), 1, "{}", history.body);

    let health = send(&app, get("/health", None)).await;
    let json: serde_json::Value = serde_json::from_str(&health.body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["questions"], 5);
    assert_eq!(json["active_sessions"], 1);
}

#[tokio::test]
async fn pages_without_a_session_redirect_home() {
    let app = router();
    for uri in ["/exam", "/result"] {
        let reply = send(&app, get(uri, None)).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(reply.location.as_deref(), Some("/"), "{uri}");
    }
    let stale = send(
        &app,
        get("/exam", Some("rccm_session=00000000000000000000000000000000")),
    )
    .await;
    assert_eq!(stale.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn invalid_requests_render_error_pages() {
    let app = router();

    let unknown = send(&app, get("/start_exam/bridges", None)).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert!(unknown.body.contains("ステータス 404"), "{}", unknown.body);

    let count = send(&app, post("/start_exam/basic", None, "questions=15")).await;
    assert_eq!(count.status, StatusCode::BAD_REQUEST);

    let year = send(&app, get("/year/2007", None)).await;
    assert_eq!(year.status, StatusCode::BAD_REQUEST);

    let empty_year = send(&app, get("/year/2016", None)).await;
    assert_eq!(empty_year.status, StatusCode::NOT_FOUND);

    let empty_dept = send(&app, get("/start_exam/tunnel", None)).await;
    assert_eq!(empty_dept.status, StatusCode::NOT_FOUND);

    let missing = send(&app, get("/no-such-page", None)).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn year_scoped_quiz_only_serves_that_year() {
    let app = router();
    let created = send(
        &app,
        post("/start_exam/road", None, "questions=20&year=2015"),
    )
    .await;
    assert_eq!(created.status, StatusCode::SEE_OTHER);
    let set_cookie = created.cookie.expect("session cookie");
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let page = send(&app, get("/exam", Some(&cookie))).await;
    assert!(page.body.contains("道路（2015年度）"), "{}", page.body);
    assert!(page.body.contains("問題 1 / 2"), "{}", page.body);
    assert!(page.body.contains("road-2015-"), "{}", page.body);
}

fn session_of(reply: &Reply) -> String {
    let set_cookie = reply.cookie.as_deref().expect("session cookie");
    set_cookie.split(';').next().unwrap().to_string()
}

/// Answer every question of the running quiz, giving `answer(n)` for question n.
/// Stops on the feedback page of the last question and returns its token.
async fn answer_all(
    app: &Router,
    cookie: &str,
    total: usize,
    answer: impl Fn(usize) -> &'static str,
) -> String {
    let cookie = Some(cookie);
    for number in 1..=total {
        let page = send(app, get("/exam", cookie)).await;
        assert!(page.body.contains(&format!("問題 {number} / {total}")), "{}", page.body);
        let token = csrf_token(&page.body);
        let form = format!("answer={}&csrf_token={token}", answer(number));
        let feedback = send(app, post("/exam", cookie, &form)).await;
        assert_eq!(feedback.status, StatusCode::OK);
        if number == total {
            return token;
        }
        let next = send(app, post("/exam/next", cookie, &format!("csrf_token={token}"))).await;
        assert_eq!(next.location.as_deref(), Some("/exam"));
    }
    unreachable!("quiz has no questions")
}

#[tokio::test]
async fn double_submitted_last_question_stores_one_result() {
    let storage = Storage::in_memory(bank());
    let app = router_over(&storage);

    let created = send(&app, post("/start_exam/basic", None, "questions=10")).await;
    let cookie = session_of(&created);
    let token = answer_all(&app, &cookie, 3, |_| "B").await;

    let form = format!("csrf_token={token}");
    let (first, second) = tokio::join!(
        send(&app, post("/exam/next", Some(&cookie), &form)),
        send(&app, post("/exam/next", Some(&cookie), &form)),
    );
    let mut targets = [first.location.unwrap(), second.location.unwrap()];
    targets.sort();
    assert_eq!(targets, ["/exam".to_string(), "/result".to_string()]);

    let (page, reload) = tokio::join!(
        send(&app, get("/result", Some(&cookie))),
        send(&app, get("/result", Some(&cookie))),
    );
    assert!(page.body.contains("3 / 3 問正解"), "{}", page.body);
    assert!(reload.body.contains("3 / 3 問正解"), "{}", reload.body);

    assert_eq!(storage.results.list_recent(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn review_list_collects_misses_and_bookmarks() {
    let app = router();

    let created = send(&app, post("/start_exam/basic", None, "questions=10")).await;
    let cookie = session_of(&created);
    let session = Some(cookie.as_str());

    // first answer wrong, second bookmarked although correct
    let page = send(&app, get("/exam", session)).await;
    let token = csrf_token(&page.body);
    let wrong = send(&app, post("/exam", session, &format!("answer=A&csrf_token={token}"))).await;
    assert!(wrong.body.contains("action=\"/exam/bookmark\""), "{}", wrong.body);
    send(&app, post("/exam/next", session, &format!("csrf_token={token}"))).await;
    send(&app, get("/exam", session)).await;
    send(&app, post("/exam", session, &format!("answer=B&csrf_token={token}"))).await;

    let forged = send(&app, post("/exam/bookmark", session, "csrf_token=forged")).await;
    assert_eq!(forged.status, StatusCode::BAD_REQUEST);
    let marked = send(&app, post("/exam/bookmark", session, &format!("csrf_token={token}"))).await;
    assert_eq!(marked.location.as_deref(), Some("/exam"));

    send(&app, post("/exam/next", session, &format!("csrf_token={token}"))).await;
    send(&app, post("/exam", session, &format!("answer=B&csrf_token={token}"))).await;
    let done = send(&app, post("/exam/next", session, &format!("csrf_token={token}"))).await;
    assert_eq!(done.location.as_deref(), Some("/result"));
    let result = send(&app, get("/result", session)).await;
    assert!(result.body.contains("href=\"/review\""), "{}", result.body);

    let listed = send(&app, get("/review", None)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert!(listed.body.contains("登録数: 2問"), "{}", listed.body);
    assert!(listed.body.contains("1回"), "{}", listed.body);
    assert!(listed.body.contains("ブックマーク"), "{}", listed.body);
    assert!(listed.body.contains("action=\"/review/start/basic\""), "{}", listed.body);

    // misses sort first, so this drops the wrongly answered question
    let missed = hidden_value(&listed.body, "question_id");
    let removed = send(&app, post("/review/remove", None, &format!("question_id={missed}"))).await;
    assert_eq!(removed.location.as_deref(), Some("/review"));
    let bad = send(&app, post("/review/remove", None, "question_id=nonsense")).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let listed = send(&app, get("/review", None)).await;
    assert!(listed.body.contains("登録数: 1問"), "{}", listed.body);
    assert!(!listed.body.contains(&format!("value=\"{missed}\"")), "{}", listed.body);

    let unknown = send(&app, post("/review/start/bridges", session, "questions=10")).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let review = send(&app, post("/review/start/basic", session, "questions=10")).await;
    assert_eq!(review.location.as_deref(), Some("/exam"));
    let review_cookie = session_of(&review);
    assert_ne!(review_cookie, cookie);

    let token = answer_all(&app, &review_cookie, 1, |_| "B").await;
    let form = format!("csrf_token={token}");
    let done = send(&app, post("/exam/next", Some(&review_cookie), &form)).await;
    assert_eq!(done.location.as_deref(), Some("/result"));
    send(&app, get("/result", Some(&review_cookie))).await;

    let cleared = send(&app, get("/review", None)).await;
    assert!(cleared.body.contains("まだ復習問題が登録されていません"), "{}", cleared.body);

    let empty = send(&app, post("/review/start/basic", None, "questions=10")).await;
    assert_eq!(empty.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_forgets_the_running_quiz() {
    let app = router();
    let created = send(&app, post("/start_exam/basic", None, "questions=10")).await;
    let cookie = session_of(&created);

    let page = send(&app, get("/exam", Some(&cookie))).await;
    assert!(page.body.contains("action=\"/reset\""), "{}", page.body);

    let reset = send(&app, post("/reset", Some(&cookie), "")).await;
    assert_eq!(reset.status, StatusCode::SEE_OTHER);
    assert_eq!(reset.location.as_deref(), Some("/"));
    let cleared = reset.cookie.expect("removal cookie");
    assert!(cleared.starts_with("rccm_session="), "{cleared}");
    assert!(cleared.contains("Max-Age=0"), "{cleared}");

    let after = send(&app, get("/exam", Some(&cookie))).await;
    assert_eq!(after.location.as_deref(), Some("/"));

    let health = send(&app, get("/health", None)).await;
    let json: serde_json::Value = serde_json::from_str(&health.body).unwrap();
    assert_eq!(json["active_sessions"], 0);

    let without = send(&app, post("/reset", None, "")).await;
    assert_eq!(without.location.as_deref(), Some("/"));
}
