use std::sync::Arc;

use chrono::Duration;
use rccm_core::model::{Choice, Department, ExamYear, Question, QuestionCount, QuestionId, QuizScope};
use rccm_core::time::fixed_now;
use services::{Clock, QuizHistoryService, QuizLoopService, QuizStep, ReviewService};
use storage::QuestionBank;
use storage::repository::{InMemoryRepository, QuizResultRepository, ReviewRepository, Storage};

use super::render::{
    render_error, render_feedback, render_history, render_home, render_question, render_result,
    render_review_list, render_start, render_year,
};
use crate::vm::{
    ErrorVm, FeedbackVm, HistoryVm, HomeVm, QuestionVm, ResultVm, ReviewListVm, StartVm,
    YearPageVm,
};

fn year() -> ExamYear {
    ExamYear::new(2015).unwrap()
}

fn bank() -> QuestionBank {
    let mut ids: Vec<QuestionId> = (1..=3).map(QuestionId::basic).collect();
    ids.extend((1..=2).map(|n| QuestionId::specialist(Department::Road, year(), n)));
    QuestionBank::from_questions(ids.into_iter().map(|id| {
        let options = ["<選択肢ア>", "選択肢イ", "選択肢ウ", "選択肢エ"].map(String::from);
        Question::new(id, format!("問題文 {id}"), options, Choice::B)
            .unwrap()
            .with_explanation(format!("解説 {id}"))
    }))
    .unwrap()
}

fn quiz_loop(results: &InMemoryRepository) -> QuizLoopService {
    let storage = Storage {
        questions: Arc::new(bank()),
        results: Arc::new(results.clone()),
        review: Arc::new(results.clone()),
    };
    QuizLoopService::new(Clock::fixed(fixed_now()), &storage).with_shuffle(false)
}

#[test]
fn home_view_lists_departments_and_years() {
    let html = render_home(HomeVm::from(&bank().catalog()));
    assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    assert!(html.contains("収録問題数: 5問"), "{html}");
    assert!(html.contains("href=\"/start_exam/basic\""), "{html}");
    assert!(html.contains("href=\"/start_exam/road\""), "{html}");
    assert!(html.contains("href=\"/year/2015\""), "{html}");
    assert!(html.contains("問題準備中"), "{html}");
}

#[test]
fn year_view_links_to_year_scoped_start() {
    let catalog = bank().catalog();
    let entry = catalog.year(year()).unwrap();
    let html = render_year(YearPageVm::from(entry));
    assert!(html.contains("2015年度の選択科目"), "{html}");
    assert!(html.contains("/start_exam/road?year=2015"), "{html}");
    assert!(!html.contains("/start_exam/tunnel"), "{html}");
}

#[test]
fn start_view_offers_counts_and_keeps_year() {
    let scope = QuizScope::department_year(Department::Road, year());
    let html = render_start(StartVm::new(scope, 2));
    assert!(html.contains("action=\"/start_exam/road\""), "{html}");
    assert!(html.contains("name=\"year\""), "{html}");
    assert!(html.contains("value=\"2015\""), "{html}");
    for count in ["10", "20", "30"] {
        assert!(html.contains(&format!("value=\"{count}\"")), "missing {count} in {html}");
    }
    assert!(html.contains("2問で出題されます"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn question_and_feedback_views_render_quiz_state() {
    let results = InMemoryRepository::new();
    let svc = quiz_loop(&results);
    let scope = QuizScope::department(Department::Basic);
    let mut session = svc.start_quiz(scope, QuestionCount::Ten).await.unwrap();

    let question = svc.current(&session).await.unwrap().unwrap();
    let html = render_question(QuestionVm::new(scope, &question, session.progress(), "tok123"));
    assert!(html.contains("問題 1 / 3"), "{html}");
    assert!(html.contains("問題文 basic-1"), "{html}");
    assert!(html.contains("value=\"tok123\""), "{html}");
    assert!(html.contains("&lt;選択肢ア&gt;"), "option text must be escaped: {html}");
    assert_eq!(html.matches("name=\"answer\"").count(), 4, "{html}");

    let feedback = svc.answer_current(&mut session, "A").await.unwrap();
    let html = render_feedback(FeedbackVm::new(
        scope,
        &feedback,
        session.correct_count(),
        "tok123",
    ));
    assert!(html.contains("不正解"), "{html}");
    assert!(html.contains("正解: B（選択肢イ）"), "{html}");
    assert!(html.contains("解説 basic-1"), "{html}");
    assert!(html.contains("action=\"/exam/next\""), "{html}");
    assert!(html.contains("action=\"/exam/bookmark\""), "{html}");
    assert!(html.contains("次の問題へ"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_and_history_views_render_scores() {
    let results = InMemoryRepository::new();
    let svc = quiz_loop(&results);
    let scope = QuizScope::department_year(Department::Road, year());
    let mut session = svc.start_quiz(scope, QuestionCount::Ten).await.unwrap();

    for answer in ["B", "C"] {
        svc.answer_current(&mut session, answer).await.unwrap();
        if let QuizStep::Complete { result_id } = svc.next(&mut session).await.unwrap() {
            assert!(result_id.is_some());
        }
    }

    let summary = session.summary().unwrap();
    let answered = svc.answered_questions(&session).await.unwrap();
    let html = render_result(ResultVm::new(&summary, &answered, true));
    assert!(html.contains("1 / 2 問正解"), "{html}");
    assert!(html.contains("50.0%"), "{html}");
    assert!(html.contains("/start_exam/road?year=2015"), "{html}");
    assert!(!html.contains("保存できませんでした"), "{html}");

    let history = QuizHistoryService::new(Arc::new(results.clone()))
        .recent(10)
        .await
        .unwrap();
    let html = render_history(HistoryVm::from(&history));
    assert!(html.contains("道路（2015年度）"), "{html}");
    assert!(html.contains("1 / 2"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_view_handles_no_results() {
    let results = InMemoryRepository::new();
    assert!(results.list_recent(1).await.unwrap().is_empty());
    let html = render_history(HistoryVm::default());
    assert!(html.contains("まだ演習結果がありません"), "{html}");
}

#[test]
fn error_view_shows_status_and_message() {
    let html = render_error(ErrorVm::not_found("指定された部門は存在しません。"));
    assert!(html.contains("ステータス 404"), "{html}");
    assert!(html.contains("指定された部門は存在しません。"), "{html}");
}

#[test]
fn result_view_warns_when_unsaved() {
    let start = fixed_now();
    let summary = rccm_core::model::QuizSummary::from_persisted(
        QuizScope::department(Department::Basic),
        start,
        start + Duration::minutes(4),
        10,
        9,
    )
    .unwrap();
    let html = render_result(ResultVm::new(&summary, &[], false));
    assert!(html.contains("9 / 10 問正解"), "{html}");
    assert!(html.contains("4.0分"), "{html}");
    assert!(html.contains("保存できませんでした"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn review_list_view_offers_department_quizzes() {
    let repo = InMemoryRepository::new();
    let road = QuestionId::specialist(Department::Road, year(), 2);
    for _ in 0..3 {
        repo.record_misses(&[road], fixed_now()).await.unwrap();
    }
    repo.bookmark(QuestionId::basic(1), fixed_now()).await.unwrap();

    let list = ReviewService::new(Clock::fixed(fixed_now()), Arc::new(bank()), Arc::new(repo))
        .list()
        .await
        .unwrap();
    let html = render_review_list(ReviewListVm::from(&list));
    assert!(html.contains("登録数: 2問"), "{html}");
    assert!(html.contains("3回以上間違えた問題: 1問"), "{html}");
    assert!(html.contains("action=\"/review/start/road\""), "{html}");
    assert!(html.contains("action=\"/review/start/basic\""), "{html}");
    assert!(html.contains("value=\"road-2015-2\""), "{html}");
    assert!(html.contains("ブックマーク"), "{html}");
    assert!(html.contains("道路（2015年度）"), "{html}");
    assert!(html.contains("action=\"/reset\""), "{html}");

    let empty = render_review_list(ReviewListVm::default());
    assert!(empty.contains("まだ復習問題が登録されていません"), "{empty}");
}
