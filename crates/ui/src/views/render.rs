//! Whole-page rendering to HTML strings.

use dioxus::prelude::*;

use crate::views::catalog::{HomePage, HomePageProps, YearPage, YearPageProps};
use crate::views::error::{ErrorPage, ErrorPageProps};
use crate::views::history::{HistoryPage, HistoryPageProps};
use crate::views::quiz::{
    FeedbackPage, FeedbackPageProps, QuestionPage, QuestionPageProps, ResultPage,
    ResultPageProps, StartPage, StartPageProps,
};
use crate::views::review::{ReviewListPage, ReviewListPageProps};
use crate::vm::{
    ErrorVm, FeedbackVm, HistoryVm, HomeVm, QuestionVm, ResultVm, ReviewListVm, StartVm,
    YearPageVm,
};

fn render_document<P: Clone + 'static>(root: fn(P) -> Element, props: P) -> String {
    let mut dom = VirtualDom::new_with_props(root, props);
    dom.rebuild_in_place();
    format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">{}</html>",
        dioxus_ssr::render(&dom)
    )
}

#[must_use]
pub fn render_home(vm: HomeVm) -> String {
    render_document(HomePage, HomePageProps { vm })
}

#[must_use]
pub fn render_year(vm: YearPageVm) -> String {
    render_document(YearPage, YearPageProps { vm })
}

#[must_use]
pub fn render_start(vm: StartVm) -> String {
    render_document(StartPage, StartPageProps { vm })
}

#[must_use]
pub fn render_question(vm: QuestionVm) -> String {
    render_document(QuestionPage, QuestionPageProps { vm })
}

#[must_use]
pub fn render_feedback(vm: FeedbackVm) -> String {
    render_document(FeedbackPage, FeedbackPageProps { vm })
}

#[must_use]
pub fn render_result(vm: ResultVm) -> String {
    render_document(ResultPage, ResultPageProps { vm })
}

#[must_use]
pub fn render_history(vm: HistoryVm) -> String {
    render_document(HistoryPage, HistoryPageProps { vm })
}

#[must_use]
pub fn render_review_list(vm: ReviewListVm) -> String {
    render_document(ReviewListPage, ReviewListPageProps { vm })
}

#[must_use]
pub fn render_error(vm: ErrorVm) -> String {
    render_document(ErrorPage, ErrorPageProps { vm })
}
