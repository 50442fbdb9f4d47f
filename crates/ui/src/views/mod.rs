mod catalog;
mod error;
mod history;
mod layout;
mod quiz;
mod render;
mod review;

#[cfg(test)]
mod view_smoke;

pub use catalog::{HomePage, YearPage};
pub use error::ErrorPage;
pub use history::HistoryPage;
pub use layout::{Layout, SITE_TITLE};
pub use quiz::{FeedbackPage, QuestionPage, ResultPage, StartPage};
pub use render::{
    render_error, render_feedback, render_history, render_home, render_question, render_result,
    render_review_list, render_start, render_year,
};
pub use review::ReviewListPage;
