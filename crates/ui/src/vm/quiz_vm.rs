use rccm_core::model::{Choice, ExamYear, Question, QuestionCount, QuizScope, QuizSummary};
use services::{AnswerFeedback, AnsweredQuestion, QuizProgress};

use crate::vm::catalog_vm::start_href;
use crate::vm::time_fmt::{format_minutes, format_percent};

const NO_EXPLANATION: &str = "この問題の解説は登録されていません。";

//
// ─── START ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountOptionVm {
    pub value: usize,
    pub label: String,
    /// Fewer questions than this exist, so the quiz will be shorter.
    pub shortened: bool,
    pub selected: bool,
}

/// The 10/20/30 choices, flagging those the pool cannot fill.
#[must_use]
pub fn count_options(available: usize) -> Vec<CountOptionVm> {
    QuestionCount::ALL
        .into_iter()
        .map(|count| CountOptionVm {
            value: count.get(),
            label: format!("{}問", count.get()),
            shortened: count.get() > available,
            selected: count == QuestionCount::Ten,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartVm {
    pub scope_label: String,
    pub icon: &'static str,
    pub description: &'static str,
    pub kind_label: &'static str,
    pub available: usize,
    pub action: String,
    pub year: Option<u16>,
    pub counts: Vec<CountOptionVm>,
}

impl StartVm {
    #[must_use]
    pub fn new(scope: QuizScope, available: usize) -> Self {
        let department = scope.department;
        Self {
            scope_label: scope.label(),
            icon: department.icon(),
            description: department.description(),
            kind_label: department.kind().label(),
            available,
            action: format!("/start_exam/{}", department.slug()),
            year: scope.year.map(ExamYear::value),
            counts: count_options(available),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: char,
    pub text: String,
    pub is_correct: bool,
    pub is_chosen: bool,
}

impl OptionVm {
    /// CSS class used on the feedback page.
    #[must_use]
    pub fn state_class(&self) -> &'static str {
        match (self.is_correct, self.is_chosen) {
            (true, _) => "option correct",
            (false, true) => "option wrong",
            (false, false) => "option",
        }
    }
}

fn options(question: &Question, chosen: Option<Choice>) -> Vec<OptionVm> {
    question
        .options()
        .map(|(choice, text)| OptionVm {
            letter: choice.letter(),
            text: text.to_string(),
            is_correct: chosen.is_some() && question.is_correct(choice),
            is_chosen: chosen == Some(choice),
        })
        .collect()
}

fn progress_percent(done: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    done * 100 / total
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub scope_label: String,
    pub number: usize,
    pub total: usize,
    pub progress_percent: usize,
    pub question_id: String,
    pub difficulty: String,
    pub text: String,
    pub options: Vec<OptionVm>,
    pub csrf_token: String,
}

impl QuestionVm {
    #[must_use]
    pub fn new(
        scope: QuizScope,
        question: &Question,
        progress: QuizProgress,
        csrf_token: &str,
    ) -> Self {
        Self {
            scope_label: scope.label(),
            number: progress.current_number,
            total: progress.total,
            progress_percent: progress_percent(progress.answered, progress.total),
            question_id: question.id().to_string(),
            difficulty: question.difficulty().to_string(),
            text: question.text().to_string(),
            options: options(question, None),
            csrf_token: csrf_token.to_string(),
        }
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackVm {
    pub scope_label: String,
    pub number: usize,
    pub total: usize,
    pub progress_percent: usize,
    pub text: String,
    pub is_correct: bool,
    pub chosen: char,
    pub correct: char,
    pub correct_text: String,
    pub options: Vec<OptionVm>,
    pub explanation: String,
    pub reference: Option<String>,
    pub is_last: bool,
    pub csrf_token: String,
    pub correct_so_far: usize,
}

impl FeedbackVm {
    #[must_use]
    pub fn new(
        scope: QuizScope,
        feedback: &AnswerFeedback,
        correct_so_far: usize,
        csrf_token: &str,
    ) -> Self {
        let question = &feedback.question;
        let explanation = match question.explanation() {
            "" => NO_EXPLANATION.to_string(),
            text => text.to_string(),
        };
        let reference = Some(question.reference())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Self {
            scope_label: scope.label(),
            number: feedback.progress.current_number,
            total: feedback.progress.total,
            progress_percent: progress_percent(feedback.progress.answered, feedback.progress.total),
            text: question.text().to_string(),
            is_correct: feedback.is_correct(),
            chosen: feedback.record.chosen.letter(),
            correct: feedback.record.correct.letter(),
            correct_text: question.option(feedback.record.correct).to_string(),
            options: options(question, Some(feedback.record.chosen)),
            explanation,
            reference,
            is_last: feedback.is_last(),
            csrf_token: csrf_token.to_string(),
            correct_so_far,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.is_correct { "正解" } else { "不正解" }
    }

    #[must_use]
    pub fn next_label(&self) -> &'static str {
        if self.is_last { "結果を見る" } else { "次の問題へ" }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub number: usize,
    pub text: String,
    pub chosen: char,
    pub correct: char,
    pub correct_text: String,
    pub is_correct: bool,
}

impl ReviewItemVm {
    fn new(number: usize, answered: &AnsweredQuestion) -> Self {
        Self {
            number,
            text: answered.question.text().to_string(),
            chosen: answered.record.chosen.letter(),
            correct: answered.record.correct.letter(),
            correct_text: answered.question.option(answered.record.correct).to_string(),
            is_correct: answered.record.is_correct(),
        }
    }

    #[must_use]
    pub fn mark(&self) -> &'static str {
        if self.is_correct { "○" } else { "×" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub scope_label: String,
    pub correct: u32,
    pub total: u32,
    pub accuracy: String,
    pub duration: String,
    pub message: &'static str,
    pub items: Vec<ReviewItemVm>,
    pub retry_href: String,
    pub saved: bool,
}

/// Encouragement shown under the score.
#[must_use]
pub fn grade_message(accuracy_percent: f64) -> &'static str {
    if accuracy_percent >= 80.0 {
        "素晴らしい成績です。この調子で他の年度にも挑戦しましょう。"
    } else if accuracy_percent >= 60.0 {
        "合格ラインに届いています。間違えた問題を復習しましょう。"
    } else {
        "解説を読み直して、もう一度挑戦しましょう。"
    }
}

impl ResultVm {
    #[must_use]
    pub fn new(summary: &QuizSummary, answered: &[AnsweredQuestion], saved: bool) -> Self {
        let scope = summary.scope();
        let accuracy = summary.accuracy_percent();
        Self {
            scope_label: scope.label(),
            correct: summary.correct(),
            total: summary.total(),
            accuracy: format_percent(accuracy),
            duration: format_minutes(summary.duration_minutes()),
            message: grade_message(accuracy),
            items: answered
                .iter()
                .enumerate()
                .map(|(i, a)| ReviewItemVm::new(i + 1, a))
                .collect(),
            retry_href: start_href(scope.department, scope.year),
            saved,
        }
    }
}
