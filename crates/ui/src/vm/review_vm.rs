use rccm_core::model::{Question, QuizScope};
use services::{ReviewDepartment, ReviewEntry, ReviewList};

use crate::vm::quiz_vm::{CountOptionVm, count_options};
use crate::vm::time_fmt::format_datetime;

const EXCERPT_CHARS: usize = 60;

/// Questions missed this often are highlighted.
pub const MANY_MISSES: u32 = 3;

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

fn scope_label(question: &Question) -> String {
    match question.year() {
        Some(year) => QuizScope::department_year(question.department(), year).label(),
        None => question.department().name().to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub question_id: String,
    pub scope_label: String,
    pub excerpt: String,
    pub misses: String,
    pub many_misses: bool,
    pub updated_at: String,
}

impl From<&ReviewEntry> for ReviewRowVm {
    fn from(entry: &ReviewEntry) -> Self {
        Self {
            question_id: entry.question.id().to_string(),
            scope_label: scope_label(&entry.question),
            excerpt: excerpt(entry.question.text()),
            misses: match entry.miss_count {
                0 => "ブックマーク".to_string(),
                n => format!("{n}回"),
            },
            many_misses: entry.miss_count >= MANY_MISSES,
            updated_at: format_datetime(entry.updated_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewGroupVm {
    pub name: &'static str,
    pub icon: &'static str,
    pub questions: usize,
    pub action: String,
    pub counts: Vec<CountOptionVm>,
}

impl From<&ReviewDepartment> for ReviewGroupVm {
    fn from(group: &ReviewDepartment) -> Self {
        let department = group.department;
        Self {
            name: department.name(),
            icon: department.icon(),
            questions: group.questions,
            action: format!("/review/start/{}", department.slug()),
            counts: count_options(group.questions),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReviewListVm {
    pub total: usize,
    pub rows: Vec<ReviewRowVm>,
    pub groups: Vec<ReviewGroupVm>,
    pub many_misses: usize,
}

impl From<&ReviewList> for ReviewListVm {
    fn from(list: &ReviewList) -> Self {
        let rows: Vec<ReviewRowVm> = list.entries.iter().map(ReviewRowVm::from).collect();
        Self {
            total: rows.len(),
            many_misses: rows.iter().filter(|r| r.many_misses).count(),
            groups: list.departments.iter().map(ReviewGroupVm::from).collect(),
            rows,
        }
    }
}
