use services::{DepartmentStats, QuizHistory, QuizHistoryItem};

use crate::vm::time_fmt::{format_datetime, format_minutes, format_percent};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub id: i64,
    pub scope_label: String,
    pub completed_at: String,
    pub score: String,
    pub accuracy: String,
    pub duration: String,
}

impl From<&QuizHistoryItem> for HistoryRowVm {
    fn from(item: &QuizHistoryItem) -> Self {
        Self {
            id: item.id,
            scope_label: item.scope.label(),
            completed_at: format_datetime(item.completed_at),
            score: format!("{} / {}", item.correct, item.total),
            accuracy: format_percent(item.accuracy_percent),
            duration: format_minutes(item.duration_minutes),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentStatsVm {
    pub name: &'static str,
    pub quizzes: usize,
    pub answered: u32,
    pub accuracy: String,
}

impl From<&DepartmentStats> for DepartmentStatsVm {
    fn from(stats: &DepartmentStats) -> Self {
        Self {
            name: stats.department.name(),
            quizzes: stats.quizzes,
            answered: stats.answered,
            accuracy: format_percent(stats.accuracy_percent()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HistoryVm {
    pub rows: Vec<HistoryRowVm>,
    pub departments: Vec<DepartmentStatsVm>,
}

impl From<&QuizHistory> for HistoryVm {
    fn from(history: &QuizHistory) -> Self {
        Self {
            rows: history.items.iter().map(HistoryRowVm::from).collect(),
            departments: history
                .per_department
                .iter()
                .map(DepartmentStatsVm::from)
                .collect(),
        }
    }
}
