use rccm_core::model::{Department, ExamYear};
use services::{Catalog, DepartmentCount, YearEntry};

/// Link target of the start page for a department, optionally fixed to a year.
#[must_use]
pub fn start_href(department: Department, year: Option<ExamYear>) -> String {
    match year {
        Some(year) if !department.is_basic() => {
            format!("/start_exam/{}?year={year}", department.slug())
        }
        _ => format!("/start_exam/{}", department.slug()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentCardVm {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub kind_label: &'static str,
    pub questions: usize,
    pub href: String,
}

impl DepartmentCardVm {
    fn new(entry: &DepartmentCount, year: Option<ExamYear>) -> Self {
        let department = entry.department;
        Self {
            slug: department.slug(),
            name: department.name(),
            description: department.description(),
            icon: department.icon(),
            kind_label: department.kind().label(),
            questions: entry.questions,
            href: start_href(department, year),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.questions > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearLinkVm {
    pub year: u16,
    pub questions: usize,
    pub href: String,
}

impl From<&YearEntry> for YearLinkVm {
    fn from(entry: &YearEntry) -> Self {
        Self {
            year: entry.year.value(),
            questions: entry.questions(),
            href: format!("/year/{}", entry.year),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeVm {
    pub total_questions: usize,
    pub basic: Option<DepartmentCardVm>,
    pub specialists: Vec<DepartmentCardVm>,
    pub years: Vec<YearLinkVm>,
}

impl From<&Catalog> for HomeVm {
    fn from(catalog: &Catalog) -> Self {
        let mut basic = None;
        let mut specialists = Vec::new();
        for entry in &catalog.departments {
            let card = DepartmentCardVm::new(entry, None);
            if entry.department.is_basic() {
                basic = Some(card);
            } else {
                specialists.push(card);
            }
        }

        Self {
            total_questions: catalog.total_questions,
            basic,
            specialists,
            years: catalog.years.iter().map(YearLinkVm::from).collect(),
        }
    }
}

/// Departments with questions in one exam year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearPageVm {
    pub year: u16,
    pub questions: usize,
    pub departments: Vec<DepartmentCardVm>,
}

impl From<&YearEntry> for YearPageVm {
    fn from(entry: &YearEntry) -> Self {
        Self {
            year: entry.year.value(),
            questions: entry.questions(),
            departments: entry
                .departments
                .iter()
                .filter(|d| d.questions > 0)
                .map(|d| DepartmentCardVm::new(d, Some(entry.year)))
                .collect(),
        }
    }
}
