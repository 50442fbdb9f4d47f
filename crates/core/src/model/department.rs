use serde::{Deserialize, Serialize};
use std::fmt;

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// Which part of the exam a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 4-1 common subject, shared by every department and not split by year.
    Basic,
    /// 4-2 specialist subject, one file per exam year.
    Specialist,
}

impl QuestionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Basic => "4-1 必須科目",
            QuestionKind::Specialist => "4-2 選択科目",
        }
    }
}

//
// ─── DEPARTMENT ────────────────────────────────────────────────────────────────
//

/// Question group a quiz is drawn from.
///
/// `Basic` holds the common 4-1 questions; every other variant is one of the
/// twelve specialist (4-2) departments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Basic,
    Road,
    Tunnel,
    RiverSabo,
    UrbanPlanning,
    Landscape,
    ConstructionEnvironment,
    SteelConcrete,
    SoilFoundation,
    ConstructionPlanning,
    WaterSupply,
    Forestry,
    Agriculture,
}

impl Department {
    /// Every department in display order.
    pub const ALL: [Department; 13] = [
        Department::Basic,
        Department::Road,
        Department::Tunnel,
        Department::RiverSabo,
        Department::UrbanPlanning,
        Department::Landscape,
        Department::ConstructionEnvironment,
        Department::SteelConcrete,
        Department::SoilFoundation,
        Department::ConstructionPlanning,
        Department::WaterSupply,
        Department::Forestry,
        Department::Agriculture,
    ];

    /// Stable identifier used in URLs and storage.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Department::Basic => "basic",
            Department::Road => "road",
            Department::Tunnel => "tunnel",
            Department::RiverSabo => "civil_planning",
            Department::UrbanPlanning => "urban_planning",
            Department::Landscape => "landscape",
            Department::ConstructionEnvironment => "construction_env",
            Department::SteelConcrete => "steel_concrete",
            Department::SoilFoundation => "soil_foundation",
            Department::ConstructionPlanning => "construction_planning",
            Department::WaterSupply => "water_supply",
            Department::Forestry => "forestry",
            Department::Agriculture => "agriculture",
        }
    }

    /// Japanese category name as it appears in the question files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Department::Basic => "共通",
            Department::Road => "道路",
            Department::Tunnel => "トンネル",
            Department::RiverSabo => "河川、砂防及び海岸・海洋",
            Department::UrbanPlanning => "都市計画及び地方計画",
            Department::Landscape => "造園",
            Department::ConstructionEnvironment => "建設環境",
            Department::SteelConcrete => "鋼構造及びコンクリート",
            Department::SoilFoundation => "土質及び基礎",
            Department::ConstructionPlanning => "施工計画、施工設備及び積算",
            Department::WaterSupply => "上水道及び工業用水道",
            Department::Forestry => "森林土木",
            Department::Agriculture => "農業土木",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Department::Basic => "土木工学基礎、測量、力学等の基礎技術問題（全部門共通）",
            Department::Road => "道路計画、道路設計、道路施工に関する専門技術",
            Department::Tunnel => "トンネル計画、設計、施工に関する専門技術",
            Department::RiverSabo => "河川工学、砂防工学、海岸・海洋工学に関する専門技術",
            Department::UrbanPlanning => "都市計画、地方計画に関する専門技術",
            Department::Landscape => "造園計画、設計、施工に関する専門技術",
            Department::ConstructionEnvironment => "建設環境、環境保全に関する専門技術",
            Department::SteelConcrete => "鋼構造、コンクリート構造に関する専門技術",
            Department::SoilFoundation => "土質工学、基礎工学に関する専門技術",
            Department::ConstructionPlanning => "施工計画、施工設備、積算に関する専門技術",
            Department::WaterSupply => "上水道、工業用水道に関する専門技術",
            Department::Forestry => "森林土木、治山工事に関する専門技術",
            Department::Agriculture => "農業基盤整備に関する専門技術",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Department::Basic => "📚",
            Department::Road => "🛣️",
            Department::Tunnel => "🚇",
            Department::RiverSabo => "🌊",
            Department::UrbanPlanning => "🏙️",
            Department::Landscape => "🌸",
            Department::ConstructionEnvironment => "🌱",
            Department::SteelConcrete => "🏗️",
            Department::SoilFoundation => "🪨",
            Department::ConstructionPlanning => "📋",
            Department::WaterSupply => "💧",
            Department::Forestry => "🌲",
            Department::Agriculture => "🌾",
        }
    }

    #[must_use]
    pub fn kind(self) -> QuestionKind {
        match self {
            Department::Basic => QuestionKind::Basic,
            _ => QuestionKind::Specialist,
        }
    }

    #[must_use]
    pub fn is_basic(self) -> bool {
        self.kind() == QuestionKind::Basic
    }

    /// Specialist departments only, in display order.
    pub fn specialists() -> impl Iterator<Item = Department> {
        Self::ALL.into_iter().filter(|d| !d.is_basic())
    }

    /// Look up a department by URL slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.slug() == slug)
    }

    /// Map a category name from a question file to a department.
    ///
    /// Older files spell some long department names differently, so the
    /// compound names are matched on their key terms rather than exactly.
    #[must_use]
    pub fn from_category(category: &str) -> Option<Self> {
        let category = category.trim();
        if let Some(exact) = Self::ALL.into_iter().find(|d| d.name() == category) {
            return Some(exact);
        }

        if category.contains("河川") && category.contains("砂防") {
            Some(Department::RiverSabo)
        } else if category.contains("都市計画") && category.contains("地方計画") {
            Some(Department::UrbanPlanning)
        } else if category.contains("鋼構造") && category.contains("コンクリート") {
            Some(Department::SteelConcrete)
        } else if category.contains("土質") && category.contains("基礎") {
            Some(Department::SoilFoundation)
        } else if category.contains("施工計画") {
            Some(Department::ConstructionPlanning)
        } else if category.contains("上水道") {
            Some(Department::WaterSupply)
        } else {
            None
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
