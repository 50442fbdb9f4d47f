use dioxus::prelude::*;

use crate::views::layout::Layout;
use crate::vm::{DepartmentCardVm, HomeVm, YearPageVm};

#[component]
pub fn HomePage(vm: HomeVm) -> Element {
    rsx! {
        Layout { title: "部門一覧",
            div { class: "page",
                h1 { "RCCM試験 過去問題演習" }
                p { class: "muted", "収録問題数: {vm.total_questions}問" }

                {vm.basic.map(|basic| rsx! {
                    h2 { "4-1 必須科目（共通）" }
                    div { class: "card-grid",
                        DepartmentCard { card: basic }
                    }
                })}

                h2 { "4-2 選択科目（専門）" }
                div { class: "card-grid",
                    for card in vm.specialists {
                        DepartmentCard { key: "{card.slug}", card }
                    }
                }

                h2 { "年度別に解く" }
                if vm.years.is_empty() {
                    p { class: "muted", "年度別の問題はまだありません。" }
                } else {
                    ul { class: "year-list",
                        for year in vm.years {
                            li { key: "{year.year}",
                                a { href: "{year.href}", "{year.year}年度（{year.questions}問）" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn YearPage(vm: YearPageVm) -> Element {
    let title = format!("{}年度", vm.year);
    rsx! {
        Layout { title: title.clone(),
            div { class: "page",
                h1 { "{title}の選択科目" }
                p { class: "muted", "この年度の問題数: {vm.questions}問" }
                div { class: "card-grid",
                    for card in vm.departments {
                        DepartmentCard { key: "{card.slug}", card }
                    }
                }
                p {
                    a { href: "/", "部門一覧に戻る" }
                }
            }
        }
    }
}

#[component]
fn DepartmentCard(card: DepartmentCardVm) -> Element {
    if !card.is_available() {
        return rsx! {
            div { class: "card disabled",
                span { class: "icon", "{card.icon}" }
                h3 { "{card.name}" }
                p { class: "count", "問題準備中" }
            }
        };
    }

    rsx! {
        a { class: "card", href: "{card.href}",
            span { class: "icon", "{card.icon}" }
            h3 { "{card.name}" }
            p { "{card.description}" }
            p { class: "count", "{card.kind_label} ・ {card.questions}問" }
        }
    }
}
