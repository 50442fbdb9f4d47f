use dioxus::prelude::*;

use crate::views::layout::Layout;
use crate::vm::{MANY_MISSES, ReviewGroupVm, ReviewListVm};

#[component]
pub fn ReviewListPage(vm: ReviewListVm) -> Element {
    rsx! {
        Layout { title: "復習リスト",
            div { class: "page",
                h1 { "復習リスト" }

                if vm.rows.is_empty() {
                    p { "まだ復習問題が登録されていません。間違えた問題は演習の終了時に追加されます。" }
                } else {
                    p { class: "muted",
                        "登録数: {vm.total}問 ・ {MANY_MISSES}回以上間違えた問題: {vm.many_misses}問"
                    }

                    h2 { "部門別に復習する" }
                    div { class: "card-grid",
                        for group in vm.groups {
                            ReviewGroup { key: "{group.action}", group }
                        }
                    }

                    h2 { "登録されている問題" }
                    table {
                        thead {
                            tr {
                                th { "範囲" }
                                th { "問題" }
                                th { "間違い" }
                                th { "更新日時" }
                                th { "" }
                            }
                        }
                        tbody {
                            for row in vm.rows {
                                tr { key: "{row.question_id}",
                                    td { "{row.scope_label}" }
                                    td { "{row.excerpt}" }
                                    td { class: if row.many_misses { "many" } else { "" }, "{row.misses}" }
                                    td { "{row.updated_at}" }
                                    td {
                                        form { method: "post", action: "/review/remove",
                                            input { r#type: "hidden", name: "question_id", value: "{row.question_id}" }
                                            button { r#type: "submit", class: "link", "削除" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ReviewGroup(group: ReviewGroupVm) -> Element {
    rsx! {
        div { class: "card",
            div { class: "icon", "{group.icon}" }
            strong { "{group.name}" }
            p { class: "count", "{group.questions}問" }
            form { method: "post", action: "{group.action}",
                select { name: "questions",
                    for count in group.counts {
                        option { key: "{count.value}", value: "{count.value}", selected: count.selected,
                            "{count.label}"
                        }
                    }
                }
                " "
                button { r#type: "submit", class: "btn", "復習を開始" }
            }
        }
    }
}
