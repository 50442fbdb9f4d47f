use dioxus::prelude::*;

use crate::views::layout::Layout;
use crate::vm::HistoryVm;

#[component]
pub fn HistoryPage(vm: HistoryVm) -> Element {
    rsx! {
        Layout { title: "学習履歴",
            div { class: "page",
                h1 { "学習履歴" }

                if vm.rows.is_empty() {
                    p { "まだ演習結果がありません。" }
                } else {
                    h2 { "部門別の成績" }
                    table {
                        thead {
                            tr {
                                th { "部門" }
                                th { "回数" }
                                th { "解答数" }
                                th { "正答率" }
                            }
                        }
                        tbody {
                            for stats in vm.departments {
                                tr { key: "{stats.name}",
                                    td { "{stats.name}" }
                                    td { "{stats.quizzes}" }
                                    td { "{stats.answered}" }
                                    td { "{stats.accuracy}" }
                                }
                            }
                        }
                    }

                    h2 { "最近の演習" }
                    table {
                        thead {
                            tr {
                                th { "完了日時" }
                                th { "範囲" }
                                th { "正解" }
                                th { "正答率" }
                                th { "所要時間" }
                            }
                        }
                        tbody {
                            for row in vm.rows {
                                tr { key: "{row.id}",
                                    td { "{row.completed_at}" }
                                    td { "{row.scope_label}" }
                                    td { "{row.score}" }
                                    td { "{row.accuracy}" }
                                    td { "{row.duration}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
