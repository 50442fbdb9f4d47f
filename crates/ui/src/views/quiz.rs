use dioxus::prelude::*;

use crate::views::layout::Layout;
use crate::vm::{FeedbackVm, QuestionVm, ResultVm, ReviewItemVm, StartVm};

//
// ─── START ─────────────────────────────────────────────────────────────────────
//

#[component]
pub fn StartPage(vm: StartVm) -> Element {
    rsx! {
        Layout { title: vm.scope_label.clone(),
            div { class: "page",
                h1 { "{vm.icon} {vm.scope_label}" }
                p { "{vm.description}" }
                p { class: "muted", "{vm.kind_label} ・ 出題可能な問題: {vm.available}問" }

                form { method: "post", action: "{vm.action}",
                    {vm.year.map(|year| rsx! {
                        input { r#type: "hidden", name: "year", value: "{year}" }
                    })}
                    h2 { "問題数を選んでください" }
                    for count in vm.counts {
                        label { key: "{count.value}", class: "option",
                            input {
                                r#type: "radio",
                                name: "questions",
                                value: "{count.value}",
                                checked: count.selected,
                            }
                            span { class: "letter", "{count.label}" }
                            if count.shortened {
                                span { class: "muted", "（{vm.available}問で出題されます）" }
                            }
                        }
                    }
                    button { r#type: "submit", class: "btn", "演習を開始する" }
                }
                p {
                    a { href: "/", "部門一覧に戻る" }
                }
            }
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[component]
fn ProgressBar(percent: usize) -> Element {
    rsx! {
        div { class: "progress",
            div { class: "progress-bar", style: "width: {percent}%" }
        }
    }
}

#[component]
pub fn QuestionPage(vm: QuestionVm) -> Element {
    let title = format!("問題 {} / {}", vm.number, vm.total);
    rsx! {
        Layout { title: title.clone(),
            div { class: "page",
                p { class: "muted", "{vm.scope_label} ・ 難易度: {vm.difficulty}" }
                h1 { "{title}" }
                ProgressBar { percent: vm.progress_percent }
                div { class: "question-text", "{vm.text}" }

                form { method: "post", action: "/exam",
                    input { r#type: "hidden", name: "csrf_token", value: "{vm.csrf_token}" }
                    for opt in vm.options {
                        label { key: "{opt.letter}", class: "option",
                            input {
                                r#type: "radio",
                                name: "answer",
                                value: "{opt.letter}",
                                required: true,
                            }
                            span { class: "letter", "{opt.letter}" }
                            span { "{opt.text}" }
                        }
                    }
                    button { r#type: "submit", class: "btn", "解答する" }
                }
                p { class: "muted", "問題ID: {vm.question_id}" }
            }
        }
    }
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

#[component]
pub fn FeedbackPage(vm: FeedbackVm) -> Element {
    let title = format!("問題 {} / {} の解答", vm.number, vm.total);
    let verdict = vm.verdict();
    let verdict_class = if vm.is_correct { "verdict correct" } else { "verdict wrong" };
    let next_label = vm.next_label();

    rsx! {
        Layout { title: title.clone(),
            div { class: "page",
                p { class: "muted", "{vm.scope_label}" }
                h1 { "{title}" }
                ProgressBar { percent: vm.progress_percent }
                p { class: verdict_class, "{verdict}" }
                p { "あなたの解答: {vm.chosen} ／ 正解: {vm.correct}（{vm.correct_text}）" }
                div { class: "question-text", "{vm.text}" }

                for opt in vm.options {
                    div { key: "{opt.letter}", class: opt.state_class(),
                        span { class: "letter", "{opt.letter}" }
                        span { "{opt.text}" }
                    }
                }

                h2 { "解説" }
                div { class: "explanation", "{vm.explanation}" }
                {vm.reference.map(|reference| rsx! {
                    p { class: "muted", "出典: {reference}" }
                })}

                p { class: "muted", "ここまでの正解数: {vm.correct_so_far} / {vm.number}" }
                form { method: "post", action: "/exam/next",
                    input { r#type: "hidden", name: "csrf_token", value: "{vm.csrf_token}" }
                    button { r#type: "submit", class: "btn", "{next_label}" }
                }
                form { method: "post", action: "/exam/bookmark",
                    input { r#type: "hidden", name: "csrf_token", value: "{vm.csrf_token}" }
                    button { r#type: "submit", class: "link", "復習リストに追加" }
                }
            }
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

#[component]
pub fn ResultPage(vm: ResultVm) -> Element {
    rsx! {
        Layout { title: "演習結果",
            div { class: "page",
                p { class: "muted", "{vm.scope_label}" }
                h1 { "演習結果" }
                p { class: "score", "{vm.correct} / {vm.total} 問正解" }
                p { "正答率 {vm.accuracy} ・ 所要時間 {vm.duration}" }
                p { "{vm.message}" }
                if !vm.saved {
                    p { class: "notice", "結果を学習履歴に保存できませんでした。" }
                }

                h2 { "解答一覧" }
                table {
                    thead {
                        tr {
                            th { "No." }
                            th { "問題" }
                            th { "解答" }
                            th { "正解" }
                            th { "" }
                        }
                    }
                    tbody {
                        for item in vm.items {
                            ReviewRow { key: "{item.number}", item }
                        }
                    }
                }

                p {
                    a { class: "btn", href: "{vm.retry_href}", "もう一度挑戦する" }
                    " "
                    a { href: "/review", "復習リストを見る" }
                    " "
                    a { href: "/", "部門一覧に戻る" }
                }
            }
        }
    }
}

#[component]
fn ReviewRow(item: ReviewItemVm) -> Element {
    let mark = item.mark();
    rsx! {
        tr {
            td { "{item.number}" }
            td { "{item.text}" }
            td { "{item.chosen}" }
            td { "{item.correct}（{item.correct_text}）" }
            td { "{mark}" }
        }
    }
}
