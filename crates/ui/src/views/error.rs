use dioxus::prelude::*;

use crate::views::layout::Layout;
use crate::vm::ErrorVm;

#[component]
pub fn ErrorPage(vm: ErrorVm) -> Element {
    rsx! {
        Layout { title: vm.title.clone(),
            div { class: "page",
                h1 { "{vm.title}" }
                p { class: "muted", "ステータス {vm.status}" }
                p { "{vm.message}" }
                p {
                    a { class: "btn", href: "/", "部門一覧に戻る" }
                }
            }
        }
    }
}
