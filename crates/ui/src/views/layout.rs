use dioxus::prelude::*;

pub const SITE_TITLE: &str = "RCCM試験 問題演習";

const STYLES: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:"Hiragino Sans","Noto Sans JP",sans-serif;background:#f4f6f9;color:#1f2933;line-height:1.7}
header{background:#1d4e89;color:#fff;padding:12px 20px;display:flex;justify-content:space-between;align-items:center}
header a{color:#fff;text-decoration:none;margin-left:16px}
header .brand{font-weight:bold;margin-left:0}
main{max-width:880px;margin:0 auto;padding:20px}
footer{text-align:center;color:#7b8794;font-size:.85em;padding:24px}
.page h1{font-size:1.5em;margin:.2em 0 .6em}
.card-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:12px}
.card{display:block;background:#fff;border-radius:8px;padding:14px;box-shadow:0 1px 3px rgba(0,0,0,.08);color:inherit;text-decoration:none}
.card.disabled{opacity:.5}
.card .icon{font-size:1.6em}
.card .count,.muted{color:#7b8794;font-size:.9em}
.year-list{display:flex;flex-wrap:wrap;gap:8px;padding:0;list-style:none}
.year-list a{display:block;background:#fff;border-radius:6px;padding:6px 12px;text-decoration:none}
.progress{background:#d9e2ec;border-radius:4px;height:8px;margin:8px 0 16px}
.progress-bar{background:#3e7cb1;height:8px;border-radius:4px}
.question-text{background:#fff;border-radius:8px;padding:16px;white-space:pre-wrap}
.option{display:block;background:#fff;border:2px solid #d9e2ec;border-radius:8px;padding:10px 14px;margin:8px 0}
.option.correct{border-color:#2f9e44;background:#ebfbee}
.option.wrong{border-color:#e03131;background:#fff5f5}
.option .letter{font-weight:bold;margin-right:8px}
.verdict{font-size:1.4em;font-weight:bold}
.verdict.correct{color:#2f9e44}
.verdict.wrong{color:#e03131}
.explanation{background:#fff;border-left:4px solid #3e7cb1;padding:12px 16px;white-space:pre-wrap}
.btn{display:inline-block;background:#1d4e89;color:#fff;border:none;border-radius:6px;padding:10px 22px;font-size:1em;cursor:pointer;text-decoration:none}
.score{font-size:2.2em;font-weight:bold}
table{width:100%;border-collapse:collapse;background:#fff}
th,td{padding:8px;border-bottom:1px solid #e4e7eb;text-align:left}
.notice{background:#fff3bf;padding:8px 12px;border-radius:6px}
form.inline{display:inline}
button.link{background:none;border:none;padding:0;color:inherit;font:inherit;text-decoration:underline;cursor:pointer}
header button.link{color:#fff;margin-left:16px;text-decoration:none}
td.many{color:#e03131;font-weight:bold}
"#;

#[component]
pub fn Layout(#[props(into)] title: String, children: Element) -> Element {
    rsx! {
        head {
            meta { charset: "utf-8" }
            meta { name: "viewport", content: "width=device-width, initial-scale=1" }
            title { "{title} | {SITE_TITLE}" }
            style { dangerous_inner_html: STYLES }
        }
        body {
            header {
                a { class: "brand", href: "/", "{SITE_TITLE}" }
                nav {
                    a { href: "/", "部門一覧" }
                    a { href: "/review", "復習リスト" }
                    a { href: "/history", "学習履歴" }
                    form { class: "inline", method: "post", action: "/reset",
                        button { r#type: "submit", class: "link", "リセット" }
                    }
                }
            }
            main { {children} }
            footer { "RCCM 過去問題演習" }
        }
    }
}
