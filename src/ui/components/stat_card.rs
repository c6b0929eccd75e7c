use dioxus::prelude::*;

#[component]
pub fn StatCard(title: String, value: String, hint: Option<String>) -> Element {
    rsx! {
        div { class: "stat-card",
            h3 { class: "stat-title", "{title}" }
            p { class: "stat-value", "{value}" }
            if let Some(hint) = hint {
                p { class: "stat-hint", "{hint}" }
            }
        }
    }
}
