use dioxus::prelude::*;

use shipping_calculator::util::version::{version_label, APP_NAME};

use crate::app::{Route, Services};

#[component]
pub fn Shell(children: Element) -> Element {
    let services = use_context::<Services>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let signed_in = services.session.is_authenticated();
    let session_badge = if signed_in { "Signed in" } else { "Not signed in" };
    let badge_class = if signed_in { "badge badge-ok" } else { "badge badge-warn" };

    rsx! {
        div { class: "app",
            header { class: "app-header",
                div { class: "app-title",
                    h1 { "{APP_NAME}" }
                    span { class: "muted", "{version_label()}" }
                }
                nav { class: "app-nav",
                    NavButton {
                        active: matches!(current_route, Route::Calculator {}),
                        onclick: move |_| { nav.push(Route::Calculator {}); },
                        label: "Calculator",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Session {}),
                        onclick: move |_| { nav.push(Route::Session {}); },
                        label: "Session",
                    }
                    span { class: "{badge_class}", "{session_badge}" }
                }
            }
            main { class: "app-main",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { "nav-button active" } else { "nav-button" };
    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
