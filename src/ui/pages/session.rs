use dioxus::prelude::*;

use shipping_calculator::infra::SessionContext;
use shipping_calculator::util::persistence::{config_file, session_file};
use shipping_calculator::workflow::Workflow;

use crate::app::{refresh_remote_state, Services};
use crate::ui::components::toast::{push_toast, ToastKind, ToastMessage};

#[component]
pub fn SessionPage() -> Element {
    let services = use_context::<Services>();
    let workflow = use_context::<Signal<Workflow>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let mut token_input = use_signal(String::new);
    let mut customer_input =
        use_signal(|| services.session.customer_id().unwrap_or_default());
    // Bumped after session changes so the status line re-renders.
    let mut revision = use_signal(|| 0u32);
    let signed_in = revision.with(|_| services.session.is_authenticated());
    let customer = services
        .session
        .customer_id()
        .unwrap_or_else(|| "none".to_string());
    let base_url = services.config.api_base_url.to_string();
    let origin_zip = services.config.origin_zip.clone();
    let timeout = services.config.timeout.as_secs();
    let config_path = config_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());
    let session_path = session_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "in memory only".to_string());

    let save_services = services.clone();
    let on_save = move |_| {
        let token = token_input().trim().to_string();
        if token.is_empty() {
            push_toast(toasts, ToastKind::Warning, "Enter an access token first.");
            return;
        }
        let customer = customer_input().trim().to_string();
        let customer = (!customer.is_empty()).then_some(customer);

        match save_services.session.set_credentials(token, customer) {
            Ok(()) => push_toast(toasts, ToastKind::Success, "Session saved."),
            Err(err) => push_toast(
                toasts,
                ToastKind::Warning,
                format!("Session active but not persisted: {err}"),
            ),
        }
        token_input.set(String::new());
        revision += 1;

        let services = save_services.clone();
        spawn(async move { refresh_remote_state(workflow, &services).await });
    };

    let clear_services = services.clone();
    let on_clear = move |_| {
        clear_services.session.on_unauthorized();
        revision += 1;
        push_toast(toasts, ToastKind::Info, "Access token cleared.");
    };

    rsx! {
        section { class: "panel",
            h2 { "Session" }
            table { class: "table",
                tbody {
                    tr { td { "Status" } td { if signed_in { "Signed in" } else { "Not signed in" } } }
                    tr { td { "Customer" } td { "{customer}" } }
                    tr { td { "API" } td { "{base_url}" } }
                    tr { td { "Origin ZIP" } td { "{origin_zip}" } }
                    tr { td { "Timeout" } td { "{timeout} s" } }
                    tr { td { "Config file" } td { class: "muted", "{config_path}" } }
                    tr { td { "Session file" } td { class: "muted", "{session_path}" } }
                }
            }
        }
        section { class: "panel",
            h3 { "Credentials" }
            label { class: "field",
                span { "Access token" }
                input {
                    r#type: "password",
                    value: "{token_input}",
                    oninput: move |evt| token_input.set(evt.value()),
                }
            }
            label { class: "field",
                span { "Customer ID" }
                input {
                    r#type: "text",
                    value: "{customer_input}",
                    oninput: move |evt| customer_input.set(evt.value()),
                }
            }
            div { class: "actions",
                button { onclick: on_clear, disabled: !signed_in, "Clear Token" }
                button { class: "primary", onclick: on_save, "Save" }
            }
        }
    }
}
