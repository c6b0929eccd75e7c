use std::time::Duration;

use dioxus::prelude::*;

use shipping_calculator::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Success => "toast toast-success",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let message = ToastMessage {
        id: generate_id("toast"),
        kind,
        text: message.into(),
    };
    toasts.with_mut(|entries| {
        if entries.len() >= MAX_TOASTS {
            entries.remove(0);
        }
        entries.push(message);
    });
}

fn dismiss(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|entries| entries.retain(|toast| toast.id != id));
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        ul { class: "toasts",
            for message in messages {
                ToastCard { key: "{message.id}", message, toasts }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let timer_id = message.id.clone();
    let _auto_dismiss = use_future(move || {
        let id = timer_id.clone();
        async move {
            tokio::time::sleep(TOAST_AUTO_DISMISS).await;
            dismiss(toasts, &id);
        }
    });

    let id = message.id.clone();
    rsx! {
        li { class: message.kind.class(),
            p { "{message.text}" }
            button {
                class: "link",
                onclick: move |_| dismiss(toasts, &id),
                "Dismiss"
            }
        }
    }
}
