use std::sync::Arc;

use dioxus::prelude::*;

use shipping_calculator::{
    config::ClientConfig,
    infra::{ApiClient, SessionContext, StoredSession},
    workflow::{fetch_debug_mode, Workflow, ZoneResolver},
};

use crate::ui::{
    assets,
    components::toast::{Toast, ToastMessage},
    pages::{CalculatorPage, SessionPage},
    shell::Shell,
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Calculator {},
    #[route("/session")]
    Session {},
}

/// Collaborators shared by every page.
#[derive(Clone)]
pub struct Services {
    pub config: ClientConfig,
    pub session: Arc<StoredSession>,
    pub client: ApiClient,
    pub resolver: ZoneResolver,
}

#[component]
pub fn App() -> Element {
    let services = use_context::<Services>();

    let workflow = use_signal(|| {
        let session: Arc<dyn SessionContext> = services.session.clone();
        Workflow::new(&services.config, session)
    });
    use_context_provider(|| workflow);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let _startup = use_future(move || {
        let services = services.clone();
        async move { refresh_remote_state(workflow, &services).await }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Reloads the catalog and the debug flag, e.g. after credentials change.
pub async fn refresh_remote_state(mut workflow: Signal<Workflow>, services: &Services) {
    refresh_catalog(workflow, services.client.clone()).await;
    let debug = fetch_debug_mode(services.session.as_ref(), &services.client).await;
    workflow.with_mut(|wf| wf.set_debug_mode(debug));
}

/// Starts a catalog load and applies the outcome if it is still current.
pub async fn refresh_catalog(mut workflow: Signal<Workflow>, client: ApiClient) {
    let Some(ticket) = workflow.with_mut(|wf| wf.begin_catalog_load()) else {
        return;
    };
    let outcome = client.get_products(ticket.query()).await;
    workflow.with_mut(|wf| wf.complete_catalog_load(&ticket, outcome));
}

#[component]
pub fn Calculator() -> Element {
    rsx! { Shell { CalculatorPage {} } }
}

#[component]
pub fn Session() -> Element {
    rsx! { Shell { SessionPage {} } }
}
