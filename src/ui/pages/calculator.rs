use dioxus::prelude::*;

use shipping_calculator::domain::{
    format_weight, is_complete_zip, CatalogItem, ServiceLevel, MAX_LINE_QUANTITY,
};
use shipping_calculator::workflow::{Step, Workflow};

use crate::app::{refresh_catalog, Services};
use crate::ui::components::{
    result_view::ResultView,
    stat_card::StatCard,
    step_indicator::StepIndicator,
    toast::{push_toast, ToastKind, ToastMessage},
};

#[component]
pub fn CalculatorPage() -> Element {
    let workflow = use_context::<Signal<Workflow>>();
    let (step, error) = workflow.with(|wf| (wf.step(), wf.error().map(str::to_string)));

    rsx! {
        div { class: "calculator",
            StepIndicator { current: step }
            if let Some(message) = error {
                div { class: "alert", "{message}" }
            }
            match step {
                Step::DestinationAndService => rsx! { DestinationStep {} },
                Step::ProductSelection => rsx! { ProductStep {} },
                Step::Review => rsx! { ReviewStep {} },
                Step::Calculate => rsx! { CalculateStep {} },
                Step::Results => rsx! { ResultsStep {} },
            }
        }
    }
}

/// Advances and reports a blocked transition as a toast.
fn advance(mut workflow: Signal<Workflow>, toasts: Signal<Vec<ToastMessage>>) {
    if let Err(err) = workflow.with_mut(|wf| wf.advance()) {
        push_toast(toasts, ToastKind::Warning, err.to_string());
    }
}

#[component]
fn DestinationStep() -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let services = use_context::<Services>();

    let (zip, level, zone, pending) = workflow.with(|wf| {
        (
            wf.destination_zip().to_string(),
            wf.service_level(),
            wf.zone().map(|zone| zone.label()),
            wf.is_zone_pending(),
        )
    });
    let can_continue = is_complete_zip(&zip);

    let resolver = services.resolver.clone();
    let on_zip = move |evt: FormEvent| {
        let value = evt.value();
        let Some(ticket) = workflow.with_mut(|wf| wf.set_destination_zip(&value)) else {
            return;
        };
        let resolver = resolver.clone();
        spawn(async move {
            let resolution = resolver.resolve(ticket.zip()).await;
            workflow.with_mut(|wf| wf.apply_zone(&ticket, resolution));
        });
    };

    rsx! {
        section { class: "panel",
            h2 { "Destination & service" }
            label { class: "field",
                span { "Service level" }
                select {
                    onchange: move |evt| {
                        if let Ok(level) = evt.value().parse::<ServiceLevel>() {
                            workflow.with_mut(|wf| wf.set_service_level(level));
                        }
                    },
                    for option_level in ServiceLevel::ALL {
                        option {
                            value: "{option_level.as_str()}",
                            selected: option_level == level,
                            "{option_level.label()}"
                        }
                    }
                }
            }
            label { class: "field",
                span { "Destination ZIP" }
                input {
                    r#type: "text",
                    maxlength: "5",
                    placeholder: "60540",
                    value: "{zip}",
                    oninput: on_zip,
                }
            }
            match zone {
                Some(label) => rsx! { p { class: "zone ok", "✓ {label} detected" } },
                None if pending => rsx! { p { class: "zone muted", "Looking up zone…" } },
                None if can_continue => rsx! { p { class: "zone muted", "Zone unavailable" } },
                None => rsx! { p { class: "zone muted", "Enter a 5-digit ZIP code" } },
            }
            div { class: "actions",
                span {}
                button {
                    class: "primary",
                    disabled: !can_continue,
                    onclick: move |_| advance(workflow, toasts),
                    "Next: Select Products"
                }
            }
        }
    }
}

#[component]
fn ProductStep() -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let services = use_context::<Services>();
    let mut query = use_signal(String::new);

    let (products, loading, message, cart_empty, total_weight) = workflow.with(|wf| {
        let products: Vec<(CatalogItem, u32)> = wf
            .filtered_catalog(&query())
            .into_iter()
            .map(|item| (item.clone(), wf.cart().quantity_of(&item.id)))
            .collect();
        (
            products,
            wf.catalog().is_loading(),
            wf.catalog().message().map(str::to_string),
            wf.cart().is_empty(),
            wf.cart().total_weight(),
        )
    });

    let client = services.client.clone();
    let on_retry = move |_| {
        let client = client.clone();
        spawn(async move { refresh_catalog(workflow, client).await });
    };

    rsx! {
        section { class: "panel",
            h2 { "Select products" }
            input {
                r#type: "search",
                placeholder: "Search by name or SKU",
                value: "{query}",
                oninput: move |evt| query.set(evt.value()),
            }
            if loading {
                p { class: "muted", "Loading products…" }
            } else if let Some(message) = message {
                div { class: "empty",
                    p { "{message}" }
                    button { onclick: on_retry, "Retry" }
                }
            } else {
                table { class: "table",
                    thead {
                        tr {
                            th { "Product" }
                            th { "SKU" }
                            th { "Dimensions" }
                            th { class: "num", "Weight" }
                            th { class: "num", "Quantity" }
                        }
                    }
                    tbody {
                        for (item, quantity) in products {
                            ProductRow { key: "{item.id}", item, quantity }
                        }
                    }
                }
            }
            p { class: "muted", "Cart weight: {format_weight(total_weight)}" }
            div { class: "actions",
                button { onclick: move |_| { workflow.with_mut(|wf| wf.back()); }, "Back" }
                button {
                    class: "primary",
                    disabled: cart_empty,
                    onclick: move |_| advance(workflow, toasts),
                    "Next: Review Order"
                }
            }
        }
    }
}

#[component]
fn ProductRow(item: CatalogItem, quantity: u32) -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let quantity_value = i64::from(quantity);
    let decrement_item = item.clone();
    let increment_item = item.clone();
    let input_item = item.clone();

    rsx! {
        tr {
            td { "{item.name}" }
            td { class: "muted", "{item.sku}" }
            td { "{item.dimensions_label()}" }
            td { class: "num", "{format_weight(item.weight)}" }
            td { class: "num stepper",
                button {
                    disabled: quantity == 0,
                    onclick: move |_| {
                        workflow.with_mut(|wf| wf.set_quantity(&decrement_item, quantity_value - 1));
                    },
                    "−"
                }
                input {
                    r#type: "number",
                    min: "0",
                    max: "{MAX_LINE_QUANTITY}",
                    value: "{quantity}",
                    oninput: move |evt| {
                        let requested = evt.value().trim().parse::<i64>().unwrap_or(0);
                        workflow.with_mut(|wf| wf.set_quantity(&input_item, requested));
                    },
                }
                button {
                    onclick: move |_| {
                        workflow.with_mut(|wf| wf.add_product(&increment_item));
                    },
                    "+"
                }
            }
        }
    }
}

#[component]
fn ReviewStep() -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let (summary, lines) = workflow.with(|wf| {
        let lines: Vec<(String, u32, f64)> = wf
            .cart()
            .lines()
            .iter()
            .map(|line| (line.item().name.clone(), line.quantity(), line.total_weight()))
            .collect();
        (wf.review_summary(), lines)
    });

    rsx! {
        section { class: "panel",
            h2 { "Review order" }
            div { class: "stat-grid",
                StatCard {
                    title: "Destination".to_string(),
                    value: summary.destination_label(),
                    hint: Some(summary.service_level.label().to_string()),
                }
                StatCard {
                    title: "Units".to_string(),
                    value: summary.unit_count.to_string(),
                    hint: Some(format!("{} products", summary.line_count)),
                }
                StatCard {
                    title: "Dry ice".to_string(),
                    value: format_weight(summary.packaging_weight),
                    hint: Some(format!("{} packs", summary.packaging_count)),
                }
                StatCard {
                    title: "Total weight".to_string(),
                    value: format_weight(summary.total_weight),
                    hint: Some(format!("Products {}", format_weight(summary.product_weight))),
                }
            }
            table { class: "table",
                tbody {
                    for (index, (name, quantity, weight)) in lines.into_iter().enumerate() {
                        tr { key: "{index}",
                            td { "{name}" }
                            td { class: "num", "× {quantity}" }
                            td { class: "num", "{format_weight(weight)}" }
                        }
                    }
                }
            }
            div { class: "actions",
                button { onclick: move |_| { workflow.with_mut(|wf| wf.back()); }, "Back" }
                button {
                    class: "primary",
                    onclick: move |_| advance(workflow, toasts),
                    "Next: Calculate"
                }
            }
        }
    }
}

#[component]
fn CalculateStep() -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let services = use_context::<Services>();
    let calculating = workflow.with(|wf| wf.is_calculating());

    let client = services.client.clone();
    let on_calculate = move |_| {
        // Validation failures are already recorded on the workflow.
        let Ok(ticket) = workflow.with_mut(|wf| wf.begin_calculation()) else {
            return;
        };
        let client = client.clone();
        spawn(async move {
            let outcome = client.calculate_shipping(ticket.request()).await;
            workflow.with_mut(|wf| wf.complete_calculation(&ticket, outcome));
        });
    };

    rsx! {
        section { class: "panel",
            h2 { "Calculate shipping" }
            p { class: "muted", "Submits the order to the packing service for box selection and rating." }
            div { class: "actions",
                button {
                    disabled: calculating,
                    onclick: move |_| { workflow.with_mut(|wf| wf.back()); },
                    "Back"
                }
                button {
                    class: "primary",
                    disabled: calculating,
                    onclick: on_calculate,
                    if calculating { "Calculating…" } else { "Calculate Shipping" }
                }
            }
        }
    }
}

#[component]
fn ResultsStep() -> Element {
    let mut workflow = use_context::<Signal<Workflow>>();
    let mut show_debug = use_signal(|| false);

    let (result, debug_available, offer_override) = workflow.with(|wf| {
        (
            wf.result().cloned(),
            wf.debug_view_available(),
            wf.can_enable_debug_override(),
        )
    });

    rsx! {
        if let Some(result) = result {
            ResultView { result, show_debug: show_debug() && debug_available }
        }
        div { class: "actions",
            button {
                onclick: move |_| {
                    show_debug.set(false);
                    workflow.with_mut(|wf| wf.start_over());
                },
                "Start Over"
            }
            button {
                class: "primary",
                onclick: move |_| workflow.with_mut(|wf| wf.modify_order()),
                "Modify Order"
            }
            if debug_available {
                button {
                    onclick: move |_| show_debug.toggle(),
                    if show_debug() { "Hide Debug Info" } else { "View Debug Info" }
                }
            }
            if offer_override {
                button {
                    onclick: move |_| workflow.with_mut(|wf| wf.enable_debug_override()),
                    "Enable Debug Mode (Test)"
                }
            }
        }
    }
}
