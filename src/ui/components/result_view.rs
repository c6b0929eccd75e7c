use dioxus::prelude::*;

use shipping_calculator::domain::{
    format_currency, format_weight, CalculationResult, DebugInfo, PackedBox, Recommendation,
    StrategyAttempt,
};

use crate::ui::components::stat_card::StatCard;

#[component]
pub fn ResultView(result: CalculationResult, show_debug: bool) -> Element {
    let breakdown = result.cost_breakdown.clone();
    let created = result
        .created_at_parsed()
        .map(|at| {
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02} UTC",
                at.year(),
                u8::from(at.month()),
                at.day(),
                at.hour(),
                at.minute()
            )
        })
        .unwrap_or_else(|| result.created_at.clone());

    rsx! {
        section { class: "panel",
            div { class: "stat-grid",
                StatCard {
                    title: "Total cost".to_string(),
                    value: format_currency(breakdown.total_cost),
                    hint: Some(format!("Zone {} · {}", result.zone, result.service_level)),
                }
                StatCard {
                    title: "Boxes".to_string(),
                    value: result.total_boxes.to_string(),
                    hint: Some(format!("{} units packed", result.packed_unit_count())),
                }
                StatCard {
                    title: "Total weight".to_string(),
                    value: format_weight(result.total_weight),
                    hint: None,
                }
                StatCard {
                    title: "Efficiency".to_string(),
                    value: format!("{:.1}%", result.overall_efficiency),
                    hint: None,
                }
            }

            h3 { "Cost breakdown" }
            table { class: "table",
                tbody {
                    tr { td { "Base rate" } td { class: "num", "{format_currency(breakdown.base_rate)}" } }
                    tr { td { "Materials" } td { class: "num", "{format_currency(breakdown.material_rate)}" } }
                    tr { td { "Accessories" } td { class: "num", "{format_currency(breakdown.accessories)}" } }
                    tr { class: "total", td { "Total" } td { class: "num", "{format_currency(breakdown.total_cost)}" } }
                }
            }
            if !breakdown.is_consistent() {
                p { class: "muted", "Components do not add up to the reported total." }
            }

            h3 { "Packed boxes" }
            for (index, packed) in result.packed_boxes.iter().enumerate() {
                PackedBoxCard { key: "{index}", index, packed: packed.clone() }
            }

            if !result.recommendations.is_empty() {
                h3 { "Recommendations" }
                ul { class: "recommendations",
                    for (index, recommendation) in result.recommendations.iter().enumerate() {
                        RecommendationItem { key: "{index}", recommendation: recommendation.clone() }
                    }
                }
            }

            p { class: "muted", "Calculation {result.calculation_id} · {created}" }
        }

        if show_debug {
            if let Some(debug) = result.debug_info.clone() {
                DebugPanel { debug }
            }
        }
    }
}

#[component]
fn PackedBoxCard(index: usize, packed: PackedBox) -> Element {
    let number = index + 1;
    let utilization = packed.utilization_pct();
    let meter_style = format!("width: {utilization:.0}%");
    let usage = format!(
        "{utilization:.1}% utilized · {} · {} units",
        format_weight(packed.total_weight),
        packed.unit_count()
    );
    rsx! {
        div { class: "box-card",
            div { class: "box-header",
                strong { "Box {number}: {packed.container.name}" }
                span { class: "muted", "{packed.container.dimensions_label()}" }
                span { class: "num", "{format_currency(packed.container.cost)}" }
            }
            div { class: "meter",
                div { class: "meter-fill", style: "{meter_style}" }
            }
            p { class: "muted", "{usage}" }
            ul {
                for (item_index, item) in packed.items.iter().enumerate() {
                    li { key: "{item_index}", "{item.item_name} × {item.quantity}" }
                }
            }
        }
    }
}

#[component]
fn RecommendationItem(recommendation: Recommendation) -> Element {
    rsx! {
        li {
            p { "{recommendation.message}" }
            if !recommendation.suggestions().is_empty() {
                ul { class: "suggestions",
                    for (index, product) in recommendation.suggestions().iter().enumerate() {
                        li { key: "{index}", "{product.name} ({product.sku})" }
                    }
                }
            }
        }
    }
}

#[component]
fn DebugPanel(debug: DebugInfo) -> Element {
    let strategy = debug
        .algorithm_debug
        .final_selection
        .strategy
        .clone()
        .unwrap_or_else(|| "n/a".to_string());
    let timing = serde_json::to_string_pretty(&debug.timing).unwrap_or_default();

    rsx! {
        section { class: "panel debug",
            h3 { "Debug info" }
            p { "Selected strategy: {strategy}" }
            ol {
                for (index, step) in debug.steps.iter().enumerate() {
                    li {
                        key: "{index}",
                        class: step_class(step.succeeded()),
                        "{step.name} [{step.status}] {step.details}"
                    }
                }
            }
            if !debug.algorithm_debug.strategy_attempts.is_empty() {
                h4 { "Strategy attempts" }
                ul {
                    for (index, attempt) in debug.algorithm_debug.strategy_attempts.iter().enumerate() {
                        li { key: "{index}", "{attempt_label(attempt)}" }
                    }
                }
            }
            h4 { "Timing" }
            pre { "{timing}" }
        }
    }
}

fn step_class(succeeded: bool) -> &'static str {
    if succeeded {
        "ok"
    } else {
        "failed"
    }
}

fn attempt_label(attempt: &StrategyAttempt) -> String {
    let outcome = if attempt.success { "succeeded" } else { "failed" };
    format!(
        "{}: {outcome}, {} boxes, {} overflow items",
        attempt.strategy, attempt.boxes_used, attempt.overflow_items
    )
}
