use dioxus::prelude::*;

use shipping_calculator::workflow::Step;

#[component]
pub fn StepIndicator(current: Step) -> Element {
    rsx! {
        ol { class: "steps",
            for step in Step::ALL {
                li {
                    key: "{step.number()}",
                    class: step_class(step, current),
                    span { class: "step-number", "{step.number()}" }
                    span { class: "step-label", "{step.label()}" }
                }
            }
        }
    }
}

fn step_class(step: Step, current: Step) -> &'static str {
    if step == current {
        "step current"
    } else if step < current {
        "step done"
    } else {
        "step"
    }
}
