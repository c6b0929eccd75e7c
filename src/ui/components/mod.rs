pub mod result_view;
pub mod stat_card;
pub mod step_indicator;
pub mod toast;
