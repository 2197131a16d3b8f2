// Pricing Dashboard - Core Library
// Exposes the pricing formulas and chart assembly for the CLI, TUI and web server

pub mod params;
pub mod strategies;
pub mod chart;
pub mod export;
pub mod logging;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use params::{
    FixedConstants, ParameterError, ParameterField, PricingParameters,
    SALES_INITIAL, TIME_PERIODS,
};
pub use strategies::{
    Strategy, PeriodQuote,
    skimming_pricing, penetration_pricing, cost_plus_pricing,
    skimming_schedule, penetration_schedule, cost_plus_schedule,
};
pub use chart::{
    ChartDescription, ChartError, RevenueSeries, StrategySummary,
    update_chart, build_chart,
    CHART_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE,
};
pub use export::{export_csv, export_schedule_csv, to_csv_string, write_csv, write_schedule_csv};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
