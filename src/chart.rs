// 📊 Chart Assembly - Update Orchestration
// Recomputes all three strategies and assembles the chart the renderers draw

use crate::params::{FixedConstants, PricingParameters};
use crate::strategies::Strategy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub const CHART_TITLE: &str = "Revenue Comparison by Pricing Strategy";
pub const X_AXIS_TITLE: &str = "Time Periods";
pub const Y_AXIS_TITLE: &str = "Revenue";

/// Finite inputs can still overflow, e.g. a huge growth rate compounding to inf
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("{strategy} revenue overflows at period {period}; try smaller inputs")]
    NonFiniteRevenue { strategy: &'static str, period: usize },
}

// ============================================================================
// REVENUE SERIES
// ============================================================================

/// One line of the chart: revenue per period for a single strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub strategy: Strategy,
    pub name: String,
    pub x: Vec<usize>,
    pub y: Vec<f64>,
}

impl RevenueSeries {
    pub fn new(strategy: Strategy, revenue: Vec<f64>) -> Self {
        RevenueSeries {
            strategy,
            name: strategy.label().to_string(),
            x: (0..revenue.len()).collect(),
            y: revenue,
        }
    }

    pub fn total(&self) -> f64 {
        self.y.iter().sum()
    }

    /// First period whose revenue is NaN or infinite
    pub fn first_non_finite(&self) -> Option<usize> {
        self.y.iter().position(|v| !v.is_finite())
    }

    /// Period and value of the highest finite revenue; earliest period wins ties
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.y
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, value)| value.is_finite())
            .fold(None, |best, (period, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((period, value)),
            })
    }

    /// (x, y) pairs for plotting widgets
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| (x as f64, y))
            .collect()
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub name: String,
    pub total_revenue: f64,
    pub peak_period: Option<usize>,
    pub peak_revenue: Option<f64>,
}

// ============================================================================
// CHART DESCRIPTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub series: Vec<RevenueSeries>,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

impl ChartDescription {
    pub fn series_for(&self, strategy: Strategy) -> Option<&RevenueSeries> {
        self.series.iter().find(|s| s.strategy == strategy)
    }

    pub fn time_periods(&self) -> usize {
        self.series.first().map(|s| s.x.len()).unwrap_or(0)
    }

    pub fn summaries(&self) -> Vec<StrategySummary> {
        self.series
            .iter()
            .map(|series| {
                let peak = series.peak();
                StrategySummary {
                    strategy: series.strategy,
                    name: series.name.clone(),
                    total_revenue: series.total(),
                    peak_period: peak.map(|(period, _)| period),
                    peak_revenue: peak.map(|(_, value)| value),
                }
            })
            .collect()
    }

    /// Every revenue value is finite, or the first series/period that is not
    pub fn ensure_finite(&self) -> Result<(), ChartError> {
        for series in &self.series {
            if let Some(period) = series.first_non_finite() {
                return Err(ChartError::NonFiniteRevenue {
                    strategy: series.strategy.label(),
                    period,
                });
            }
        }
        Ok(())
    }

    /// Strategy with the largest finite total revenue over the horizon
    pub fn best_strategy(&self) -> Option<Strategy> {
        self.series
            .iter()
            .map(|s| (s.strategy, s.total()))
            .filter(|(_, total)| total.is_finite())
            .fold(None, |best: Option<(Strategy, f64)>, (strategy, total)| match best {
                Some((_, best_total)) if best_total >= total => best,
                _ => Some((strategy, total)),
            })
            .map(|(strategy, _)| strategy)
    }

    /// Figure JSON in the shape browser plotting libraries take
    pub fn to_figure(&self) -> Value {
        let data: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": s.name,
                    "x": s.x,
                    "y": s.y,
                })
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "title": self.title,
                "xaxis": { "title": self.x_axis_title },
                "yaxis": { "title": self.y_axis_title },
            }
        })
    }
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Recompute every strategy for the standard horizon and assemble a fresh chart
pub fn update_chart(params: &PricingParameters) -> ChartDescription {
    build_chart(params, &FixedConstants::STANDARD)
}

pub fn build_chart(params: &PricingParameters, constants: &FixedConstants) -> ChartDescription {
    let series = Strategy::ALL
        .iter()
        .map(|strategy| RevenueSeries::new(*strategy, strategy.revenue(params, constants)))
        .collect();

    ChartDescription {
        series,
        title: CHART_TITLE.to_string(),
        x_axis_title: X_AXIS_TITLE.to_string(),
        y_axis_title: Y_AXIS_TITLE.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_chart_shape() {
        let chart = update_chart(&PricingParameters::default());

        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.title, "Revenue Comparison by Pricing Strategy");
        assert_eq!(chart.x_axis_title, "Time Periods");
        assert_eq!(chart.y_axis_title, "Revenue");
        assert_eq!(chart.time_periods(), 10);

        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Skimming Pricing", "Penetration Pricing", "Cost Plus Pricing"]
        );

        for series in &chart.series {
            assert_eq!(series.x, (0..10).collect::<Vec<_>>());
            assert_eq!(series.y.len(), 10);
        }
    }

    #[test]
    fn test_update_chart_default_values() {
        let chart = update_chart(&PricingParameters::default());

        let skimming = chart.series_for(Strategy::Skimming).unwrap();
        assert_eq!(skimming.y[0], 100_000.0);
        assert_eq!(skimming.y[1], 94_050.0);

        let penetration = chart.series_for(Strategy::Penetration).unwrap();
        assert_eq!(penetration.y[0], 100_000.0);
        assert!((penetration.y[1] - 110_000.0).abs() < 1e-6);

        let cost_plus = chart.series_for(Strategy::CostPlus).unwrap();
        assert!(cost_plus.y.iter().all(|&r| r == 45_000.0));
    }

    #[test]
    fn test_update_chart_is_idempotent() {
        let params = PricingParameters {
            price_initial: 12.5,
            price_decrement: 0.75,
            growth_rate: 0.33,
            cost: 7.1,
            margin: 0.42,
        };

        assert_eq!(update_chart(&params), update_chart(&params));
    }

    #[test]
    fn test_build_chart_custom_horizon() {
        let constants = FixedConstants {
            time_periods: 4,
            sales_initial: 10.0,
        };
        let chart = build_chart(&PricingParameters::default(), &constants);

        assert_eq!(chart.time_periods(), 4);
        let cost_plus = chart.series_for(Strategy::CostPlus).unwrap();
        assert_eq!(cost_plus.y, vec![450.0; 4]);
    }

    #[test]
    fn test_summaries() {
        let chart = update_chart(&PricingParameters::default());
        let summaries = chart.summaries();

        assert_eq!(summaries.len(), 3);

        let cost_plus = &summaries[2];
        assert_eq!(cost_plus.strategy, Strategy::CostPlus);
        assert_eq!(cost_plus.total_revenue, 450_000.0);
        // Flat series: the earliest period is reported
        assert_eq!(cost_plus.peak_period, Some(0));

        let skimming = &summaries[0];
        assert_eq!(skimming.peak_period, Some(0));
        assert_eq!(skimming.peak_revenue, Some(100_000.0));

        let penetration = &summaries[1];
        assert_eq!(penetration.peak_period, Some(9));
    }

    #[test]
    fn test_best_strategy() {
        let chart = update_chart(&PricingParameters::default());
        assert_eq!(chart.best_strategy(), Some(Strategy::Penetration));

        let mut params = PricingParameters::default();
        params.cost = 1_000.0;
        assert_eq!(update_chart(&params).best_strategy(), Some(Strategy::CostPlus));
    }

    #[test]
    fn test_peak_of_empty_series() {
        let series = RevenueSeries::new(Strategy::Skimming, vec![]);
        assert_eq!(series.peak(), None);
        assert_eq!(series.total(), 0.0);
    }

    fn overflowing_params() -> PricingParameters {
        // (1 + 1e300)^2 overflows to inf, and 0 * inf is NaN
        PricingParameters {
            price_initial: 0.0,
            growth_rate: 1e300,
            ..PricingParameters::default()
        }
    }

    #[test]
    fn test_overflowing_growth_is_reported() {
        let chart = update_chart(&overflowing_params());

        let penetration = chart.series_for(Strategy::Penetration).unwrap();
        assert_eq!(penetration.first_non_finite(), Some(2));
        assert_eq!(
            chart.ensure_finite(),
            Err(ChartError::NonFiniteRevenue {
                strategy: "Penetration Pricing",
                period: 2,
            })
        );
        assert!(update_chart(&PricingParameters::default()).ensure_finite().is_ok());
    }

    #[test]
    fn test_peak_and_best_skip_non_finite() {
        let chart = update_chart(&overflowing_params());

        let penetration = chart.series_for(Strategy::Penetration).unwrap();
        assert_eq!(penetration.peak(), Some((0, 0.0)));
        assert!(penetration.total().is_nan());

        // Skimming starts at 0 * 1000 and goes negative; cost-plus is the only positive total
        assert_eq!(chart.best_strategy(), Some(Strategy::CostPlus));

        let summaries = chart.summaries();
        assert_eq!(summaries[1].peak_period, Some(0));
        assert_eq!(summaries[1].peak_revenue, Some(0.0));
    }

    #[test]
    fn test_points() {
        let series = RevenueSeries::new(Strategy::CostPlus, vec![5.0, 6.0]);
        assert_eq!(series.points(), vec![(0.0, 5.0), (1.0, 6.0)]);
    }

    #[test]
    fn test_figure_json() {
        let chart = update_chart(&PricingParameters::default());
        let figure = chart.to_figure();

        assert_eq!(figure["layout"]["title"], "Revenue Comparison by Pricing Strategy");
        assert_eq!(figure["layout"]["xaxis"]["title"], "Time Periods");
        assert_eq!(figure["layout"]["yaxis"]["title"], "Revenue");

        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["name"], "Skimming Pricing");
        assert_eq!(data[0]["mode"], "lines");
        assert_eq!(data[0]["x"].as_array().unwrap().len(), 10);
        assert_eq!(data[2]["y"][0], 45_000.0);
    }
}
