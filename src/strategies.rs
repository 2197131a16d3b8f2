// 📈 Pricing Strategies - Revenue Formulas
// Skimming, penetration and cost-plus projections over a fixed horizon.
// Every function is pure. Nothing is clamped: a price or sales volume that
// goes negative is carried straight into the revenue product.

use crate::params::{FixedConstants, PricingParameters};
use serde::{Deserialize, Serialize};

/// Units of sales lost each period under skimming pricing
pub const SKIMMING_SALES_DECLINE: f64 = 10.0;

// ============================================================================
// STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Skimming,
    Penetration,
    CostPlus,
}

impl Strategy {
    /// Chart order
    pub const ALL: [Strategy; 3] = [Strategy::Skimming, Strategy::Penetration, Strategy::CostPlus];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Skimming => "Skimming Pricing",
            Strategy::Penetration => "Penetration Pricing",
            Strategy::CostPlus => "Cost Plus Pricing",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Strategy::Skimming => "skimming",
            Strategy::Penetration => "penetration",
            Strategy::CostPlus => "cost_plus",
        }
    }

    /// Full price/sales/revenue breakdown for this strategy
    pub fn schedule(&self, params: &PricingParameters, constants: &FixedConstants) -> Vec<PeriodQuote> {
        match self {
            Strategy::Skimming => skimming_schedule(
                params.price_initial,
                params.price_decrement,
                constants.sales_initial,
                constants.time_periods,
            ),
            Strategy::Penetration => penetration_schedule(
                params.price_initial,
                constants.sales_initial,
                params.growth_rate,
                constants.time_periods,
            ),
            Strategy::CostPlus => cost_plus_schedule(
                params.cost,
                params.margin,
                constants.sales_initial,
                constants.time_periods,
            ),
        }
    }

    pub fn revenue(&self, params: &PricingParameters, constants: &FixedConstants) -> Vec<f64> {
        revenues(&self.schedule(params, constants))
    }
}

// ============================================================================
// PERIOD QUOTE
// ============================================================================

/// Price, sales volume and revenue for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodQuote {
    pub period: usize,
    pub price: f64,
    pub sales: f64,
    pub revenue: f64,
}

impl PeriodQuote {
    fn new(period: usize, price: f64, sales: f64) -> Self {
        PeriodQuote {
            period,
            price,
            sales,
            revenue: price * sales,
        }
    }
}

fn revenues(schedule: &[PeriodQuote]) -> Vec<f64> {
    schedule.iter().map(|quote| quote.revenue).collect()
}

// ============================================================================
// SCHEDULES
// ============================================================================

/// price(t) = price_initial - price_decrement * t, sales(t) = sales_initial - 10 * t
pub fn skimming_schedule(
    price_initial: f64,
    price_decrement: f64,
    sales_initial: f64,
    time_periods: usize,
) -> Vec<PeriodQuote> {
    (0..time_periods)
        .map(|t| {
            let step = t as f64;
            PeriodQuote::new(
                t,
                price_initial - price_decrement * step,
                sales_initial - SKIMMING_SALES_DECLINE * step,
            )
        })
        .collect()
}

/// Constant price, sales compounding at growth_rate per period
pub fn penetration_schedule(
    price_initial: f64,
    sales_initial: f64,
    growth_rate: f64,
    time_periods: usize,
) -> Vec<PeriodQuote> {
    let factor = 1.0 + growth_rate;

    (0..time_periods)
        .map(|t| PeriodQuote::new(t, price_initial, sales_initial * factor.powi(t as i32)))
        .collect()
}

/// price = cost * (1 + margin), fixed sales volume
pub fn cost_plus_schedule(
    cost: f64,
    margin: f64,
    sales_initial: f64,
    time_periods: usize,
) -> Vec<PeriodQuote> {
    let price = cost * (1.0 + margin);

    (0..time_periods)
        .map(|t| PeriodQuote::new(t, price, sales_initial))
        .collect()
}

// ============================================================================
// REVENUE SERIES
// ============================================================================

pub fn skimming_pricing(
    price_initial: f64,
    price_decrement: f64,
    sales_initial: f64,
    time_periods: usize,
) -> Vec<f64> {
    revenues(&skimming_schedule(price_initial, price_decrement, sales_initial, time_periods))
}

pub fn penetration_pricing(
    price_initial: f64,
    sales_initial: f64,
    growth_rate: f64,
    time_periods: usize,
) -> Vec<f64> {
    revenues(&penetration_schedule(price_initial, sales_initial, growth_rate, time_periods))
}

pub fn cost_plus_pricing(cost: f64, margin: f64, sales_initial: f64, time_periods: usize) -> Vec<f64> {
    revenues(&cost_plus_schedule(cost, margin, sales_initial, time_periods))
}

// ============================================================================
// TESTS
// ============================================================================
