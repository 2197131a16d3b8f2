// 🎛️ Pricing Parameters - Input Contract
// The five user-tunable inputs, their stable keys and defaults, plus the fixed horizon

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// FIXED CONSTANTS
// ============================================================================

/// Number of periods every revenue series covers
pub const TIME_PERIODS: usize = 10;

/// Sales volume at period 0
pub const SALES_INITIAL: f64 = 1000.0;

/// Horizon and sales baseline shared by all three strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedConstants {
    pub time_periods: usize,
    pub sales_initial: f64,
}

impl FixedConstants {
    pub const STANDARD: FixedConstants = FixedConstants {
        time_periods: TIME_PERIODS,
        sales_initial: SALES_INITIAL,
    };
}

impl Default for FixedConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ============================================================================
// PARAMETER FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    PriceInitial,
    PriceDecrement,
    GrowthRate,
    Cost,
    Margin,
}

impl ParameterField {
    /// Form order
    pub const ALL: [ParameterField; 5] = [
        ParameterField::PriceInitial,
        ParameterField::PriceDecrement,
        ParameterField::GrowthRate,
        ParameterField::Cost,
        ParameterField::Margin,
    ];

    /// Stable input key used by the form, the query string and the CLI
    pub fn key(&self) -> &'static str {
        match self {
            ParameterField::PriceInitial => "price_initial",
            ParameterField::PriceDecrement => "price_decrement",
            ParameterField::GrowthRate => "growth_rate",
            ParameterField::Cost => "cost",
            ParameterField::Margin => "margin",
        }
    }

    pub fn from_key(key: &str) -> Option<ParameterField> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParameterField::PriceInitial => "Initial Price (Skimming and Penetration)",
            ParameterField::PriceDecrement => "Price Decrement (Skimming)",
            ParameterField::GrowthRate => "Sales Growth (Penetration)",
            ParameterField::Cost => "Cost (Cost Plus)",
            ParameterField::Margin => "Margin (Cost Plus)",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            ParameterField::PriceInitial => {
                "Starting product price used by the skimming and penetration strategies."
            }
            ParameterField::PriceDecrement => {
                "Amount the price drops each period under skimming pricing."
            }
            ParameterField::GrowthRate => {
                "Per-period sales growth rate under penetration pricing (0.1 = 10%)."
            }
            ParameterField::Cost => "Production cost per unit under cost-plus pricing.",
            ParameterField::Margin => {
                "Profit margin applied on top of cost under cost-plus pricing (0.5 = 50%)."
            }
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            ParameterField::PriceInitial => 100.0,
            ParameterField::PriceDecrement => 5.0,
            ParameterField::GrowthRate => 0.1,
            ParameterField::Cost => 30.0,
            ParameterField::Margin => 0.5,
        }
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{key}: '{value}' is not a number")]
    NotANumber { key: &'static str, value: String },

    #[error("{key}: value must be a finite number")]
    NotFinite { key: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    pub price_initial: f64,
    pub price_decrement: f64,
    pub growth_rate: f64,
    pub cost: f64,
    pub margin: f64,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            price_initial: ParameterField::PriceInitial.default_value(),
            price_decrement: ParameterField::PriceDecrement.default_value(),
            growth_rate: ParameterField::GrowthRate.default_value(),
            cost: ParameterField::Cost.default_value(),
            margin: ParameterField::Margin.default_value(),
        }
    }
}

impl PricingParameters {
    pub fn get(&self, field: ParameterField) -> f64 {
        match field {
            ParameterField::PriceInitial => self.price_initial,
            ParameterField::PriceDecrement => self.price_decrement,
            ParameterField::GrowthRate => self.growth_rate,
            ParameterField::Cost => self.cost,
            ParameterField::Margin => self.margin,
        }
    }

    pub fn set(&mut self, field: ParameterField, value: f64) {
        match field {
            ParameterField::PriceInitial => self.price_initial = value,
            ParameterField::PriceDecrement => self.price_decrement = value,
            ParameterField::GrowthRate => self.growth_rate = value,
            ParameterField::Cost => self.cost = value,
            ParameterField::Margin => self.margin = value,
        }
    }

    /// Build parameters from raw keyed form values.
    ///
    /// Missing or blank fields take their default. Unknown keys are ignored.
    /// No range checks are applied: negative values are valid input.
    pub fn from_inputs<I, K, V>(inputs: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = PricingParameters::default();

        for (key, raw) in inputs {
            let Some(field) = ParameterField::from_key(key.as_ref()) else {
                continue;
            };
            if let Some(value) = parse_value(field, raw.as_ref())? {
                params.set(field, value);
            }
        }

        Ok(params)
    }
}

/// Parse one raw input. `Ok(None)` means blank, i.e. keep the default.
pub fn parse_value(field: ParameterField, raw: &str) -> Result<Option<f64>, ParameterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed.parse().map_err(|_| ParameterError::NotANumber {
        key: field.key(),
        value: trimmed.to_string(),
    })?;

    if !value.is_finite() {
        return Err(ParameterError::NotFinite { key: field.key() });
    }

    Ok(Some(value))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_defaults() {
        let params = PricingParameters::default();

        assert_eq!(params.price_initial, 100.0);
        assert_eq!(params.price_decrement, 5.0);
        assert_eq!(params.growth_rate, 0.1);
        assert_eq!(params.cost, 30.0);
        assert_eq!(params.margin, 0.5);
    }

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FixedConstants::STANDARD.time_periods, 10);
        assert_eq!(FixedConstants::STANDARD.sales_initial, 1000.0);
        assert_eq!(FixedConstants::default(), FixedConstants::STANDARD);
    }

    #[test]
    fn test_keys_round_trip() {
        let keys: Vec<&str> = ParameterField::ALL.iter().map(|f| f.key()).collect();
        assert_eq!(
            keys,
            vec!["price_initial", "price_decrement", "growth_rate", "cost", "margin"]
        );

        for field in ParameterField::ALL {
            assert_eq!(ParameterField::from_key(field.key()), Some(field));
        }
        assert_eq!(ParameterField::from_key("volume"), None);
    }

    #[test]
    fn test_from_inputs_fills_missing_with_defaults() {
        let params = PricingParameters::from_inputs([("cost", "40"), ("margin", "")]).unwrap();

        assert_eq!(params.cost, 40.0);
        assert_eq!(params.margin, 0.5);
        assert_eq!(params.price_initial, 100.0);
    }

    #[test]
    fn test_from_inputs_accepts_negative_values() {
        let params = PricingParameters::from_inputs([
            ("growth_rate", "-0.2"),
            ("price_initial", " -10 "),
        ])
        .unwrap();

        assert_eq!(params.growth_rate, -0.2);
        assert_eq!(params.price_initial, -10.0);
    }

    #[test]
    fn test_from_inputs_ignores_unknown_keys() {
        let params = PricingParameters::from_inputs([("currency", "EUR")]).unwrap();
        assert_eq!(params, PricingParameters::default());
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        let err = PricingParameters::from_inputs([("price_decrement", "five")]).unwrap_err();

        assert_eq!(
            err,
            ParameterError::NotANumber {
                key: "price_decrement",
                value: "five".to_string(),
            }
        );
        assert_eq!(err.to_string(), "price_decrement: 'five' is not a number");
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let err = PricingParameters::from_inputs([("margin", "inf")]).unwrap_err();
        assert_eq!(err, ParameterError::NotFinite { key: "margin" });

        let err = PricingParameters::from_inputs([("cost", "NaN")]).unwrap_err();
        assert_eq!(err, ParameterError::NotFinite { key: "cost" });
    }

    #[test]
    fn test_get_set() {
        let mut params = PricingParameters::default();
        params.set(ParameterField::GrowthRate, 0.25);

        assert_eq!(params.get(ParameterField::GrowthRate), 0.25);
        assert_eq!(params.growth_rate, 0.25);
    }
}
