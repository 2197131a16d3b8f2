// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

// Use library instead of local modules
use pricing_dashboard::{
    export_csv, export_schedule_csv, logging, update_chart, FixedConstants, ParameterField,
    PricingParameters,
};

#[derive(Parser, Debug)]
#[command(name = "pricing-dashboard")]
#[command(about = "Compare skimming, penetration and cost-plus revenue projections", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    params: ParamArgs,

    /// Log level for `chart` and `export` (trace, debug, info, warn, error).
    /// The terminal dashboard ignores it: it owns the terminal, so nothing is logged there
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Print the chart as figure JSON
    Chart {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Write the revenue table as CSV
    Export {
        /// Destination file
        #[arg(short, long, default_value = "revenue.csv")]
        output: PathBuf,

        /// Price, sales and revenue per strategy and period instead of revenue only
        #[arg(long)]
        detailed: bool,
    },
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Initial price (skimming and penetration)
    #[arg(long, global = true, default_value_t = ParameterField::PriceInitial.default_value(), value_parser = finite_number, allow_hyphen_values = true)]
    price_initial: f64,

    /// Price decrement per period (skimming)
    #[arg(long, global = true, default_value_t = ParameterField::PriceDecrement.default_value(), value_parser = finite_number, allow_hyphen_values = true)]
    price_decrement: f64,

    /// Sales growth rate per period (penetration)
    #[arg(long, global = true, default_value_t = ParameterField::GrowthRate.default_value(), value_parser = finite_number, allow_hyphen_values = true)]
    growth_rate: f64,

    /// Production cost (cost plus)
    #[arg(long, global = true, default_value_t = ParameterField::Cost.default_value(), value_parser = finite_number, allow_hyphen_values = true)]
    cost: f64,

    /// Margin over cost (cost plus)
    #[arg(long, global = true, default_value_t = ParameterField::Margin.default_value(), value_parser = finite_number, allow_hyphen_values = true)]
    margin: f64,
}

impl From<&ParamArgs> for PricingParameters {
    fn from(args: &ParamArgs) -> Self {
        PricingParameters {
            price_initial: args.price_initial,
            price_decrement: args.price_decrement,
            growth_rate: args.growth_rate,
            cost: args.cost,
            margin: args.margin,
        }
    }
}

fn finite_number(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err("value must be a finite number".to_string())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let params = PricingParameters::from(&cli.params);
    check_params(&params)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(params),
        Command::Chart { pretty } => {
            logging::init_tracing(&cli.log_level);
            run_chart(params, pretty)
        }
        Command::Export { output, detailed } => {
            logging::init_tracing(&cli.log_level);
            run_export(params, &output, detailed)
        }
    }
}

/// Finite flags can still overflow the projection; refuse before any output
fn check_params(params: &PricingParameters) -> Result<()> {
    update_chart(params)
        .ensure_finite()
        .context("Parameters produce a revenue projection that cannot be charted")
}

fn run_chart(params: PricingParameters, pretty: bool) -> Result<()> {
    tracing::debug!(?params, "building chart");
    let figure = update_chart(&params).to_figure();

    let json = if pretty {
        serde_json::to_string_pretty(&figure)
    } else {
        serde_json::to_string(&figure)
    }
    .context("Failed to serialize chart")?;

    println!("{}", json);
    Ok(())
}

fn run_export(params: PricingParameters, output: &Path, detailed: bool) -> Result<()> {
    if detailed {
        export_schedule_csv(&params, &FixedConstants::STANDARD, output)?;
    } else {
        export_csv(&update_chart(&params), output)?;
    }

    tracing::info!(path = %output.display(), detailed, "revenue table exported");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(params: PricingParameters) -> Result<()> {
    let mut app = ui::App::new(params);
    ui::run_ui(&mut app)?;

    println!("✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_params: PricingParameters) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin pricing-server --features server");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pricing-dashboard"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(PricingParameters::from(&cli.params), PricingParameters::default());
    }

    #[test]
    fn test_cli_parameters_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pricing-dashboard",
            "export",
            "--output",
            "out.csv",
            "--growth-rate",
            "-0.05",
            "--cost",
            "12",
        ])
        .unwrap();

        let params = PricingParameters::from(&cli.params);
        assert_eq!(params.growth_rate, -0.05);
        assert_eq!(params.cost, 12.0);
        match cli.command {
            Some(Command::Export { output, detailed }) => {
                assert_eq!(output, PathBuf::from("out.csv"));
                assert!(!detailed);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_non_finite() {
        assert!(Cli::try_parse_from(["pricing-dashboard", "--margin", "inf"]).is_err());
        assert!(Cli::try_parse_from(["pricing-dashboard", "--cost", "cheap"]).is_err());
    }

    #[test]
    fn test_overflowing_flags_are_refused() {
        let cli = Cli::try_parse_from(["pricing-dashboard", "chart", "--growth-rate", "1e300"]).unwrap();
        let err = check_params(&PricingParameters::from(&cli.params)).unwrap_err();

        assert!(err.to_string().contains("cannot be charted"));
        assert!(check_params(&PricingParameters::default()).is_ok());
    }

    #[test]
    fn test_log_level_help_mentions_dashboard() {
        use clap::CommandFactory;
        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|a| a.get_id() == "log_level")
            .unwrap();
        let help = arg.get_long_help().or(arg.get_help()).unwrap().to_string();

        assert!(help.contains("chart"));
        assert!(help.contains("terminal dashboard ignores it"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
