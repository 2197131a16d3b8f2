// 📤 Export - Revenue tables as CSV

use crate::chart::ChartDescription;
use crate::params::{FixedConstants, PricingParameters};
use crate::strategies::{PeriodQuote, Strategy};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Wide table: one row per period, one revenue column per strategy
pub fn write_csv<W: Write>(chart: &ChartDescription, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["period".to_string()];
    header.extend(chart.series.iter().map(|s| s.strategy.key().to_string()));
    wtr.write_record(&header).context("Failed to write CSV header")?;

    for period in 0..chart.time_periods() {
        let mut record = vec![period.to_string()];
        for series in &chart.series {
            let value = series.y.get(period).copied().unwrap_or(f64::NAN);
            record.push(value.to_string());
        }
        wtr.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for period {}", period))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn to_csv_string(chart: &ChartDescription) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(chart, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}

pub fn export_csv(chart: &ChartDescription, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    write_csv(chart, file)
}

#[derive(Serialize)]
struct ScheduleRow<'a> {
    strategy: &'a str,
    period: usize,
    price: f64,
    sales: f64,
    revenue: f64,
}

/// Long table: price, sales and revenue for every strategy and period
pub fn write_schedule_csv<W: Write>(
    params: &PricingParameters,
    constants: &FixedConstants,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for strategy in Strategy::ALL {
        for PeriodQuote { period, price, sales, revenue } in strategy.schedule(params, constants) {
            wtr.serialize(ScheduleRow {
                strategy: strategy.key(),
                period,
                price,
                sales,
                revenue,
            })
            .context("Failed to serialize schedule row")?;
        }
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn export_schedule_csv(
    params: &PricingParameters,
    constants: &FixedConstants,
    path: &Path,
) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {:?}", path))?;
    write_schedule_csv(params, constants, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::update_chart;

    #[test]
    fn test_wide_csv_layout() {
        let chart = update_chart(&PricingParameters::default());
        let csv = to_csv_string(&chart).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "period,skimming,penetration,cost_plus");
        assert_eq!(lines[1], "0,100000,100000,45000");
        assert!(lines[2].starts_with("1,94050,"));
        assert!(lines[10].starts_with("9,"));
    }

    #[test]
    fn test_schedule_csv() {
        let mut buf = Vec::new();
        write_schedule_csv(&PricingParameters::default(), &FixedConstants::STANDARD, &mut buf)
            .unwrap();

        let mut rdr = csv::Reader::from_reader(buf.as_slice());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["strategy", "period", "price", "sales", "revenue"]
        );

        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 30);
        assert_eq!(&records[1][0], "skimming");
        assert_eq!(&records[1][2], "95.0");
        assert_eq!(&records[1][3], "990.0");
        assert_eq!(&records[20][0], "cost_plus");
        assert_eq!(&records[20][2], "45.0");
    }

    #[test]
    fn test_export_to_file() {
        let path = std::env::temp_dir().join(format!("pricing_export_{}.csv", std::process::id()));
        let chart = update_chart(&PricingParameters::default());

        export_csv(&chart, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, to_csv_string(&chart).unwrap());
    }
}
