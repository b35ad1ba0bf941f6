//! CSV export of the per-appliance consumption breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::plan::types::ApplianceUsageLine;

/// Column header for the breakdown CSV.
const HEADER: &str = "id,name,category,tier,quantity,hours_per_day,wattage,daily_wh";

/// Exports a plan's appliance breakdown to a CSV file at the given path.
///
/// Writes a header row followed by one row per resolved appliance, in
/// request order. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `lines` - Appliance breakdown of a computed plan
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_breakdown_csv(lines: &[ApplianceUsageLine], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_breakdown_csv(lines, buf)
}

/// Writes an appliance breakdown as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_breakdown_csv(lines: &[ApplianceUsageLine], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for line in lines {
        wtr.write_record(&[
            line.id.clone(),
            line.name.clone(),
            line.category.clone(),
            line.tier.to_string(),
            line.quantity.to_string(),
            format!("{:.2}", line.hours_per_day),
            line.wattage.to_string(),
            line.daily_wh.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::types::IntensityTier;

    fn make_line(i: usize) -> ApplianceUsageLine {
        ApplianceUsageLine {
            id: format!("fridge_{i}"),
            name: "Fridge, compact".to_string(),
            category: "cooling".to_string(),
            tier: IntensityTier::Normal,
            quantity: 1,
            hours_per_day: 8.0,
            wattage: 150,
            daily_wh: 720,
        }
    }

    fn render(lines: &[ApplianceUsageLine]) -> String {
        let mut buf = Vec::new();
        write_breakdown_csv(lines, &mut buf).expect("in-memory write succeeds");
        String::from_utf8(buf).expect("csv output is utf-8")
    }

    #[test]
    fn header_lists_breakdown_columns() {
        let output = render(&[make_line(0)]);
        assert_eq!(output.lines().next(), Some(HEADER));
    }

    #[test]
    fn row_count_matches_line_count() {
        let lines: Vec<_> = (0..4).map(make_line).collect();
        // 1 header + 4 data rows
        assert_eq!(render(&lines).lines().count(), 5);
    }

    #[test]
    fn deterministic_output() {
        let lines: Vec<_> = (0..3).map(make_line).collect();
        assert_eq!(render(&lines), render(&lines));
    }

    #[test]
    fn names_with_commas_stay_in_one_column() {
        let output = render(&[make_line(7)]);
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let rec = rdr
            .records()
            .next()
            .expect("one data row")
            .expect("row parses");
        assert_eq!(rec.len(), 8);
        assert_eq!(&rec[1], "Fridge, compact");
        assert_eq!(&rec[3], "normal");
        assert_eq!(rec[7].parse::<u64>().ok(), Some(720));
    }
}
