//! Console report for one cycle.
//!
//! The report goes to whatever sink the caller provides (stdout in the
//! binary). Diagnostics stay on the tracing side.

use anyhow::Result;
use std::io::Write;
use tracing::debug;

use crate::aggregate::CityAggregation;

const SEPARATOR: &str = "-------------------";

/// Builds the report lines: one block per city in first-seen order, then the ranking.
pub fn report_lines(agg: &CityAggregation) -> Vec<String> {
    let mut lines = Vec::with_capacity(agg.cities.len() * 6 + 2);

    for (city, summary) in &agg.cities {
        lines.push(format!("Ville : {city}"));
        lines.push(format!(
            "Nombre total de vélos : {} Nombre de vélos électriques : {} Nombre de vélos mécaniques : {}",
            summary.total_bikes, summary.electric_bikes, summary.mechanical_bikes
        ));
        lines.push(format!(
            "Pourcentage de vélos électriques : {:.2} %",
            summary.percentage_electric()
        ));
        lines.push(format!(
            "Pourcentage de vélos mécaniques : {:.2} %",
            summary.percentage_mechanical()
        ));
        lines.push(SEPARATOR.to_string());
    }

    lines.push(String::new());
    lines.push("Classement des villes avec le plus de vélos :".to_string());
    for (pos, (city, summary)) in agg.ranked().into_iter().enumerate() {
        lines.push(format!("{}. {} - {} vélos", pos + 1, city, summary.total_bikes));
    }

    lines
}

/// Writes the report to `out` and flushes it.
pub fn write_report<W: Write + ?Sized>(agg: &CityAggregation, out: &mut W) -> Result<()> {
    for line in report_lines(agg) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Logs the aggregation as pretty-printed JSON.
pub fn log_json(agg: &CityAggregation) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(agg)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CitySummary;

    fn sample() -> CityAggregation {
        CityAggregation {
            cities: vec![
                (
                    "PARIS".to_string(),
                    CitySummary {
                        total_bikes: 8,
                        electric_bikes: 2,
                        mechanical_bikes: 6,
                    },
                ),
                (
                    "LYON".to_string(),
                    CitySummary {
                        total_bikes: 10,
                        electric_bikes: 10,
                        mechanical_bikes: 0,
                    },
                ),
            ],
            skipped: 0,
        }
    }

    #[test]
    fn test_city_blocks_in_first_seen_order() {
        let lines = report_lines(&sample());

        assert_eq!(lines[0], "Ville : PARIS");
        assert_eq!(
            lines[1],
            "Nombre total de vélos : 8 Nombre de vélos électriques : 2 Nombre de vélos mécaniques : 6"
        );
        assert_eq!(lines[2], "Pourcentage de vélos électriques : 25.00 %");
        assert_eq!(lines[3], "Pourcentage de vélos mécaniques : 75.00 %");
        assert_eq!(lines[4], SEPARATOR);
        assert_eq!(lines[5], "Ville : LYON");
    }

    #[test]
    fn test_ranking_is_one_indexed() {
        let lines = report_lines(&sample());
        let tail: Vec<_> = lines.iter().rev().take(2).rev().cloned().collect();

        assert_eq!(tail, vec!["1. LYON - 10 vélos", "2. PARIS - 8 vélos"]);
    }

    #[test]
    fn test_percentages_rounded_to_two_places() {
        let agg = CityAggregation {
            cities: vec![(
                "NANTES".to_string(),
                CitySummary {
                    total_bikes: 3,
                    electric_bikes: 1,
                    mechanical_bikes: 2,
                },
            )],
            skipped: 0,
        };

        let lines = report_lines(&agg);
        assert_eq!(lines[2], "Pourcentage de vélos électriques : 33.33 %");
        assert_eq!(lines[3], "Pourcentage de vélos mécaniques : 66.67 %");
    }

    #[test]
    fn test_empty_aggregation_prints_only_header() {
        let lines = report_lines(&CityAggregation::default());
        assert_eq!(lines, vec!["", "Classement des villes avec le plus de vélos :"]);
    }

    #[test]
    fn test_write_report_matches_lines() {
        let mut buf = Vec::new();
        write_report(&sample(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, report_lines(&sample()).join("\n") + "\n");
    }

    #[test]
    fn test_log_json_does_not_panic() {
        log_json(&sample()).unwrap();
    }
}
