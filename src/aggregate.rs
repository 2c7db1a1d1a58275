//! Per-city bike availability totals.

use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

use crate::station::Station;

/// Bike counts summed over every station of one city.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CitySummary {
    pub total_bikes: u64,
    pub electric_bikes: u64,
    pub mechanical_bikes: u64,
}

impl CitySummary {
    fn pct(part: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of electric bikes. A city with no bikes reports 0%.
    pub fn percentage_electric(&self) -> f64 {
        Self::pct(self.electric_bikes, self.total_bikes)
    }

    /// Always `100 - percentage_electric`, so an empty city reports 100%.
    pub fn percentage_mechanical(&self) -> f64 {
        100.0 - self.percentage_electric()
    }

    fn add(&mut self, total: u32, electric: u32, mechanical: u32) {
        self.total_bikes += u64::from(total);
        self.electric_bikes += u64::from(electric);
        self.mechanical_bikes += u64::from(mechanical);
    }
}

/// Per-city summaries in the order each city was first seen.
#[derive(Debug, Default, Serialize)]
pub struct CityAggregation {
    pub cities: Vec<(String, CitySummary)>,
    /// Stations left out because they carried no bike count.
    pub skipped: usize,
}

impl CityAggregation {
    pub fn get(&self, city: &str) -> Option<&CitySummary> {
        self.cities
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, summary)| summary)
    }

    /// Cities by descending total bikes. Ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, &CitySummary)> {
        let mut ranked: Vec<_> = self
            .cities
            .iter()
            .map(|(city, summary)| (city.as_str(), summary))
            .collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.total_bikes.cmp(&a.1.total_bikes));
        ranked
    }

    pub fn total_bikes(&self) -> u64 {
        self.cities.iter().map(|(_, s)| s.total_bikes).sum()
    }
}

/// Sums bike counts per city.
///
/// Stations without a `bikes` count are skipped and counted in
/// [`CityAggregation::skipped`]. Missing electric/mechanical counts add 0.
pub fn aggregate(stations: &[Station]) -> CityAggregation {
    let mut agg = CityAggregation::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for station in stations {
        let bikes = match station.bikes() {
            Ok(bikes) => bikes,
            Err(e) => {
                warn!(station = %station.label(), error = %e, "Skipping station in aggregation");
                agg.skipped += 1;
                continue;
            }
        };

        let city = station.city();
        let slot = match index.get(city) {
            Some(&i) => i,
            None => {
                index.insert(city.to_string(), agg.cities.len());
                agg.cities.push((city.to_string(), CitySummary::default()));
                agg.cities.len() - 1
            }
        };

        agg.cities[slot]
            .1
            .add(bikes, station.electric_bikes(), station.mechanical_bikes());
    }

    agg
}
