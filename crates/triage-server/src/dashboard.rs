//! Dataset aggregates and the Plotly chart specs built from them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};
use triage_core::{Dataset, RELATED};

/// Messages per value of one grouping column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount<K> {
    pub key: K,
    pub count: u64,
    /// Share of all messages, in percent, rounded to two decimals.
    pub percent: f64,
}

/// Aggregates shown on the dashboard. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Sorted by genre name.
    pub genres: Vec<GroupCount<String>>,
    /// Column sums, largest first; ties keep column order.
    pub categories: Vec<(String, u64)>,
    /// Grouped by the raw `related` value, ascending.
    pub related: Vec<GroupCount<u8>>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn with_percent<K>(counts: BTreeMap<K, u64>) -> Vec<GroupCount<K>> {
    let total: u64 = counts.values().sum();
    counts
        .into_iter()
        .map(|(key, count)| GroupCount {
            key,
            count,
            percent: if total > 0 {
                round2(100.0 * count as f64 / total as f64)
            } else {
                0.0
            },
        })
        .collect()
}

impl DashboardStats {
    pub fn compute(dataset: &Dataset) -> Self {
        let mut genres: BTreeMap<String, u64> = BTreeMap::new();
        for record in dataset.records() {
            *genres.entry(record.genre.clone()).or_default() += 1;
        }

        let mut totals = vec![0u64; dataset.category_names().len()];
        for record in dataset.records() {
            for (total, &value) in totals.iter_mut().zip(&record.categories) {
                *total += u64::from(value);
            }
        }
        let mut categories: Vec<(String, u64)> = dataset
            .category_names()
            .iter()
            .cloned()
            .zip(totals)
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        let mut related: BTreeMap<u8, u64> = BTreeMap::new();
        if let Some(col) = dataset.category_index(RELATED) {
            for record in dataset.records() {
                *related.entry(record.categories[col]).or_default() += 1;
            }
        } else {
            tracing::warn!("dataset has no '{RELATED}' column; related chart will be empty");
        }

        Self {
            genres: with_percent(genres),
            categories,
            related: with_percent(related),
        }
    }

    pub fn genre_count(&self, genre: &str) -> Option<u64> {
        self.genres.iter().find(|g| g.key == genre).map(|g| g.count)
    }

    pub fn category_total(&self, category: &str) -> Option<u64> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, n)| *n)
    }
}

fn pie(title: &str, groups: Vec<(Value, u64, f64)>, colors: &[&str]) -> Value {
    let labels: Vec<&Value> = groups.iter().map(|(k, _, _)| k).collect();
    let values: Vec<u64> = groups.iter().map(|(_, c, _)| *c).collect();
    let percents: Vec<f64> = groups.iter().map(|(_, _, p)| *p).collect();

    // `domain` carries the percentages and labels exactly as the original
    // dashboard did, even though Plotly reads it as the pie's position.
    json!({
        "data": [{
            "type": "pie",
            "uid": "f4de1f",
            "hole": 0.4,
            "name": "Genre",
            "pull": 0,
            "domain": { "x": percents, "y": labels },
            "marker": { "colors": colors },
            "textinfo": "label+value",
            "hoverinfo": "all",
            "labels": labels,
            "values": values,
        }],
        "layout": { "title": title },
    })
}

/// Related pie, genre pie and category bar chart, in that order.
pub fn graphs(stats: &DashboardStats) -> Vec<Value> {
    let related = stats
        .related
        .iter()
        .map(|g| (json!(g.key), g.count, g.percent))
        .collect();
    let genres = stats
        .genres
        .iter()
        .map(|g| (json!(g.key), g.count, g.percent))
        .collect();
    let (cat, cat_num): (Vec<&str>, Vec<u64>) = stats
        .categories
        .iter()
        .map(|(name, n)| (name.as_str(), *n))
        .unzip();

    vec![
        pie(
            "Proportion of Related and Unrelated messages",
            related,
            &["#beaed4", "#7fc97f"],
        ),
        pie(
            "Count and Percent of Messages by Genre",
            genres,
            &["#7fc97f", "#beaed4", "#fdc086"],
        ),
        json!({
            "data": [{
                "type": "bar",
                "x": cat,
                "y": cat_num,
                "marker": { "color": "grey" },
            }],
            "layout": {
                "title": "Count of Messages by Category",
                "yaxis": { "title": "Count" },
                "xaxis": { "title": "Genre" },
                "barmode": "group",
            },
        }),
    ]
}

/// `graph-0`, `graph-1`, ... one per chart.
pub fn graph_ids(graphs: &[Value]) -> Vec<String> {
    (0..graphs.len()).map(|i| format!("graph-{i}")).collect()
}
