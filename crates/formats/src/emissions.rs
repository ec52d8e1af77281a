use serde::{Deserialize, Serialize};
use tracing::debug;

/// Source categories composing total emissions, in stacking order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceCategory {
    Coal,
    Oil,
    Gas,
    Cement,
    Flaring,
    Other,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 6] = [
        SourceCategory::Coal,
        SourceCategory::Oil,
        SourceCategory::Gas,
        SourceCategory::Cement,
        SourceCategory::Flaring,
        SourceCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceCategory::Coal => "Coal",
            SourceCategory::Oil => "Oil",
            SourceCategory::Gas => "Gas",
            SourceCategory::Cement => "Cement",
            SourceCategory::Flaring => "Flaring",
            SourceCategory::Other => "Other",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-source emissions (Mt CO₂). Absent cells stay `None`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct SourceBreakdown(pub [Option<f64>; 6]);

impl SourceBreakdown {
    pub fn get(&self, category: SourceCategory) -> Option<f64> {
        self.0[category.index()]
    }

    /// Value clamped to zero when absent or negative.
    pub fn value_or_zero(&self, category: SourceCategory) -> f64 {
        self.get(category).unwrap_or(0.0).max(0.0)
    }

    pub fn any_positive(&self) -> bool {
        SourceCategory::ALL
            .iter()
            .any(|c| self.get(*c).is_some_and(|v| v > 0.0))
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total: Option<f64>,
    pub sources: SourceBreakdown,
    pub per_capita: Option<f64>,
}

/// One row of the emissions table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionRecord {
    pub code: String,
    pub year: i32,
    pub metrics: Metrics,
}

#[derive(Debug)]
pub enum EmissionsError {
    Csv(csv::Error),
    InvalidYear { line: u64, value: String },
}

impl std::fmt::Display for EmissionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmissionsError::Csv(e) => write!(f, "CSV error: {e}"),
            EmissionsError::InvalidYear { line, value } => {
                write!(f, "line {line}: invalid year {value:?}")
            }
        }
    }
}

impl std::error::Error for EmissionsError {}

impl From<csv::Error> for EmissionsError {
    fn from(e: csv::Error) -> Self {
        EmissionsError::Csv(e)
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "ISO 3166-1 alpha-3", default)]
    code: Option<String>,
    #[serde(rename = "Total", default, deserialize_with = "csv::invalid_option")]
    total: Option<f64>,
    #[serde(rename = "Coal", default, deserialize_with = "csv::invalid_option")]
    coal: Option<f64>,
    #[serde(rename = "Oil", default, deserialize_with = "csv::invalid_option")]
    oil: Option<f64>,
    #[serde(rename = "Gas", default, deserialize_with = "csv::invalid_option")]
    gas: Option<f64>,
    #[serde(rename = "Cement", default, deserialize_with = "csv::invalid_option")]
    cement: Option<f64>,
    #[serde(rename = "Flaring", default, deserialize_with = "csv::invalid_option")]
    flaring: Option<f64>,
    #[serde(rename = "Other", default, deserialize_with = "csv::invalid_option")]
    other: Option<f64>,
    #[serde(rename = "PerCapita", default, deserialize_with = "csv::invalid_option")]
    per_capita: Option<f64>,
}

/// Parses the emissions table. Rows with a blank country code are skipped.
pub fn parse_emissions_csv(payload: &str) -> Result<Vec<EmissionRecord>, EmissionsError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(payload.as_bytes());
    let headers = reader.headers()?.clone();

    let mut out = Vec::new();
    let mut skipped = 0usize;
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: RawRow = record.deserialize(Some(&headers))?;

        let Some(code) = row.code.filter(|c| !c.is_empty()) else {
            skipped += 1;
            continue;
        };
        let year = parse_year(&row.year).ok_or_else(|| EmissionsError::InvalidYear {
            line,
            value: row.year.clone(),
        })?;

        out.push(EmissionRecord {
            code,
            year,
            metrics: Metrics {
                total: finite(row.total),
                sources: SourceBreakdown([
                    finite(row.coal),
                    finite(row.oil),
                    finite(row.gas),
                    finite(row.cement),
                    finite(row.flaring),
                    finite(row.other),
                ]),
                per_capita: finite(row.per_capita),
            },
        });
    }

    if skipped > 0 {
        debug!("skipped {skipped} emission rows without a country code");
    }
    Ok(out)
}

fn parse_year(raw: &str) -> Option<i32> {
    if let Ok(y) = raw.parse::<i32>() {
        return Some(y);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i32)
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}
