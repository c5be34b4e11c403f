//! The seven dashboard panels: one question's responses sliced by overall,
//! gender, age, education, income, location, and year.
//!
//! Each builder takes the rows already filtered to a single question and
//! returns chart-ready data. A panel whose breakout has no rows comes back
//! with `no_data = true` rather than as an error.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  age::coarsen_age,
  aggregate::{Aggregation, Estimate, Group, aggregate},
  order::CategoryOrder,
  record::{
    BREAKOUT_AGE, BREAKOUT_EDUCATION, BREAKOUT_GENDER, BREAKOUT_INCOME,
    BREAKOUT_OVERALL, Record,
  },
};

/// Response highlighted on the location map when the question has it.
pub const PREFERRED_MAP_RESPONSE: &str = "Yes";

// ─── Kinds ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
  Overall,
  Gender,
  Age,
  Education,
  Income,
  Location,
  Year,
}

impl PanelKind {
  /// Display order of the panels.
  pub const ALL: [PanelKind; 7] = [
    Self::Overall,
    Self::Gender,
    Self::Age,
    Self::Education,
    Self::Income,
    Self::Location,
    Self::Year,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Overall => "overall",
      Self::Gender => "gender",
      Self::Age => "age",
      Self::Education => "education",
      Self::Income => "income",
      Self::Location => "location",
      Self::Year => "year",
    }
  }
}

impl fmt::Display for PanelKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PanelKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|k| k.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::UnknownPanel(s.to_owned()))
  }
}

/// How finely the age panel slices respondents.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AgeGranularity {
  /// The seven native age groups.
  #[default]
  More,
  /// Three broad buckets (see [`coarsen_age`]).
  Less,
}

impl FromStr for AgeGranularity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "more" => Ok(Self::More),
      "less" => Ok(Self::Less),
      _ => Err(Error::UnknownAgeGranularity(s.to_owned())),
    }
  }
}

// ─── Panel data ──────────────────────────────────────────────────────────────

/// One bar (or one map region) of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
  /// x-axis category (response, year, or location).
  pub category:    String,
  /// Colour series for grouped bars (breakout value or response).
  pub series:      Option<String>,
  pub sample_size: u64,
  pub persons:     u64,
  pub estimate:    Estimate,
  /// Proportion and interval bounds scaled to percent. `None` when the group
  /// has insufficient data.
  pub value_pct:   Option<f64>,
  pub ci_low_pct:  Option<f64>,
  pub ci_high_pct: Option<f64>,
}

impl PanelRow {
  fn from_group<K>(group: &Group<K>, category: String, series: Option<String>) -> Self {
    let interval = group.result.interval();
    Self {
      category,
      series,
      sample_size: group.result.total_sample_size,
      persons: group.result.total_persons,
      estimate: group.result.estimate,
      value_pct: interval.map(|i| i.proportion * 100.0),
      ci_low_pct: interval.map(|i| i.ci_low * 100.0),
      ci_high_pct: interval.map(|i| i.ci_high * 100.0),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
  pub kind:         PanelKind,
  pub title:        String,
  pub x_label:      String,
  pub series_label: Option<String>,
  /// The response shown on the location map.
  pub response:     Option<String>,
  pub no_data:      bool,
  pub rows:         Vec<PanelRow>,
}

impl Panel {
  fn empty(kind: PanelKind, title: &str, x_label: &str, series_label: Option<&str>) -> Self {
    Self {
      kind,
      title: title.to_owned(),
      x_label: x_label.to_owned(),
      series_label: series_label.map(str::to_owned),
      response: None,
      no_data: true,
      rows: Vec::new(),
    }
  }
}

// ─── Builders ────────────────────────────────────────────────────────────────

/// Build every panel for one question, in [`PanelKind::ALL`] order.
pub fn all_panels(records: &[&Record], age: AgeGranularity) -> Vec<Panel> {
  PanelKind::ALL.into_iter().map(|kind| build(kind, records, age)).collect()
}

/// Build a single panel. `age` only affects [`PanelKind::Age`].
pub fn build(kind: PanelKind, records: &[&Record], age: AgeGranularity) -> Panel {
  match kind {
    PanelKind::Overall => overall(records),
    PanelKind::Gender => gender(records),
    PanelKind::Age => by_age(records, age),
    PanelKind::Education => education(records),
    PanelKind::Income => income(records),
    PanelKind::Location => location(records),
    PanelKind::Year => by_year(records),
  }
}

/// Overall breakout, one bar per response.
pub fn overall(records: &[&Record]) -> Panel {
  let sub = breakout_rows(records, BREAKOUT_OVERALL);
  if sub.is_empty() {
    return Panel::empty(PanelKind::Overall, "Overall (no data)", "Response", None);
  }
  let agg = aggregate(sub, |r| r.response.clone(), |a, b| a.cmp(b));
  Panel {
    kind:         PanelKind::Overall,
    title:        "Overall by Response".to_owned(),
    x_label:      "Response".to_owned(),
    series_label: None,
    response:     None,
    no_data:      false,
    rows:         agg.iter().map(|g| PanelRow::from_group(g, g.key.clone(), None)).collect(),
  }
}

pub fn gender(records: &[&Record]) -> Panel {
  breakout_panel(
    PanelKind::Gender,
    records,
    BREAKOUT_GENDER,
    CategoryOrder::lexical(),
    false,
    "By Gender (Response × Sex)",
    "By Gender (no data)",
    |r| r.breakout_value.clone(),
  )
}

pub fn by_age(records: &[&Record], granularity: AgeGranularity) -> Panel {
  match granularity {
    AgeGranularity::More => breakout_panel(
      PanelKind::Age,
      records,
      BREAKOUT_AGE,
      CategoryOrder::age_fine(),
      true,
      "By Age (More detail: Response × Age group)",
      "By Age (no data)",
      |r| r.breakout_value.clone(),
    ),
    AgeGranularity::Less => breakout_panel(
      PanelKind::Age,
      records,
      BREAKOUT_AGE,
      CategoryOrder::age_coarse(),
      true,
      "By Age (Less detail: Response × Age group 3)",
      "By Age (Less, no data)",
      |r| coarsen_age(&r.breakout_value).to_owned(),
    ),
  }
}

pub fn education(records: &[&Record]) -> Panel {
  breakout_panel(
    PanelKind::Education,
    records,
    BREAKOUT_EDUCATION,
    CategoryOrder::education(),
    true,
    "By Education (Response × Education)",
    "By Education (no data)",
    |r| r.breakout_value.clone(),
  )
}

pub fn income(records: &[&Record]) -> Panel {
  breakout_panel(
    PanelKind::Income,
    records,
    BREAKOUT_INCOME,
    CategoryOrder::lexical(),
    false,
    "By Income (Response × Income)",
    "By Income (no data)",
    |r| r.breakout_value.clone(),
  )
}

/// Overall rows for a single response, one region per location.
///
/// The map shows [`PREFERRED_MAP_RESPONSE`] when the question has it, and
/// otherwise the lexically first response.
pub fn location(records: &[&Record]) -> Panel {
  let sub = breakout_rows(records, BREAKOUT_OVERALL);
  let Some(target) = map_response(&sub) else {
    return Panel::empty(PanelKind::Location, "By Location (no data)", "Location", None);
  };

  let agg = aggregate(
    sub.into_iter().filter(|r| r.response == target && r.location.is_some()),
    |r| r.location.clone().unwrap_or_default(),
    |a, b| a.cmp(b),
  );
  if agg.is_empty() {
    return Panel::empty(
      PanelKind::Location,
      "By Location (no data for selected response)",
      "Location",
      None,
    );
  }

  Panel {
    kind:         PanelKind::Location,
    title:        format!("By Location (Response = {target})"),
    x_label:      "Location".to_owned(),
    series_label: None,
    response:     Some(target),
    no_data:      false,
    rows:         agg.iter().map(|g| PanelRow::from_group(g, g.key.clone(), None)).collect(),
  }
}

/// Overall rows by survey year, one series per response.
pub fn by_year(records: &[&Record]) -> Panel {
  let sub = breakout_rows(records, BREAKOUT_OVERALL);
  let agg: Aggregation<(i32, String)> = aggregate(
    sub.into_iter().filter(|r| r.year.is_some()),
    |r| (r.year.unwrap_or_default(), r.response.clone()),
    |a, b| a.cmp(b),
  );
  if agg.is_empty() {
    return Panel::empty(PanelKind::Year, "By Year (no data)", "Year", Some("Response"));
  }
  Panel {
    kind:         PanelKind::Year,
    title:        "By Year (Overall × Response)".to_owned(),
    x_label:      "Year".to_owned(),
    series_label: Some("Response".to_owned()),
    response:     None,
    no_data:      false,
    rows:         agg
      .iter()
      .map(|g| PanelRow::from_group(g, g.key.0.to_string(), Some(g.key.1.clone())))
      .collect(),
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Rows of one breakout category. Rows with a blank response have no bar to
/// land in and are dropped.
fn breakout_rows<'a>(records: &[&'a Record], category: &str) -> Vec<&'a Record> {
  records
    .iter()
    .copied()
    .filter(|r| r.is_breakout(category) && !r.response.is_empty())
    .collect()
}

fn map_response(rows: &[&Record]) -> Option<String> {
  if rows.iter().any(|r| r.response == PREFERRED_MAP_RESPONSE) {
    return Some(PREFERRED_MAP_RESPONSE.to_owned());
  }
  rows
    .iter()
    .map(|r| r.response.as_str())
    .filter(|r| !r.is_empty())
    .min()
    .map(str::to_owned)
}

/// Response × breakout grouped bars. Keys are `(breakout, response)`, ordered
/// by `order` on the breakout and lexically on the response.
///
/// With `fill_levels`, every canonical breakout level appears for every
/// observed response, as an insufficient-data bar when it has no rows.
#[allow(clippy::too_many_arguments)]
fn breakout_panel<F>(
  kind: PanelKind,
  records: &[&Record],
  category: &str,
  order: CategoryOrder,
  fill_levels: bool,
  title: &str,
  empty_title: &str,
  breakout_key: F,
) -> Panel
where
  F: Fn(&Record) -> String,
{
  let mut sub = breakout_rows(records, category);
  sub.retain(|r| !r.breakout_value.is_empty());
  if sub.is_empty() {
    return Panel::empty(kind, empty_title, "Response", Some("Break_Out"));
  }

  let compare = |a: &(String, String), b: &(String, String)| -> Ordering {
    order.compare(&a.0, &b.0).then_with(|| a.1.cmp(&b.1))
  };
  let mut agg = aggregate(
    sub.iter().copied(),
    |r| (breakout_key(r), r.response.clone()),
    compare,
  );

  if fill_levels {
    let responses: Vec<String> = {
      let mut rs: Vec<String> = sub.iter().map(|r| r.response.clone()).collect();
      rs.sort();
      rs.dedup();
      rs
    };
    let expected: Vec<(String, String)> = order
      .labels()
      .iter()
      .flat_map(|level| responses.iter().map(move |resp| (level.to_string(), resp.clone())))
      .collect();
    agg = agg.fill_missing(expected, compare);
  }

  Panel {
    kind,
    title: title.to_owned(),
    x_label: "Response".to_owned(),
    series_label: Some("Break_Out".to_owned()),
    response: None,
    no_data: false,
    rows: agg
      .iter()
      .map(|g| PanelRow::from_group(g, g.key.1.clone(), Some(g.key.0.clone())))
      .collect(),
  }
}
