use std::collections::BTreeMap;
use std::path::Path;

use float_ord::FloatOrd;
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;
use tracing::info;

use crate::results::{PosGroup, ResultRecord, TierLabel};

#[derive(Debug, Error)]
pub enum ChartError {
  #[error("nothing to plot")]
  NoData,
  #[error("chart rendering failed: {0}")]
  Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
  ChartError::Draw(e.to_string())
}

/// Bars grouped along the x axis, one bar per series in each group.
#[derive(Clone, PartialEq, Debug)]
pub struct GroupedBars {
  pub groups: Vec<String>,
  pub series: Vec<String>,
  /// (group index, series index) -> bar height
  pub values: BTreeMap<(usize, usize), f64>,
}

impl GroupedBars {
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, group: &str, series: &str) -> Option<f64> {
    let g = self.groups.iter().position(|x| x == group)?;
    let s = self.series.iter().position(|x| x == series)?;
    self.values.get(&(g, s)).copied()
  }

  fn max_value(&self) -> f64 {
    self.values.values().copied().map(FloatOrd).max().map(|FloatOrd(v)| v).unwrap_or(0.0)
  }
}

fn mean(values: &[f64]) -> f64 {
  use statrs::statistics::Statistics;
  values.iter().mean()
}

fn present_tiers<'a, I: Iterator<Item = &'a ResultRecord>>(records: I) -> Vec<TierLabel> {
  let records: Vec<&ResultRecord> = records.collect();
  TierLabel::ordered().into_iter().filter(|t| records.iter().any(|r| r.tier == *t)).collect()
}

/// Mean accuracy per tier and model, tiers in resource order.
pub fn accuracy_by_tier<'a, I: Iterator<Item = &'a ResultRecord> + Clone>(records: I) -> GroupedBars {
  let tiers = present_tiers(records.clone());
  let models: Vec<String> = records.clone().map(|r| r.model.clone()).unique().sorted().collect();

  let grouped = records
    .filter_map(|r| {
      let g = tiers.iter().position(|t| *t == r.tier)?;
      let s = models.iter().position(|m| *m == r.model)?;
      Some(((g, s), r.accuracy))
    })
    .into_group_map();

  GroupedBars {
    groups: tiers.iter().map(|t| t.label().to_owned()).collect(),
    series: models,
    values: grouped.into_iter().map(|(k, v)| (k, mean(&v))).collect(),
  }
}

/// Number of evaluated samples per tier. Models evaluated on the same tier
/// share one benchmark file, so the largest count is reported.
pub fn samples_by_tier(records: &[ResultRecord]) -> GroupedBars {
  let tiers = present_tiers(records.iter());
  let mut values = BTreeMap::new();
  for (g, tier) in tiers.iter().enumerate() {
    if let Some(max) = records.iter().filter(|r| r.tier == *tier).map(|r| r.samples).max() {
      values.insert((g, 0), max as f64);
    }
  }
  GroupedBars {
    groups: tiers.iter().map(|t| t.label().to_owned()).collect(),
    series: vec!["Samples".to_owned()],
    values,
  }
}

/// Group `i` is centred on x = i; other tick positions stay unlabelled.
fn group_label(groups: &[String], x: f64) -> String {
  let i = x.round();
  if (x - i).abs() > 1e-6 || i < 0.0 {
    return String::new();
  }
  groups.get(i as usize).cloned().unwrap_or_default()
}

struct BarStyle<'a> {
  caption: &'a str,
  x_desc: &'a str,
  y_desc: &'a str,
  y_max: f64,
  percent: bool,
  legend: bool,
}

fn draw_grouped_bars<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, bars: &GroupedBars, style: &BarStyle) -> Result<(), ChartError> {
  let n = bars.groups.len().max(1);

  let mut chart = ChartBuilder::on(area)
    .caption(style.caption, ("sans-serif", 22).into_font())
    .margin(15)
    .x_label_area_size(45)
    .y_label_area_size(70)
    .build_cartesian_2d(-0.5f64 .. n as f64 - 0.5, 0f64 .. style.y_max)
    .map_err(draw_err)?;

  let x_fmt = |x: &f64| group_label(&bars.groups, *x);
  let y_fmt = |y: &f64| if style.percent { format!("{:.0}%", y * 100.0) } else { format!("{:.0}", y) };

  chart.configure_mesh()
    .disable_x_mesh()
    .x_desc(style.x_desc)
    .y_desc(style.y_desc)
    .x_label_formatter(&x_fmt)
    .y_label_formatter(&y_fmt)
    .draw()
    .map_err(draw_err)?;

  let width = 0.8 / bars.series.len().max(1) as f64;
  let label_style = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));

  for (s, name) in bars.series.iter().enumerate() {
    let color = Palette99::pick(s).to_rgba();
    let rects: Vec<(f64, f64, f64)> = bars.values.iter()
      .filter(|((_, series), _)| *series == s)
      .map(|(&(g, _), &v)| {
        let x0 = g as f64 - 0.4 + s as f64 * width;
        (x0, x0 + width, v)
      })
      .collect();

    chart.draw_series(rects.iter().map(|&(x0, x1, v)| Rectangle::new([(x0, 0.0), (x1, v)], color.filled())))
      .map_err(draw_err)?
      .label(name.as_str())
      .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

    chart.draw_series(rects.iter().map(|&(x0, x1, v)| {
      let text = if style.percent { format!("{:.1}%", v * 100.0) } else { format!("{}", v as u64) };
      Text::new(text, ((x0 + x1) / 2.0, v), label_style.clone())
    })).map_err(draw_err)?;
  }

  if style.legend {
    chart.configure_series_labels()
      .position(SeriesLabelPosition::UpperRight)
      .background_style(&WHITE.mix(0.8))
      .border_style(&BLACK)
      .draw()
      .map_err(draw_err)?;
  }

  Ok(())
}

pub fn performance_by_tier(records: &[ResultRecord], path: &Path) -> Result<(), ChartError> {
  let bars = accuracy_by_tier(records.iter());
  if bars.is_empty() {
    return Err(ChartError::NoData);
  }

  let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
  root.fill(&WHITE).map_err(draw_err)?;
  draw_grouped_bars(&root, &bars, &BarStyle {
    caption: "Model Performance on MSI Benchmark by Language Tier",
    x_desc: "Language Resource Tier",
    y_desc: "Accuracy",
    y_max: 1.0,
    percent: true,
    legend: true,
  })?;
  root.present().map_err(draw_err)?;

  info!(path = %path.display(), "grouped performance chart saved");
  Ok(())
}

pub fn dataset_size(records: &[ResultRecord], path: &Path) -> Result<(), ChartError> {
  let bars = samples_by_tier(records);
  if bars.is_empty() {
    return Err(ChartError::NoData);
  }

  let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
  root.fill(&WHITE).map_err(draw_err)?;
  draw_grouped_bars(&root, &bars, &BarStyle {
    caption: "Number of Generated Benchmark Examples per Tier",
    x_desc: "Language Resource Tier",
    y_desc: "Number of Questions (Prompts)",
    y_max: (bars.max_value() * 1.15).max(1.0),
    percent: false,
    legend: false,
  })?;
  root.present().map_err(draw_err)?;

  info!(path = %path.display(), "dataset size chart saved");
  Ok(())
}

/// One panel per part of speech, each grouped by tier and model.
pub fn fine_grained_performance(records: &[ResultRecord], path: &Path) -> Result<(), ChartError> {
  let panels: Vec<(PosGroup, GroupedBars)> = PosGroup::ordered().into_iter()
    .map(|pos| (pos, accuracy_by_tier(records.iter().filter(move |r| r.pos == Some(pos)))))
    .filter(|(_, bars)| !bars.is_empty())
    .collect();
  if panels.is_empty() {
    return Err(ChartError::NoData);
  }

  let root = SVGBackend::new(path, (600 * panels.len() as u32, 700)).into_drawing_area();
  root.fill(&WHITE).map_err(draw_err)?;
  let root = root.titled("Fine-Grained Model Performance on MSI Benchmark", ("sans-serif", 28).into_font()).map_err(draw_err)?;

  let areas = root.split_evenly((1, panels.len()));
  for (i, ((pos, bars), area)) in panels.iter().zip(areas.iter()).enumerate() {
    draw_grouped_bars(area, bars, &BarStyle {
      caption: pos.label(),
      x_desc: "Language Resource Tier",
      y_desc: "Accuracy",
      y_max: 1.0,
      percent: true,
      legend: i == panels.len() - 1,
    })?;
  }
  root.present().map_err(draw_err)?;

  info!(path = %path.display(), "fine-grained performance chart saved");
  Ok(())
}
