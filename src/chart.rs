//! Chart series for the category breakdown charts.
//!
//! A [ChartSeries] is plain data: one (label, value, color) triple per
//! category, in the iteration order of the [CategoryTotals] it was made from.
//! [doughnut_chart] turns a series into an ECharts configuration, the JSON of
//! which can be handed to any renderer.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, ItemStyle, Tooltip, Trigger},
    series::Pie,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::CategoryTotals;

/// The colors used for category charts unless configured otherwise.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#E7E9ED", "#76A346",
    "#D67D29", "#2E5090",
];

/// How colors are assigned to the categories of a chart.
///
/// Either way the color of a category only depends on its position and the
/// number of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "colors")]
pub enum ColorScheme {
    /// Cycle through a fixed list of CSS colors by index.
    ///
    /// An empty palette falls back to [ColorScheme::HueRotation].
    Palette(Vec<String>),
    /// Evenly spaced hues, `hue = index * 360 / count`.
    HueRotation,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Palette(DEFAULT_PALETTE.iter().map(|&color| color.to_owned()).collect())
    }
}

impl ColorScheme {
    /// The color for the category at `index` of `count` categories.
    pub fn color(&self, index: usize, count: usize) -> String {
        match self {
            ColorScheme::Palette(palette) if !palette.is_empty() => {
                palette[index % palette.len()].clone()
            }
            _ => hue_color(index, count),
        }
    }

    /// The colors for `count` categories.
    pub fn colors(&self, count: usize) -> Vec<String> {
        (0..count).map(|index| self.color(index, count)).collect()
    }
}

fn hue_color(index: usize, count: usize) -> String {
    let hue = index * 360 / count.max(1);
    format!("hsl({hue}, 70%, 60%)")
}

/// One slice of a category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// The category label.
    pub label: String,
    /// The total for the category.
    pub value: Decimal,
    /// The CSS color of the slice.
    pub color: String,
}

/// Chart-ready data for one [CategoryTotals].
///
/// A series always has at least one point. The absence of data is
/// represented by `None` from [ChartSeries::from_totals] so that callers can
/// show a placeholder instead of an empty chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Builds the series for `totals`, or `None` if there are no categories.
    pub fn from_totals(totals: &CategoryTotals, color_scheme: &ColorScheme) -> Option<Self> {
        if totals.is_empty() {
            return None;
        }

        let count = totals.len();
        let points = totals
            .iter()
            .enumerate()
            .map(|(index, total)| ChartPoint {
                label: total.category.clone(),
                value: total.amount,
                color: color_scheme.color(index, count),
            })
            .collect();

        Some(Self { points })
    }

    /// The points of the series in order.
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// The category labels in order.
    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.label.as_str()).collect()
    }

    /// The values in order.
    pub fn values(&self) -> Vec<Decimal> {
        self.points.iter().map(|point| point.value).collect()
    }

    /// The colors in order.
    pub fn colors(&self) -> Vec<&str> {
        self.points.iter().map(|point| point.color.as_str()).collect()
    }
}

/// Creates a doughnut chart of `series` titled `title`.
///
/// Slices and colors follow the order of the series. Call `to_string()` on
/// the result to get the ECharts options as JSON.
pub fn doughnut_chart(series: &ChartSeries, title: &str) -> Chart {
    let data: Vec<(f64, &str)> = series
        .points
        .iter()
        .map(|point| (point.value.to_f64().unwrap_or_default(), point.label.as_str()))
        .collect();

    let colors: Vec<Color> = series
        .points
        .iter()
        .map(|point| Color::from(point.color.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().left("center").top("bottom"))
        .color(colors)
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["40%", "70%"])
                .item_style(ItemStyle::new().border_width(1))
                .data(data),
        )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use super::{ChartSeries, ColorScheme, DEFAULT_PALETTE, doughnut_chart};
    use crate::{DEFAULT_FALLBACK_CATEGORY, Entry, EntryType, aggregate_by_category};

    fn create_test_entries(categories: &[&str]) -> Vec<Entry> {
        categories
            .iter()
            .enumerate()
            .map(|(index, category)| {
                Entry::build(
                    Decimal::from(index as i64 + 1),
                    EntryType::Expense,
                    datetime!(2025-03-05 0:00 UTC),
                )
                .category(category)
                .finalize("test")
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn from_totals_returns_none_for_empty_totals() {
        let entries: Vec<Entry> = Vec::new();
        let totals = aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY);

        assert_eq!(ChartSeries::from_totals(&totals, &ColorScheme::default()), None);
    }

    #[test]
    fn from_totals_follows_category_order() {
        let entries = create_test_entries(&["transport", "", "food"]);
        let totals = aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY);

        let series = ChartSeries::from_totals(&totals, &ColorScheme::default()).unwrap();

        assert_eq!(series.labels(), vec!["food", "transport", "uncategorized"]);
        assert_eq!(
            series.values(),
            vec![Decimal::from(3), Decimal::from(1), Decimal::from(2)]
        );
        assert_eq!(series.colors(), DEFAULT_PALETTE[..3].to_vec());
    }

    #[test]
    fn zero_valued_categories_are_still_data() {
        let entries = vec![
            Entry::build(Decimal::ZERO, EntryType::Income, datetime!(2025-03-05 0:00 UTC))
                .category("gift")
                .finalize("test")
                .unwrap(),
        ];
        let totals = aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY);

        let series = ChartSeries::from_totals(&totals, &ColorScheme::default()).unwrap();

        assert_eq!(series.values(), vec![Decimal::ZERO]);
    }

    #[test]
    fn palette_cycles_by_index() {
        let scheme = ColorScheme::default();

        let colors = scheme.colors(12);

        assert_eq!(colors[0], DEFAULT_PALETTE[0]);
        assert_eq!(colors[9], DEFAULT_PALETTE[9]);
        assert_eq!(colors[10], DEFAULT_PALETTE[0]);
        assert_eq!(colors[11], DEFAULT_PALETTE[1]);
    }

    #[test]
    fn hue_rotation_is_evenly_spaced() {
        let colors = ColorScheme::HueRotation.colors(4);

        assert_eq!(
            colors,
            vec![
                "hsl(0, 70%, 60%)",
                "hsl(90, 70%, 60%)",
                "hsl(180, 70%, 60%)",
                "hsl(270, 70%, 60%)",
            ]
        );
    }

    #[test]
    fn empty_palette_falls_back_to_hue_rotation() {
        let scheme = ColorScheme::Palette(Vec::new());

        assert_eq!(scheme.colors(2), ColorScheme::HueRotation.colors(2));
    }

    #[test]
    fn colors_are_stable_across_recomputation() {
        let entries = create_test_entries(&["a", "b", "c", "d", "e"]);

        let first = ChartSeries::from_totals(
            &aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY),
            &ColorScheme::HueRotation,
        );
        let second = ChartSeries::from_totals(
            &aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY),
            &ColorScheme::HueRotation,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn color_scheme_deserializes_from_config() {
        let palette: ColorScheme =
            serde_json::from_str(r##"{"kind": "palette", "colors": ["#000000"]}"##).unwrap();
        let hue: ColorScheme = serde_json::from_str(r#"{"kind": "hue-rotation"}"#).unwrap();

        assert_eq!(palette, ColorScheme::Palette(vec!["#000000".to_owned()]));
        assert_eq!(hue, ColorScheme::HueRotation);
    }

    #[test]
    fn doughnut_chart_contains_labels_and_colors() {
        let entries = create_test_entries(&["food", "rent"]);
        let totals = aggregate_by_category(&entries, DEFAULT_FALLBACK_CATEGORY);
        let series = ChartSeries::from_totals(&totals, &ColorScheme::default()).unwrap();

        let options = doughnut_chart(&series, "Expenses").to_string();

        assert!(options.contains("\"food\""), "got options: {options}");
        assert!(options.contains("\"rent\""), "got options: {options}");
        assert!(options.contains(DEFAULT_PALETTE[0]), "got options: {options}");
        assert!(options.contains(DEFAULT_PALETTE[1]), "got options: {options}");
        assert!(options.contains("Expenses"), "got options: {options}");
    }
}
