use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::hash_map::DefaultHasher;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use once_cell::sync::Lazy;
use tokio::sync::Mutex as TokioMutex;

use super::styles::{series_color, ChartStyle, ChartTheme};
use crate::app::App;
use crate::data::{comparison, histogram, query};
use crate::types::{ChartData, ChartKind, SeriesValues, Year};

type PlotError = Box<dyn Error + Send + Sync>;

// Global plot cache with a 5-minute expiration
static PLOT_CACHE: Lazy<Arc<TokioMutex<LruCache<PlotCacheKey, (Vec<u8>, Instant)>>>> =
    Lazy::new(|| {
        Arc::new(TokioMutex::new(LruCache::new(NonZeroUsize::new(10).unwrap())))
    });

#[derive(Hash, Eq, PartialEq)]
struct PlotCacheKey {
    chart: ChartKind,
    country: String,
    year: Option<Year>,
    data_hash: u64,
}

impl PlotCacheKey {
    fn new(app: &App) -> Self {
        let mut hasher = DefaultHasher::new();
        if let Some(record) = query::find_by_name(&app.dataset, &app.selected_country) {
            for (year, value) in &record.series {
                year.hash(&mut hasher);
                value.to_bits().hash(&mut hasher);
            }
        }
        app.comparison.mode.hash(&mut hasher);
        app.comparison.countries.hash(&mut hasher);
        app.comparison.years.hash(&mut hasher);

        Self {
            chart: app.current_chart,
            country: app.selected_country.clone(),
            year: app.selected_year,
            data_hash: hasher.finish(),
        }
    }
}

// Helper function to wrap errors
fn wrap_err<E>(e: E) -> PlotError
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    e.into()
}

/// Generate the current chart as PNG bytes, with caching.
pub async fn generate_plot_async(app: App) -> Result<Vec<u8>, PlotError> {
    let cache_key = PlotCacheKey::new(&app);

    // Try to get from cache first
    if let Some((plot_data, timestamp)) = PLOT_CACHE.lock().await.get(&cache_key) {
        if timestamp.elapsed() < Duration::from_secs(300) {
            return Ok(plot_data.clone());
        }
    }

    // Generate new plot in a blocking task
    let plot_data = tokio::task::spawn_blocking(move || {
        generate_plot(&app)?;
        let buffer = std::fs::read(&app.plot_path)?;
        // Clean up the temporary file
        let _ = std::fs::remove_file(&app.plot_path);
        Ok::<_, PlotError>(buffer)
    })
    .await??;

    // Cache the result
    PLOT_CACHE
        .lock()
        .await
        .put(cache_key, (plot_data.clone(), Instant::now()));

    Ok(plot_data)
}

/// Render the current chart to the app's plot path.
pub fn generate_plot(app: &App) -> Result<(), PlotError> {
    let root = BitMapBackend::new(&app.plot_path, (640, 480)).into_drawing_area();
    generate_plot_internal(app, &root)?;
    root.present()?;
    Ok(())
}

/// Internal function to generate the plot
pub fn generate_plot_internal(
    app: &App,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let theme = ChartTheme::default();
    root_area.fill(&theme.background_color).map_err(wrap_err)?;

    // Nothing selected yet: leave the canvas blank
    if app.dataset.is_empty() || app.selected_country.is_empty() {
        return Ok(());
    }

    match app.current_chart {
        ChartKind::Trend => draw_trend(app, root_area),
        ChartKind::YearBar => draw_year_bar(app, root_area),
        ChartKind::Histogram => draw_histogram(app, root_area),
        ChartKind::Scatter => draw_scatter(app, root_area),
    }
}

/// Largest value across all flat series, for the y-axis range.
fn flat_max(data: &ChartData) -> f64 {
    data.datasets
        .iter()
        .flat_map(|series| match &series.values {
            SeriesValues::Flat(values) => values.iter().flatten().copied().collect::<Vec<_>>(),
            SeriesValues::Points(points) => points.iter().map(|&(_, y)| y).collect(),
        })
        .fold(0.0, f64::max)
}

fn format_y_axis(y: &f64) -> String {
    let abs = y.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.1}B", y / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", y / 1_000.0)
    } else {
        format!("{:.0}", y)
    }
}

/// Build a chart over label indices on x and `0..y_max` on y, with the
/// shared mesh styling.
fn build_indexed_chart<'a, 'b>(
    root_area: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    caption: &str,
    labels: &[String],
    y_max: f64,
    rotate_x_labels: bool,
) -> Result<ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>, PlotError>
{
    let theme = ChartTheme::default();
    let style = ChartStyle::default();

    let mut chart_builder = ChartBuilder::on(root_area)
        .caption(
            caption,
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(0f64..labels.len().max(1) as f64, 0f64..y_max.max(1.0))?;

    let mut mesh = chart_builder.configure_mesh();

    // Show at most a handful of x labels to prevent overlap
    let labels_clone = labels.to_vec();
    let x_label_formatter = move |x: &f64| {
        let idx = *x as usize;
        if idx >= labels_clone.len() {
            return String::new();
        }
        let step = (labels_clone.len() / 8).max(1);
        if idx % step == 0 || idx == labels_clone.len() - 1 {
            labels_clone[idx].clone()
        } else {
            String::new()
        }
    };

    mesh.light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc("Population")
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&format_y_axis);

    if rotate_x_labels {
        mesh.x_label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        );
    }

    mesh.draw()?;
    Ok(chart_builder)
}

fn draw_series_legend<'a, 'b: 'a>(
    chart: &mut ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> Result<(), PlotError> {
    let theme = ChartTheme::default();
    chart
        .configure_series_labels()
        .background_style(BLACK.mix(0.6))
        .border_style(theme.axis_color)
        .label_font(("sans-serif", 15).into_font().color(&theme.text_color))
        .draw()?;
    Ok(())
}

fn draw_trend(app: &App, root_area: &DrawingArea<BitMapBackend, Shift>) -> Result<(), PlotError> {
    let data = comparison::trend_view(&app.dataset, &app.selected_country, &app.comparison)?;
    if data.labels.is_empty() {
        return Ok(());
    }

    let style = ChartStyle::default();
    let y_max = flat_max(&data) * 1.1;
    let mut chart = build_indexed_chart(
        root_area,
        "Population Trend (1960-2024)",
        &data.labels,
        y_max,
        false,
    )?;

    for (index, series) in data.datasets.iter().enumerate() {
        let color = series_color(index);
        let values = match &series.values {
            SeriesValues::Flat(values) => values,
            SeriesValues::Points(_) => continue,
        };
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(i, value)| value.map(|v| (i as f64, v)))
            .collect();

        if series.emphasis {
            // Sparse highlight series: point markers over the base line
            chart
                .draw_series(points.iter().map(|&(x, y)| {
                    Circle::new((x, y), style.point_radius + 2, color.filled())
                }))?
                .label(&series.label)
                .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
            continue;
        }

        // Fill under the primary series only, matching the main line chart
        if index == 0 {
            chart.draw_series(AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.2)))?;
        }

        chart
            .draw_series(LineSeries::new(
                points,
                color.stroke_width(style.line_width),
            ))?
            .label(&series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if data.datasets.len() > 1 {
        draw_series_legend(&mut chart)?;
    }

    Ok(())
}

fn draw_year_bar(
    app: &App,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let year = match app.selected_year {
        Some(year) => year,
        None => return Ok(()),
    };
    let data = comparison::year_view(&app.dataset, &app.selected_country, year, &app.comparison)?;
    if data.datasets.is_empty() {
        return Ok(());
    }

    let y_max = flat_max(&data) * 1.1;
    let mut chart = build_indexed_chart(
        root_area,
        &format!("Population in {}", year),
        &data.labels,
        y_max,
        false,
    )?;

    for (index, series) in data.datasets.iter().enumerate() {
        let value = match &series.values {
            SeriesValues::Flat(values) => match values.first().copied().flatten() {
                Some(value) => value,
                None => continue,
            },
            SeriesValues::Points(_) => continue,
        };
        let color = series_color(index);
        let x0 = index as f64 + 0.1;
        let x1 = index as f64 + 0.9;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x0, 0.0), (x1, value)],
                color.mix(0.7).filled(),
            )))?
            .label(&series.label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.mix(0.7).filled())
            });
    }

    if data.datasets.len() > 1 {
        draw_series_legend(&mut chart)?;
    }

    Ok(())
}

fn draw_histogram(
    app: &App,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let record = match query::find_by_name(&app.dataset, &app.selected_country) {
        Some(record) => record,
        None => return Ok(()),
    };
    let values = query::valid_values(record);
    if values.is_empty() {
        return Ok(());
    }

    let hist = histogram::bin_values(&values)?;
    let labels = hist.labels();
    let y_max = hist.counts.iter().copied().max().unwrap_or(0) as f64 * 1.2;

    let mut chart = build_indexed_chart(
        root_area,
        "Population Distribution",
        &labels,
        y_max,
        true,
    )?;

    let color = series_color(1);
    chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
        let x0 = i as f64 + 0.1;
        let x1 = i as f64 + 0.9;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], color.mix(0.7).filled())
    }))?;

    Ok(())
}

fn draw_scatter(
    app: &App,
    root_area: &DrawingArea<BitMapBackend, Shift>,
) -> Result<(), PlotError> {
    let data = comparison::scatter_view(&app.dataset, &app.selected_country)?;
    let points = match data.datasets.first().map(|series| &series.values) {
        Some(SeriesValues::Points(points)) if !points.is_empty() => points.clone(),
        _ => return Ok(()),
    };

    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    let x_min = points.first().map(|&(year, _)| year).unwrap_or(0) - 1;
    let x_max = points.last().map(|&(year, _)| year).unwrap_or(0) + 1;
    let y_max = points.iter().map(|&(_, v)| v).fold(0.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(root_area)
        .caption(
            "Population vs Year",
            ("sans-serif", 30).into_font().color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min as f64..x_max as f64, 0f64..y_max.max(1.0))?;

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc("Population")
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&format_y_axis)
        .draw()?;

    let color = series_color(2);
    chart.draw_series(points.iter().map(|&(year, value)| {
        Circle::new((year as f64, value), style.point_radius, color.filled())
    }))?;

    Ok(())
}
