//! Queue-length distribution bar charts

use crate::charts::{ChartConfig, Series};
use crate::error::VizError;
use mdsim_metrics::DistributionReport;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const SERIES_COLORS: [RGBColor; 4] = [BLUE, RED, GREEN, MAGENTA];

/// Fraction of a category slot covered by its group of bars
const GROUP_WIDTH: f64 = 0.8;

/// Chart settings used when none are given
pub fn default_config() -> ChartConfig {
    ChartConfig::new("Event Frequency Distribution")
        .x_label("Packets in system at arrival")
        .y_label("Relative frequency")
}

/// The "Total" and "Tagged" PMF series of a report
pub fn pmf_series(report: &DistributionReport) -> Vec<Series> {
    vec![
        Series::new("Total", report.pmf_all.clone()),
        Series::new("Tagged", report.pmf_tagged.clone()),
    ]
}

/// Create a grouped bar chart of one or more PMFs
///
/// The category axis runs over `0..n`, where `n` is the common length of the
/// series. Paths ending in `.svg` are rendered as SVG, anything else as a bitmap
/// whose format follows the extension.
///
/// # Example
/// ```no_run
/// use mdsim_viz::charts::Series;
/// use mdsim_viz::charts::pmf::create_pmf_chart;
///
/// let series = vec![
///     Series::new("Total", vec![0.5, 0.3, 0.2]),
///     Series::new("Tagged", vec![0.4, 0.4, 0.2]),
/// ];
/// create_pmf_chart(&series, "bar.svg").unwrap();
/// ```
pub fn create_pmf_chart(series: &[Series], output_path: impl AsRef<Path>) -> Result<(), VizError> {
    create_pmf_chart_with_config(series, output_path, &default_config())
}

/// Create a PMF chart with custom configuration
pub fn create_pmf_chart_with_config(
    series: &[Series],
    output_path: impl AsRef<Path>,
    config: &ChartConfig,
) -> Result<(), VizError> {
    let categories = validate_series(series)?;
    let output_path = output_path.as_ref();
    let size = (config.width, config.height);

    if is_svg_path(output_path) {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_pmf_chart(&root, series, categories, config)?;
        root.present()
            .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_pmf_chart(&root, series, categories, config)?;
        root.present()
            .map_err(|e| VizError::ExportFailed(format!("Failed to save chart: {e}")))?;
    }

    debug!(path = %output_path.display(), categories, series = series.len(), "Rendered PMF chart");
    Ok(())
}

/// Render a PMF chart to an SVG document held in memory
pub fn render_pmf_svg(series: &[Series], config: &ChartConfig) -> Result<String, VizError> {
    let categories = validate_series(series)?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height)).into_drawing_area();
        draw_pmf_chart(&root, series, categories, config)?;
        root.present()
            .map_err(|e| VizError::ExportFailed(format!("Failed to finish SVG: {e}")))?;
    }
    Ok(svg)
}

fn validate_series(series: &[Series]) -> Result<usize, VizError> {
    let first = series.first().ok_or_else(|| {
        VizError::InvalidConfiguration("No series available for PMF chart".to_string())
    })?;
    let categories = first.values.len();
    if categories == 0 {
        return Err(VizError::InvalidConfiguration(format!(
            "Series {} has no categories",
            first.name
        )));
    }
    if let Some(other) = series.iter().find(|s| s.values.len() != categories) {
        return Err(VizError::InvalidConfiguration(format!(
            "Series {} has {} categories, expected {}",
            other.name,
            other.values.len(),
            categories
        )));
    }
    Ok(categories)
}

fn is_svg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

fn draw_pmf_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    categories: usize,
    config: &ChartConfig,
) -> Result<(), VizError> {
    root.fill(&WHITE)
        .map_err(|e| VizError::RenderingError(format!("Failed to fill background: {e}")))?;

    let max_value = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0f64, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(categories as f64 - 0.5), 0.0..y_max)
        .map_err(|e| VizError::RenderingError(format!("Failed to build chart: {e}")))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(categories.min(30) + 1)
        .x_label_formatter(&category_label)
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to configure mesh: {e}")))?;

    let bar_width = GROUP_WIDTH / series.len() as f64;
    for (idx, s) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        let offset = -GROUP_WIDTH / 2.0 + idx as f64 * bar_width;

        chart
            .draw_series(s.values.iter().enumerate().map(|(category, value)| {
                let x0 = category as f64 + offset;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, *value)], color.filled())
            }))
            .map_err(|e| VizError::RenderingError(format!("Failed to draw bars: {e}")))?
            .label(s.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| VizError::RenderingError(format!("Failed to draw legend: {e}")))?;

    Ok(())
}

/// Tick labels only at whole categories
fn category_label(x: &f64) -> String {
    let rounded = x.round();
    if rounded >= 0.0 && (x - rounded).abs() < 1e-6 {
        format!("{}", rounded as u64)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> Vec<Series> {
        vec![
            Series::new("Total", vec![0.6, 0.3, 0.1]),
            Series::new("Tagged", vec![0.5, 0.25, 0.25]),
        ]
    }

    #[test]
    fn test_pmf_chart_generation() {
        let output_path = std::env::temp_dir().join(format!("mdsim_pmf_{}.png", std::process::id()));

        let result = create_pmf_chart(&sample_series(), &output_path);
        assert!(result.is_ok(), "{result:?}");
        assert!(output_path.exists());

        // Cleanup
        std::fs::remove_file(output_path).ok();
    }

    #[test]
    fn test_svg_rendering_in_memory() {
        let svg = render_pmf_svg(&sample_series(), &default_config().dimensions(640, 480)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Total"));
        assert!(svg.contains("Tagged"));
    }

    #[test]
    fn test_invalid_series_are_rejected() {
        assert!(matches!(
            validate_series(&[]),
            Err(VizError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            validate_series(&[Series::new("Total", vec![])]),
            Err(VizError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            validate_series(&[Series::new("Total", vec![1.0]), Series::new("Tagged", vec![0.5, 0.5])]),
            Err(VizError::InvalidConfiguration(_))
        ));
        assert_eq!(validate_series(&sample_series()).unwrap(), 3);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_label(&0.0), "0");
        assert_eq!(category_label(&3.0), "3");
        assert_eq!(category_label(&2.5), "");
        assert_eq!(category_label(&-0.5), "");
    }

    #[test]
    fn test_svg_path_detection() {
        assert!(is_svg_path(Path::new("out/bar.svg")));
        assert!(is_svg_path(Path::new("BAR.SVG")));
        assert!(!is_svg_path(Path::new("bar.png")));
        assert!(!is_svg_path(Path::new("bar")));
    }
}
