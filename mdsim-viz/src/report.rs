//! HTML report generation

use crate::charts::pmf::{default_config, pmf_series, render_pmf_svg};
use crate::error::VizError;
use mdsim_metrics::DistributionReport;
use std::fs;
use std::path::Path;
use tracing::info;

/// Significance level the KS verdict in the report is stated at
pub const SIGNIFICANCE: f64 = 0.05;

/// Generate a self-contained HTML report for one run
///
/// Creates an HTML file with:
/// - The run parameters, in the order given
/// - The Kolmogorov-Smirnov statistic and p-value
/// - An inline SVG bar chart of both PMFs
/// - The per-category PMF and CDF table
///
/// # Example
/// ```no_run
/// use mdsim_metrics::{DistributionReport, EventLog};
/// use mdsim_viz::report::generate_html_report;
///
/// let all = EventLog::from_values("all", vec![0, 1, 0, 2]);
/// let tagged = EventLog::from_values("tagged", vec![0, 2]);
/// let report = DistributionReport::compare(&all, &tagged).unwrap();
/// let parameters = vec![("p".to_string(), "0.5".to_string())];
/// generate_html_report(&report, &parameters, "report.html").unwrap();
/// ```
pub fn generate_html_report(
    report: &DistributionReport,
    parameters: &[(String, String)],
    output_path: impl AsRef<Path>,
) -> Result<(), VizError> {
    let output_path = output_path.as_ref();
    if let Some(report_dir) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(report_dir)?;
    }

    let svg = render_pmf_svg(&pmf_series(report), &default_config().dimensions(960, 600))?;
    let html = build_html_content(report, parameters, &svg);
    fs::write(output_path, html)?;

    info!(path = %output_path.display(), "Wrote HTML report");
    Ok(())
}

fn build_html_content(report: &DistributionReport, parameters: &[(String, String)], svg: &str) -> String {
    let mut html = String::new();

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Queue Length Distribution Report</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #4CAF50;
            padding-bottom: 10px;
        }
        h2 {
            color: #555;
            margin-top: 30px;
            border-bottom: 2px solid #ddd;
            padding-bottom: 5px;
        }
        .summary {
            background: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .summary-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 15px;
            margin-top: 15px;
        }
        .summary-item {
            background: #f9f9f9;
            padding: 15px;
            border-radius: 4px;
            border-left: 4px solid #4CAF50;
        }
        .summary-label {
            font-size: 14px;
            color: #666;
            margin-bottom: 5px;
        }
        .summary-value {
            font-size: 24px;
            font-weight: bold;
            color: #333;
        }
        .chart {
            background: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 30px;
        }
        .chart svg {
            max-width: 100%;
            height: auto;
            display: block;
            margin: 0 auto;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            background: white;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th {
            background: #4CAF50;
            color: white;
            padding: 12px;
            text-align: left;
        }
        td {
            padding: 10px 12px;
            border-bottom: 1px solid #ddd;
        }
        tr:hover {
            background: #f5f5f5;
        }
    </style>
</head>
<body>
    <h1>Queue Length Distribution Report</h1>
"#,
    );

    if !parameters.is_empty() {
        html.push_str(
            r#"    <h2>Parameters</h2>
    <table>
        <tr>
            <th>Parameter</th>
            <th>Value</th>
        </tr>
"#,
        );
        for (name, value) in parameters {
            html.push_str(&format!(
                r#"        <tr>
            <td>{}</td>
            <td>{}</td>
        </tr>
"#,
                html_escape(name),
                html_escape(value)
            ));
        }
        html.push_str("    </table>\n");
    }

    let verdict = if report.p_value < SIGNIFICANCE {
        "Differ"
    } else {
        "Consistent"
    };
    html.push_str(&format!(
        r#"    <div class="summary">
        <h2>Kolmogorov-Smirnov Comparison</h2>
        <div class="summary-grid">
            <div class="summary-item">
                <div class="summary-label">All Arrivals</div>
                <div class="summary-value">{}</div>
            </div>
            <div class="summary-item">
                <div class="summary-label">Tagged Arrivals</div>
                <div class="summary-value">{}</div>
            </div>
            <div class="summary-item">
                <div class="summary-label">KS Statistic</div>
                <div class="summary-value">{:.6}</div>
            </div>
            <div class="summary-item">
                <div class="summary-label">p-value</div>
                <div class="summary-value">{:.6}</div>
            </div>
            <div class="summary-item">
                <div class="summary-label">At {:.0}% level</div>
                <div class="summary-value">{}</div>
            </div>
        </div>
    </div>
"#,
        report.all_count,
        report.tagged_count,
        report.ks_statistic,
        report.p_value,
        SIGNIFICANCE * 100.0,
        verdict
    ));

    html.push_str("    <h2>Distribution</h2>\n    <div class=\"chart\">\n");
    html.push_str(svg);
    html.push_str("\n    </div>\n");

    html.push_str(
        r#"    <table>
        <tr>
            <th>Packets in System</th>
            <th>PMF (Total)</th>
            <th>PMF (Tagged)</th>
            <th>CDF (Total)</th>
            <th>CDF (Tagged)</th>
        </tr>
"#,
    );
    for category in 0..report.categories {
        html.push_str(&format!(
            r#"        <tr>
            <td>{}</td>
            <td>{:.6}</td>
            <td>{:.6}</td>
            <td>{:.6}</td>
            <td>{:.6}</td>
        </tr>
"#,
            category,
            value_at(&report.pmf_all, category),
            value_at(&report.pmf_tagged, category),
            value_at(&report.cdf_all, category),
            value_at(&report.cdf_tagged, category),
        ));
    }
    html.push_str("    </table>\n");

    html.push_str(
        r#"</body>
</html>
"#,
    );

    html
}

fn value_at(values: &[f64], idx: usize) -> f64 {
    values.get(idx).copied().unwrap_or_default()
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
