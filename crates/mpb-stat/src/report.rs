//! Report writers: the inferential CSV and the IEEE-style LaTeX table.

use std::fs;
use std::path::Path;

use mpb_core::{ErrorInfo, MpbError};

use crate::inference::ComparisonRow;

/// Column order of `inferential_comparison.csv`, a compatibility contract.
pub const COMPARISON_COLUMNS: [&str; 10] = [
    "planner",
    "median_delta_ms",
    "ci95_low_ms",
    "ci95_high_ms",
    "slower_count",
    "faster_count",
    "sign_test_p_two_sided",
    "holm_adjusted_p",
    "bootstrap_resamples",
    "baseline_planner",
];

fn csv_error(path: &Path, err: csv::Error) -> MpbError {
    MpbError::Serde(
        ErrorInfo::new("stats-csv", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

fn io_error(code: &str, path: &Path, err: impl ToString) -> MpbError {
    MpbError::Io(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Writes the comparison rows as CSV with the pinned column order.
///
/// Every value is rendered through a fixed format, so the same rows
/// always produce the same bytes.
pub fn write_comparison_csv(path: &Path, rows: &[ComparisonRow]) -> Result<(), MpbError> {
    let mut writer = csv::Writer::from_path(path).map_err(|err| csv_error(path, err))?;
    writer
        .write_record(COMPARISON_COLUMNS)
        .map_err(|err| csv_error(path, err))?;
    for row in rows {
        writer
            .write_record([
                row.planner.clone(),
                format!("{:.6}", row.median_delta_ms),
                format!("{:.6}", row.ci95_low_ms),
                format!("{:.6}", row.ci95_high_ms),
                row.slower_count.to_string(),
                row.faster_count.to_string(),
                format!("{:e}", row.sign_test_p_two_sided),
                format!("{:e}", row.holm_adjusted_p),
                row.bootstrap_resamples.to_string(),
                row.baseline_planner.clone(),
            ])
            .map_err(|err| csv_error(path, err))?;
    }
    writer
        .flush()
        .map_err(|err| io_error("stats-csv", path, err))?;
    Ok(())
}

/// Human-readable table name for a planner identifier.
pub fn planner_display_name(planner: &str) -> String {
    match planner {
        "astar" => "A*".to_string(),
        "dijkstra" => "Dijkstra".to_string(),
        "greedy_best_first" => "Greedy Best-First".to_string(),
        "weighted_astar" => "Weighted A*".to_string(),
        "bidirectional_astar" => "Bidirectional A*".to_string(),
        "theta_star" => "Theta*".to_string(),
        "idastar" => "IDA*".to_string(),
        "jps_4way" => "Jump Point Search".to_string(),
        "lpa_star" => "LPA*".to_string(),
        "beam_search" => "Beam Search".to_string(),
        "fringe_search" => "Fringe Search".to_string(),
        "bidirectional_bfs" => "Bidirectional BFS".to_string(),
        other => title_case(other),
    }
}

fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// P-value for LaTeX, scientific below 0.001.
fn format_p(value: f64) -> String {
    if value >= 0.001 {
        return format!("{value:.3}");
    }
    let exponent = if value > 0.0 {
        value.log10().floor() as i32
    } else {
        -308
    };
    let mantissa = value / 10_f64.powi(exponent);
    format!("\\({mantissa:.2}\\times10^{{{exponent}}}\\)")
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::new();
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push_str("{,}");
        }
        grouped.push(digit);
    }
    grouped
}

/// Writes the statistical comparison table as an IEEE-style `table*`.
pub fn write_latex_table(
    path: &Path,
    rows: &[ComparisonRow],
    baseline: &str,
    n_mazes: usize,
    n_resamples: usize,
) -> Result<(), MpbError> {
    let baseline_tex = baseline.replace('_', "\\_");
    let mut lines: Vec<String> = vec![
        "\\begin{table*}[t]".to_string(),
        "\\centering".to_string(),
        format!(
            "\\caption{{Exploratory paired runtime comparisons against \
             \\texttt{{{baseline_tex}}} on the same {n_mazes} mazes \
             (single run per planner-maze pair). \
             Positive \\(\\Delta\\) means the comparator is slower. \
             Confidence intervals are percentile bootstrap intervals from \
             {} paired resamples (fixed seed). \
             \\(p\\)-values are exact two-sided paired sign tests with Holm \
             correction across {} comparisons.}}",
            group_thousands(n_resamples),
            rows.len(),
        ),
        "\\label{tab:runtime_statistical_comparison}".to_string(),
        "\\footnotesize".to_string(),
        "\\setlength{\\tabcolsep}{4.0pt}".to_string(),
        "\\begin{tabular}{lcccc}".to_string(),
        "\\toprule".to_string(),
        format!(
            "Comparator & Median \\(\\Delta\\) (ms) & 95\\% CI for \\(\\Delta\\) (ms) \
             & Slower/Faster (of {n_mazes}) & Holm-adjusted \\(p\\) \\\\"
        ),
        "\\midrule".to_string(),
    ];

    for row in rows {
        let name = planner_display_name(&row.planner);
        let interval = format!("[{:.3}, {:.3}]", row.ci95_low_ms, row.ci95_high_ms);
        lines.push(format!(
            "{name:<24} & {median:<6} & {interval:<22} & {slower}/{faster} & {p} \\\\",
            median = format!("{:.3}", row.median_delta_ms),
            slower = row.slower_count,
            faster = row.faster_count,
            p = format_p(row.holm_adjusted_p),
        ));
    }

    lines.push("\\bottomrule".to_string());
    lines.push("\\end{tabular}".to_string());
    lines.push("\\end{table*}".to_string());
    lines.push(String::new());

    fs::write(path, lines.join("\n")).map_err(|err| io_error("stats-tex", path, err))
}
