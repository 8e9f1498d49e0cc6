/// X (text number) and Y (WPM) bounds for the recent WPM chart
pub fn compute_chart_params(wpms: &[u32]) -> (f64, f64) {
    let highest_wpm = wpms.iter().copied().max().unwrap_or_default() as f64;
    let overall = (wpms.len() as f64).max(1.0);
    (overall, highest_wpm.max(1.0))
}

/// Chart points: 1-based text number against WPM
pub fn wpm_points(wpms: &[u32]) -> Vec<(f64, f64)> {
    wpms.iter()
        .enumerate()
        .map(|(i, &wpm)| ((i + 1) as f64, wpm as f64))
        .collect()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
