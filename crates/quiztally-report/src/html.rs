//! HTML dashboard generator.
//!
//! Produces a self-contained HTML file with all CSS/JS and charts inlined.

use std::path::Path;

use anyhow::Result;

use quiztally_core::model::{QuestionCatalog, ResultRecord};
use quiztally_core::statistics::AggregationSnapshot;

use crate::charts::{render_svg, ChartKind};
use crate::spreadsheet::SUBMIT_TIME_FORMAT;

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the analytics dashboard for one filter.
pub fn generate_html(
    snapshot: &AggregationSnapshot,
    catalog: &QuestionCatalog,
    selected: &[&ResultRecord],
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quiztally: {}</title>\n",
        html_escape(&catalog.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&catalog.name)));
    html.push_str(&format!(
        "<p class=\"meta\">Group: <strong>{}</strong> | {} questions | {} respondents</p>\n",
        html_escape(&snapshot.filter.to_string()),
        catalog.len(),
        snapshot.summary.count,
    ));
    html.push_str("</header>\n");

    // Summary cards
    let s = &snapshot.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<div class=\"cards\">\n");
    for (label, value) in [
        ("Total Respondents", s.count.to_string()),
        ("Average Score", format!("{:.1}", s.average)),
        ("Highest Score", s.highest.to_string()),
        ("Lowest Score", s.lowest.to_string()),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><span class=\"label\">{label}</span><span class=\"value\">{value}</span></div>\n"
        ));
    }
    html.push_str("</div>\n");
    html.push_str("</section>\n");

    // Weak topics
    html.push_str("<section class=\"analysis\">\n");
    html.push_str("<h2>Answer Analysis</h2>\n");
    html.push_str(&format!(
        "<pre class=\"improvement\">{}</pre>\n",
        html_escape(&snapshot.weak_topics.to_string())
    ));
    html.push_str("</section>\n");

    // Charts
    if !snapshot.is_empty() {
        html.push_str("<section class=\"charts\">\n");
        html.push_str("<h2>Charts</h2>\n");
        for kind in ChartKind::ALL {
            html.push_str(&format!("<figure id=\"{kind}\">\n"));
            html.push_str(&render_svg(kind, snapshot, catalog));
            html.push_str("</figure>\n");
        }
        html.push_str("</section>\n");
    }

    // Per-respondent results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Group</th><th onclick=\"sortTable(1)\">Respondent</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Submitted</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    let pass_mark = catalog.len() as f64 * 0.6;
    for r in selected {
        let row_class = if f64::from(r.score) >= pass_mark {
            "pass"
        } else {
            "fail"
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}/{}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&r.group_id),
            html_escape(&r.respondent_id),
            r.score,
            catalog.len(),
            r.submitted_at.format(SUBMIT_TIME_FORMAT),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(snapshot)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the dashboard to a file.
pub fn write_html_report(
    snapshot: &AggregationSnapshot,
    catalog: &QuestionCatalog,
    selected: &[&ResultRecord],
    path: &Path,
) -> Result<()> {
    let html = generate_html(snapshot, catalog, selected);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    tracing::info!("dashboard written to {}", path.display());
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.cards { display: flex; gap: 1rem; flex-wrap: wrap; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem 1.5rem; min-width: 10rem; }
.card .label { display: block; color: #6b7280; font-size: 0.85rem; }
.card .value { display: block; font-size: 1.75rem; font-weight: bold; }
.improvement { white-space: pre-wrap; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
figure { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
