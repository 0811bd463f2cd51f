//! Page generator: one HTML shell per UI page, wired to exactly the bundles
//! named by its bound entries.
//!
//! Script tags are injected before the closing `</body>` tag (appended when
//! the template has none) and stylesheet links before `</head>`, so hand
//! written template structure survives the injection.

use std::collections::BTreeSet;

use tracing::debug;
use wext_config::{EntryGraph, OutputLayout, ProjectConfig};

use crate::error::StageError;

/// Render every page spec into the output root.
///
/// `styled_units` names the units for which the asset pipeline produced an
/// aggregated stylesheet; only those get a `<link>` tag.
pub fn generate_pages(
    graph: &EntryGraph,
    project: &ProjectConfig,
    layout: &OutputLayout,
    styled_units: &BTreeSet<String>,
) -> Result<usize, StageError> {
    let mut written = 0;
    for page in graph.pages() {
        let template_path = project.resolve(&page.template);
        if !template_path.is_file() {
            return Err(StageError::TemplateNotFound(template_path));
        }
        let template = std::fs::read_to_string(&template_path)?;

        let scripts: Vec<String> = page
            .bound_entries
            .iter()
            .map(|unit| OutputLayout::bundle_href(unit))
            .collect();
        let links: Vec<String> = page
            .bound_entries
            .iter()
            .filter(|unit| styled_units.contains(*unit))
            .map(|unit| OutputLayout::stylesheet_href(unit))
            .collect();

        let html = render_page(&template, &scripts, &links);
        let out = layout.page_path(&page.output_filename);
        std::fs::write(&out, html)?;
        debug!(page = %page.output_filename, scripts = scripts.len(), "generated page");
        written += 1;
    }
    Ok(written)
}

/// Inject stylesheet links before `</head>` and script tags before `</body>`.
fn render_page(template: &str, scripts: &[String], links: &[String]) -> String {
    let link_tags: String = links
        .iter()
        .map(|href| format!("    <link rel=\"stylesheet\" href=\"{href}\">\n"))
        .collect();
    let script_tags: String = scripts
        .iter()
        .map(|src| format!("    <script src=\"{src}\"></script>\n"))
        .collect();

    let mut html = template.to_string();

    // Without a head, links still land inside the document, ahead of the
    // scripts, rather than before the opening tag.
    if !link_tags.is_empty() {
        if let Some(pos) = html.rfind("</head>").or_else(|| html.rfind("</body>")) {
            html.insert_str(pos, &link_tags);
        } else {
            if !html.ends_with('\n') {
                html.push('\n');
            }
            html.push_str(&link_tags);
        }
    }

    if !script_tags.is_empty() {
        if let Some(pos) = html.rfind("</body>") {
            html.insert_str(pos, &script_tags);
        } else {
            if !html.ends_with('\n') {
                html.push('\n');
            }
            html.push_str(&script_tags);
        }
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html>\n<head>\n  <title>Popup</title>\n</head>\n<body>\n  <div id=\"root\"></div>\n</body>\n</html>\n";

    #[test]
    fn injects_script_before_closing_body() {
        let html = render_page(TEMPLATE, &["js/popup.bundle.js".to_string()], &[]);
        let script_pos = html.find("js/popup.bundle.js").unwrap();
        let body_pos = html.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn injects_link_before_closing_head() {
        let html = render_page(
            TEMPLATE,
            &["js/popup.bundle.js".to_string()],
            &["css/popup.css".to_string()],
        );
        let link_pos = html.find("css/popup.css").unwrap();
        let head_pos = html.find("</head>").unwrap();
        assert!(link_pos < head_pos);
    }

    #[test]
    fn headless_template_gets_links_inside_the_body() {
        let html = render_page(
            "<html>\n<body>\n  <div id=\"root\"></div>\n</body>\n</html>\n",
            &["js/popup.bundle.js".to_string()],
            &["css/popup.css".to_string()],
        );
        let link_pos = html.find("css/popup.css").unwrap();
        let script_pos = html.find("js/popup.bundle.js").unwrap();
        let body_close = html.find("</body>").unwrap();
        assert!(html.find("<body>").unwrap() < link_pos);
        assert!(link_pos < script_pos);
        assert!(script_pos < body_close);
    }

    #[test]
    fn bare_template_keeps_links_ahead_of_scripts() {
        let html = render_page(
            "<h1>bare</h1>",
            &["js/popup.bundle.js".to_string()],
            &["css/popup.css".to_string()],
        );
        assert!(html.find("css/popup.css").unwrap() < html.find("js/popup.bundle.js").unwrap());
    }

    #[test]
    fn appends_script_when_template_has_no_body() {
        let html = render_page("<h1>bare</h1>", &["js/popup.bundle.js".to_string()], &[]);
        assert!(html.contains("<script src=\"js/popup.bundle.js\"></script>"));
    }

    #[test]
    fn only_bound_bundles_appear() {
        let html = render_page(TEMPLATE, &["js/popup.bundle.js".to_string()], &[]);
        assert!(html.contains("popup.bundle.js"));
        assert!(!html.contains("options.bundle.js"));
        assert!(!html.contains("background.bundle.js"));
    }
}
