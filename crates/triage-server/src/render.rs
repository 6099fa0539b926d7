//! HTML pages, filled from the bundled templates.

use serde_json::Value;

use crate::classify::ClassificationResult;

const MASTER: &str = include_str!("../templates/master.html");
const GO: &str = include_str!("../templates/go.html");

/// Escape text for an HTML body or attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// `water_supply` → `Water Supply`.
fn display_name(category: &str) -> String {
    category
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn page(result: &str, content: &str, graphs: &[Value], ids: &[String]) -> String {
    // user text lives in `result`, so it goes in last
    MASTER
        .replace("{{ graph_json }}", &script_json(graphs))
        .replace("{{ ids_json }}", &script_json(ids))
        .replace("{{ content }}", content)
        .replace("{{ result }}", result)
}

/// Dashboard page with one `<div>` per chart.
pub fn render_index(graphs: &[Value], ids: &[String]) -> String {
    let mut content = String::from(
        "<div class=\"text-center\">\n        <h1 class=\"text-center\">Overview of Training Dataset</h1>\n    </div>\n",
    );
    for id in ids {
        content.push_str(&format!("    <div id=\"{}\"></div>\n", escape_html(id)));
    }
    page("", &content, graphs, ids)
}

/// Result page listing every category, highlighting the predicted ones.
pub fn render_go(result: &ClassificationResult) -> String {
    let labels = result
        .labels
        .iter()
        .map(|label| {
            let class = if label.value == 1 {
                "list-group-item list-group-item-success text-center"
            } else {
                "list-group-item list-group-item-dark text-center"
            };
            format!(
                "<li class=\"{class}\">{}</li>",
                escape_html(&display_name(&label.category))
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    let body = GO
        .replace("{{ labels }}", &labels)
        .replace("{{ query }}", &escape_html(&result.query));
    page(&body, "", &[], &[])
}
