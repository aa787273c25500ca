use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: Value) -> String {
    match value {
        Value::Array(items) => render_rows(&items),
        Value::Object(map) if is_page(&map) => render_page(&map),
        Value::Object(map) => {
            let rows = map
                .iter()
                .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
                .collect::<Vec<_>>();
            table::render_table(&["field", "value"], &rows, options())
        }
        scalar => value_to_cell(&scalar),
    }
}

fn is_page(map: &Map<String, Value>) -> bool {
    map.get("items").is_some_and(Value::is_array) && map.contains_key("total_pages")
}

/// A page of results: the item rows, then a position footer.
fn render_page(map: &Map<String, Value>) -> String {
    let items = map
        .get("items")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice);
    let number = |key: &str| map.get(key).and_then(Value::as_u64).unwrap_or_default();
    format!(
        "{}\npage {} of {} ({} items)",
        render_rows(items),
        number("page"),
        number("total_pages").max(1),
        number("total_items")
    )
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![value_to_cell(item)]).collect::<Vec<_>>();
        return table::render_table(&["value"], &rows, options());
    }

    // Columns in first-seen order, so entity fields keep their declared order.
    let mut headers = Vec::<&str>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    table::render_table(&headers, &rows, options())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        // Audiences and other tagged objects show their tag.
        Value::Object(map) if map.contains_key("mode") => map
            .get("mode")
            .map_or_else(String::new, value_to_cell),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use hub_core::access::Audience;
    use hub_core::search::Page;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        tags: Vec<&'static str>,
        audience: Audience,
    }

    fn row() -> Row {
        Row {
            id: "link-8",
            tags: vec!["api", "backend"],
            audience: Audience::Team {
                team_ids: vec!["team-2".into()],
            },
        }
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&row(), OutputFormat::Raw).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["audience"]["mode"], "team");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_keeps_field_order_and_flattens_cells() {
        let out = render(&vec![row()], OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id"));
        assert!(lines[0].find("tags") < lines[0].find("audience"));
        assert!(lines[2].contains("api, backend"));
        assert!(lines[2].trim_end().ends_with("team"));
    }

    #[test]
    fn page_renders_items_and_position() {
        let page = Page {
            items: vec![row()],
            page: 2,
            per_page: 1,
            total_items: 3,
            total_pages: 3,
        };
        let out = render(&page, OutputFormat::Table).unwrap();
        assert!(out.contains("link-8"));
        assert_eq!(out.lines().last(), Some("page 2 of 3 (3 items)"));
    }

    #[test]
    fn empty_list_says_so() {
        let out = render(&Vec::<u32>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "(no rows)");
    }
}
