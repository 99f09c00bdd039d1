use scraper::{Html, Selector};

/// Text of each `<td>`/`<th>` cell in a row fragment, whitespace collapsed.
///
/// The fragment is parsed inside a table row: bare cells are dropped by the
/// HTML parser anywhere else.
pub fn cell_texts(fragment: &str) -> Vec<String> {
    let wrapped = format!("<table><tbody><tr>{fragment}</tr></tbody></table>");
    let doc = Html::parse_fragment(&wrapped);
    let Some(cell_sel) = Selector::parse("td, th").ok() else {
        return Vec::new();
    };

    doc.select(&cell_sel)
        .map(|cell| {
            cell.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
