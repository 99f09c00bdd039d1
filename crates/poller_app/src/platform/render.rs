use poller_core::RowView;
use poller_engine::cell_texts;

const EMPTY_ROW: &str = "(no content)";

/// One terminal line per row: key, submission, last known date and cell texts.
pub(crate) fn render_row(view: &RowView) -> String {
    let cells = cell_texts(&view.content);
    let body = if cells.is_empty() {
        let trimmed = view.content.trim();
        if trimmed.is_empty() {
            EMPTY_ROW.to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        cells.join(" | ")
    };
    format!(
        "#{} [{}] {} :: {}",
        view.key, view.submission_id, view.date, body
    )
}
