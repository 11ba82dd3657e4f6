use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn key_line(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key_line("q / Ctrl-C", 3, "Quit"),
        key_line("o", 12, "Type or paste a resume path"),
        key_line("Enter", 8, "Select typed path / analyze selection"),
        key_line("u", 12, "Analyze selected resume"),
        key_line("x", 12, "Clear selection"),
        key_line("s", 12, "Save result to history"),
        key_line("a", 12, "Toggle auto-save"),
        key_line("tab", 10, "Switch tabs"),
        key_line("?", 12, "Show this help"),
        Line::from(""),
        Line::from("Dropping a PDF onto the terminal window selects it."),
        Line::from("Only PDF files are accepted; anything else is ignored."),
        Line::from(""),
        Line::from("History tab:"),
        key_line("↑/↓ or j/k", 3, "Navigate"),
        key_line("e", 12, "Export selected as JSON"),
        key_line("c", 12, "Export selected as CSV"),
        key_line("y", 12, "Copy exported path to clipboard"),
        key_line("d", 12, "Delete selected"),
        key_line("r", 12, "Refresh history"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Logs: ", Style::default().fg(Color::Gray)),
            Span::raw(
                crate::storage::log_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "-".into()),
            ),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
