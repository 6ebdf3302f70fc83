use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::ui::style::Palette;
use crate::widgets::NoticeLevel;

pub fn render_filter_bar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let Some(filter) = model.filter.as_ref() else {
        return;
    };
    let results = model
        .controller
        .widget(filter.widget)
        .and_then(|w| w.match_count())
        .map(|n| format!("  [{n} results]"))
        .unwrap_or_default();
    let text = format!("/{}{results}  Enter: keep  Esc: clear", filter.query);
    let bar = Paragraph::new(text).style(palette.bar().fg(palette.accent));
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let filename = model
        .page_path
        .file_name()
        .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string());
    let percent = model.viewport.scroll_percent();
    let row_info = format!(
        "Row {}/{}",
        model.viewport.offset() + 1,
        model.viewport.total_rows()
    );
    let section = model
        .observer
        .active()
        .map(|s| format!("  #{s}"))
        .unwrap_or_default();
    let status = format!(" {filename}  [{percent}%]  {row_info}{section}  ?:help");
    frame.render_widget(Paragraph::new(status).style(palette.bar()), area);
}

pub fn render_notice_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_notice() else {
        return;
    };
    let (prefix, style) = match level {
        NoticeLevel::Info => ("[info]", Style::default().bg(Color::DarkGray).fg(Color::White)),
        NoticeLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let notice = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(notice, area);
}
