use crate::data::snapshot::CollectorResult;
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding},
    Frame,
};

pub mod cpu;
pub mod gpu;
pub mod home;
pub mod memory;
pub mod settings;

/// The Component trait defines the interface that all panels implement
pub trait Component {
    /// Render the component into its slot of the frame
    fn render_in_area(&self, f: &mut Frame, area: Rect);

    /// Collector results currently on display
    fn results(&self) -> Vec<&CollectorResult> {
        Vec::new()
    }
}

pub(crate) fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(format!(" {} ", title), theme.title_style()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .padding(Padding::horizontal(1))
}

/// A `Label: value` row.
pub(crate) fn field(label: &str, value: String, theme: &Theme, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", label),
            theme.text_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, value_style),
    ])
}
