use crate::{
    components::{panel, Component},
    data::snapshot::CollectorResult,
    theme::Theme,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Gauge,
    Frame,
};

pub struct MemoryComponent {
    pub usage: CollectorResult,
    pub theme: Theme,
}

impl MemoryComponent {
    pub fn new(usage: CollectorResult, theme: Theme) -> Self {
        Self { usage, theme }
    }

    fn get_memory_color(&self, memory_usage: f64) -> Color {
        if memory_usage <= 50.0 {
            self.theme.get_color(Color::Green)
        } else if memory_usage <= 80.0 {
            self.theme.get_color(Color::Yellow)
        } else {
            self.theme.get_color(Color::Red)
        }
    }
}

impl Component for MemoryComponent {
    fn render_in_area(&self, f: &mut Frame, area: Rect) {
        let block = panel("RAM Information", &self.theme);
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .margin(1)
            .split(inner_area);

        let memory = self.usage.memory();
        let ratio = memory.ratio();
        let gauge = Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(self.get_memory_color(ratio * 100.0))
                    .bg(self.theme.get_color(Color::DarkGray)),
            )
            .ratio(ratio)
            .label(format!("{}MB / {}MB", memory.used_mb, memory.total_mb));
        f.render_widget(gauge, rows[0]);
    }

    fn results(&self) -> Vec<&CollectorResult> {
        vec![&self.usage]
    }
}
