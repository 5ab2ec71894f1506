use crate::{
    components::{field, panel, Component},
    data::snapshot::{CollectorResult, CpuReport},
    theme::Theme,
};
use ratatui::{layout::Rect, style::Style, text::Line, widgets::Paragraph, Frame};

pub struct CpuComponent {
    pub report: CpuReport,
    pub theme: Theme,
}

impl CpuComponent {
    pub fn new(report: CpuReport, theme: Theme) -> Self {
        Self { report, theme }
    }
}

impl Component for CpuComponent {
    fn render_in_area(&self, f: &mut Frame, area: Rect) {
        let block = panel("CPU", &self.theme);
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let lines = vec![
            field(
                "Model",
                self.report.name.text(),
                &self.theme,
                Style::default().fg(self.theme.accent()),
            ),
            Line::default(),
            field(
                "Temperature",
                self.report.temperature.text(),
                &self.theme,
                self.theme.text_style(),
            ),
            Line::default(),
            field(
                "Frequency",
                self.report.frequency.text(),
                &self.theme,
                self.theme.text_style(),
            ),
        ];

        f.render_widget(
            Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }),
            inner_area,
        );
    }

    fn results(&self) -> Vec<&CollectorResult> {
        vec![
            &self.report.name,
            &self.report.temperature,
            &self.report.frequency,
        ]
    }
}
