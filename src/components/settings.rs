use crate::{
    components::{field, panel, Component},
    config::AppConfig,
    data::snapshot::CollectorResult,
    theme::Theme,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Effective configuration plus the reason behind every sentinel on screen.
pub struct SettingsComponent {
    pub config: AppConfig,
    pub reasons: Vec<(String, String)>,
    pub status: Option<String>,
    pub theme: Theme,
}

impl SettingsComponent {
    pub fn new(config: AppConfig, theme: Theme) -> Self {
        Self {
            config,
            reasons: Vec::new(),
            status: None,
            theme,
        }
    }
}

/// `(metric, reason)` for each result that fell back to its sentinel.
pub fn unavailable_reasons<'a>(
    results: impl IntoIterator<Item = &'a CollectorResult>,
) -> Vec<(String, String)> {
    results
        .into_iter()
        .filter_map(|result| {
            result
                .reason()
                .map(|reason| (result.kind.label().to_string(), reason.to_string()))
        })
        .collect()
}

impl Component for SettingsComponent {
    fn render_in_area(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let text = self.theme.text_style();
        let sources = &self.config.sources;
        let mut lines = vec![
            field(
                "Refresh interval",
                format!("{} ms", self.config.refresh_interval_ms),
                &self.theme,
                text,
            ),
            field("Theme", self.theme.name().to_string(), &self.theme, text),
            Line::default(),
            field("Kernel log", sources.kernel_log.to_string(), &self.theme, text),
            field("PCI devices", sources.pci_devices.to_string(), &self.theme, text),
            field("Sensors", sources.sensors.to_string(), &self.theme, text),
            field("Kernel release", sources.kernel_release.to_string(), &self.theme, text),
            field("OpenGL info", sources.gl_info.to_string(), &self.theme, text),
            field(
                "Boot cmdline",
                sources.boot_cmdline.display().to_string(),
                &self.theme,
                text,
            ),
            field("CPU info", sources.cpu_info.display().to_string(), &self.theme, text),
            field("Memory info", sources.mem_info.display().to_string(), &self.theme, text),
        ];
        if let Some(status) = &self.status {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                status.clone(),
                Style::default().fg(self.theme.get_color(Color::Yellow)),
            )));
        }

        let block = panel("Settings", &self.theme);
        let inner = block.inner(columns[0]);
        f.render_widget(block, columns[0]);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let diagnostics: Vec<Line> = if self.reasons.is_empty() {
            vec![Line::from(Span::styled(
                "All metrics available.",
                Style::default().fg(self.theme.status_color(true)),
            ))]
        } else {
            self.reasons
                .iter()
                .map(|(metric, reason)| {
                    field(
                        metric,
                        reason.clone(),
                        &self.theme,
                        Style::default().fg(self.theme.get_color(Color::Red)),
                    )
                })
                .collect()
        };

        let block = panel("Unavailable Metrics", &self.theme);
        let inner = block.inner(columns[1]);
        f.render_widget(block, columns[1]);
        f.render_widget(Paragraph::new(diagnostics).wrap(Wrap { trim: true }), inner);
    }
}
