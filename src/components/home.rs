use crate::{
    components::{field, panel, Component},
    data::snapshot::{CollectorResult, SystemOverview},
    error::CollectorError,
    theme::Theme,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

const SAM_BLURB: &str = "AMD Smart Access Memory technology gives the CPU immediate, \
full access to Radeon graphics memory for faster transfers between the two.";
const OVERRIDE_BLURB: &str = "Unlocking clocks and voltages in sysfs requires the kernel \
parameter amdgpu.ppfeaturemask=0xffffffff.";

/// Why the SAM status could not be read, when the cause is something the
/// user can fix.
pub fn sam_note(result: &CollectorResult) -> Option<String> {
    match result.reason()? {
        CollectorError::PermissionDenied { origin } => {
            Some(format!("Unknown: `{}` needs root or passwordless sudo", origin))
        }
        CollectorError::ToolNotFound { program } => {
            Some(format!("Unknown: {} is not installed", program))
        }
        _ => None,
    }
}

/// The Home tab: build info, platform versions and the two driver flags.
pub struct HomeComponent {
    pub overview: SystemOverview,
    pub theme: Theme,
}

impl HomeComponent {
    pub fn new(overview: SystemOverview, theme: Theme) -> Self {
        Self { overview, theme }
    }

    fn status_field(&self, enabled: bool) -> Line<'static> {
        field(
            "Status",
            (if enabled { "Enabled" } else { "Disabled" }).to_string(),
            &self.theme,
            Style::default()
                .fg(self.theme.status_color(enabled))
                .add_modifier(Modifier::BOLD),
        )
    }

    fn blurb(&self, text: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            text,
            Style::default().fg(self.theme.get_color(Color::Gray)),
        ))
    }

    fn render_block(&self, f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
        let block = panel(title, &self.theme);
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Component for HomeComponent {
    fn render_in_area(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(8),
            ])
            .split(area);

        let welcome = Paragraph::new(vec![
            Line::from(Span::styled(
                "Welcome to PulseTool, AMD Adrenaline-style monitoring for Linux.",
                self.theme.title_style(),
            )),
            Line::from(Span::styled(
                "This tool is still in alpha.",
                self.theme.text_style(),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(welcome, rows[0]);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);

        let text = self.theme.text_style();
        let o = &self.overview;

        self.render_block(
            f,
            top[0],
            "PulseTool",
            vec![
                field("Version", o.version.clone(), &self.theme, text),
                field("Started", o.started.clone(), &self.theme, text),
            ],
        );

        self.render_block(
            f,
            top[1],
            "System Information",
            vec![
                field("Kernel", o.kernel.text(), &self.theme, text),
                field("Mesa Version", o.mesa.text(), &self.theme, text),
            ],
        );

        let mut sam_lines = vec![self.status_field(o.smart_access_memory.status())];
        if let Some(note) = sam_note(&o.smart_access_memory) {
            sam_lines.push(Line::from(Span::styled(
                note,
                Style::default().fg(self.theme.get_color(Color::Yellow)),
            )));
        }
        sam_lines.push(Line::default());
        sam_lines.push(self.blurb(SAM_BLURB));
        self.render_block(f, bottom[0], "Smart Access Memory", sam_lines);

        let override_on = o.performance_override.status();
        let (config_label, config_color) = if override_on {
            ("AMD Performance Override", self.theme.get_color(Color::Yellow))
        } else {
            ("Stock", self.theme.get_color(Color::Blue))
        };
        self.render_block(
            f,
            bottom[1],
            "System Performance Override",
            vec![
                self.status_field(override_on),
                field(
                    "Configuration",
                    config_label.to_string(),
                    &self.theme,
                    Style::default().fg(config_color),
                ),
                Line::default(),
                self.blurb(OVERRIDE_BLURB),
            ],
        );
    }

    fn results(&self) -> Vec<&CollectorResult> {
        vec![
            &self.overview.kernel,
            &self.overview.mesa,
            &self.overview.smart_access_memory,
            &self.overview.performance_override,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::snapshot::{MetricKind, MetricSample};

    fn sam(outcome: Result<MetricSample, CollectorError>) -> CollectorResult {
        CollectorResult {
            kind: MetricKind::SmartAccessMemory,
            outcome,
        }
    }

    #[test]
    fn denied_kernel_log_names_the_privilege() {
        let denied = sam(Err(CollectorError::PermissionDenied {
            origin: "sudo -n dmesg".to_string(),
        }));
        assert_eq!(
            sam_note(&denied).as_deref(),
            Some("Unknown: `sudo -n dmesg` needs root or passwordless sudo")
        );
    }

    #[test]
    fn read_status_has_no_note() {
        assert_eq!(sam_note(&sam(Ok(MetricSample::Status(false)))), None);
        let no_match = sam(Err(CollectorError::parse_miss("kernel log", "BAR=")));
        assert_eq!(sam_note(&no_match), None);
    }
}
