use crate::{
    components::{field, panel, Component},
    data::snapshot::{CollectorResult, GpuReport, RefreshTick},
    theme::Theme,
};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

pub struct GpuComponent {
    pub report: GpuReport,
    pub last_tick: Option<u64>,
    pub period: Duration,
    pub theme: Theme,
}

impl GpuComponent {
    pub fn new(report: GpuReport, period: Duration, theme: Theme) -> Self {
        Self {
            report,
            last_tick: None,
            period,
            theme,
        }
    }

    /// Replace every value with the fresh refresh, failed ones included.
    pub fn apply(&mut self, tick: RefreshTick) {
        self.report = tick.report;
        self.last_tick = Some(tick.tick);
    }

    fn get_temperature_color(&self, temp: f32) -> Color {
        // Dynamic temperature color based on LERP with proper thresholds
        if temp < 50.0 {
            // Cool: Electric Emerald (#00ff87)
            Color::Rgb(0, 255, 135)
        } else if temp <= 75.0 {
            // Moderate: Interpolate between Electric Emerald and Cyber Yellow
            let t = (temp - 50.0) / 25.0;
            let r = (249.0 * t) as u8;
            let b = (135.0 - 135.0 * t) as u8;
            Color::Rgb(r, 255, b)
        } else if temp <= 85.0 {
            // Warm: Interpolate between Cyber Yellow and Orange
            let t = (temp - 75.0) / 10.0;
            let r = (249.0 + 6.0 * t) as u8;
            let g = (255.0 - 90.0 * t) as u8;
            Color::Rgb(r, g, 0)
        } else {
            // Dangerous: Neon Rose (#ff003c)
            Color::Rgb(255, 0, 60)
        }
    }
}

/// Pull the number out of a sensors reading such as `+45.0°C`.
pub fn temperature_celsius(text: &str) -> Option<f32> {
    let numeric: String = text
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    numeric.parse().ok()
}

impl Component for GpuComponent {
    fn render_in_area(&self, f: &mut Frame, area: Rect) {
        let block = panel("GPU", &self.theme);
        let inner_area = block.inner(area);
        f.render_widget(block, area);

        let temperature = self.report.temperature.text();
        let temp_style = match temperature_celsius(&temperature) {
            Some(celsius) => Style::default().fg(self.get_temperature_color(celsius)),
            None => self.theme.text_style(),
        };

        let footer = match self.last_tick {
            Some(tick) => format!(
                "refresh #{} every {:.1}s",
                tick,
                self.period.as_secs_f32()
            ),
            None => format!("first refresh in {:.1}s", self.period.as_secs_f32()),
        };

        let lines = vec![
            field(
                "Model",
                self.report.name.text(),
                &self.theme,
                Style::default().fg(self.theme.accent()),
            ),
            Line::default(),
            field("Temperature", temperature, &self.theme, temp_style),
            Line::default(),
            field(
                "Fan Speed",
                self.report.fan_speed.text(),
                &self.theme,
                self.theme.text_style(),
            ),
            Line::default(),
            Line::from(Span::styled(
                footer,
                Style::default().fg(self.theme.get_color(Color::Gray)),
            )),
        ];

        f.render_widget(
            Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }),
            inner_area,
        );
    }

    fn results(&self) -> Vec<&CollectorResult> {
        self.report.results().to_vec()
    }
}
