use crate::data::snapshot::ColorScheme;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub color_scheme: ColorScheme,
}

impl Theme {
    pub fn new(color_scheme: ColorScheme) -> Self {
        Self { color_scheme }
    }

    pub fn cycle() -> &'static [ColorScheme] {
        &[
            ColorScheme::Adrenaline,
            ColorScheme::Default,
            ColorScheme::Dark,
            ColorScheme::Nord,
        ]
    }

    pub fn next(&self) -> Self {
        let cycle = Self::cycle();
        let idx = cycle
            .iter()
            .position(|scheme| *scheme == self.color_scheme)
            .unwrap_or(0);
        Self::new(cycle[(idx + 1) % cycle.len()])
    }

    pub fn name(&self) -> &'static str {
        match self.color_scheme {
            ColorScheme::Adrenaline => "Adrenaline",
            ColorScheme::Default => "Graphite",
            ColorScheme::Dark => "Midnight",
            ColorScheme::Nord => "Nord",
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.get_color(Color::White))
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.get_color(Color::Gray))
    }

    /// Highlight color for titles, the active tab and gauges.
    pub fn accent(&self) -> Color {
        self.palette().accent
    }

    /// Green for on, red for off.
    pub fn status_color(&self, enabled: bool) -> Color {
        if enabled {
            self.get_color(Color::Green)
        } else {
            self.get_color(Color::Red)
        }
    }

    fn palette(&self) -> &'static Palette {
        match self.color_scheme {
            ColorScheme::Adrenaline => &ADRENALINE,
            ColorScheme::Default => &GRAPHITE,
            ColorScheme::Dark => &MIDNIGHT,
            ColorScheme::Nord => &NORD,
        }
    }

    /// Map a named terminal color onto the active palette.
    pub fn get_color(&self, default_color: Color) -> Color {
        let p = self.palette();
        match default_color {
            Color::White => p.text,
            Color::Black => p.base,
            Color::DarkGray => p.surface,
            Color::Gray => p.muted,
            Color::Cyan | Color::Blue => p.info,
            Color::Green => p.good,
            Color::Yellow => p.warn,
            Color::Red => p.hot,
            Color::Magenta | Color::LightMagenta => p.accent,
            Color::LightRed => lighten(p.hot),
            Color::LightGreen => lighten(p.good),
            Color::LightYellow => lighten(p.warn),
            _ => default_color,
        }
    }
}

struct Palette {
    text: Color,
    base: Color,
    surface: Color,
    muted: Color,
    accent: Color,
    info: Color,
    good: Color,
    warn: Color,
    hot: Color,
}

// Radeon red on near-black, as in the driver control panel.
const ADRENALINE: Palette = Palette {
    text: Color::Rgb(238, 232, 232),
    base: Color::Rgb(14, 9, 10),
    surface: Color::Rgb(44, 22, 25),
    muted: Color::Rgb(156, 118, 120),
    accent: Color::Rgb(237, 28, 36),
    info: Color::Rgb(255, 122, 92),
    good: Color::Rgb(96, 206, 140),
    warn: Color::Rgb(255, 170, 60),
    hot: Color::Rgb(255, 56, 72),
};

const GRAPHITE: Palette = Palette {
    text: Color::Rgb(220, 222, 225),
    base: Color::Rgb(20, 21, 23),
    surface: Color::Rgb(46, 48, 52),
    muted: Color::Rgb(128, 132, 138),
    accent: Color::Rgb(200, 205, 212),
    info: Color::Rgb(150, 178, 204),
    good: Color::Rgb(130, 196, 120),
    warn: Color::Rgb(222, 186, 96),
    hot: Color::Rgb(214, 96, 90),
};

const MIDNIGHT: Palette = Palette {
    text: Color::Rgb(214, 222, 240),
    base: Color::Rgb(6, 8, 18),
    surface: Color::Rgb(18, 24, 48),
    muted: Color::Rgb(104, 118, 160),
    accent: Color::Rgb(122, 140, 255),
    info: Color::Rgb(80, 190, 240),
    good: Color::Rgb(92, 220, 170),
    warn: Color::Rgb(240, 200, 100),
    hot: Color::Rgb(250, 100, 130),
};

// Polar night, snow storm, frost and aurora.
const NORD: Palette = Palette {
    text: Color::Rgb(236, 239, 244),
    base: Color::Rgb(46, 52, 64),
    surface: Color::Rgb(67, 76, 94),
    muted: Color::Rgb(216, 222, 233),
    accent: Color::Rgb(143, 188, 187),
    info: Color::Rgb(94, 129, 172),
    good: Color::Rgb(163, 190, 140),
    warn: Color::Rgb(208, 135, 112),
    hot: Color::Rgb(191, 97, 106),
};

/// Blend a third of the way towards white.
fn lighten(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let up = |c: u8| c + (255 - c) / 3;
            Color::Rgb(up(r), up(g), up(b))
        }
        other => other,
    }
}
