use crate::{
    action::Action,
    components::{
        cpu::CpuComponent, gpu::GpuComponent, home::HomeComponent, memory::MemoryComponent,
        settings::{self, SettingsComponent},
        Component,
    },
    config::AppConfig,
    data::{collector::Collector, snapshot::RefreshTick, RefreshScheduler},
    theme::Theme,
    tui::Tui,
};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Performance,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Performance, Tab::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Performance => "Performance",
            Tab::Settings => "Settings",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct App {
    pub should_quit: bool,
    pub tui: Tui,
    pub tab: Tab,
    pub theme: Theme,
    pub config: AppConfig,
    pub home_component: HomeComponent,
    pub gpu_component: GpuComponent,
    pub cpu_component: CpuComponent,
    pub memory_component: MemoryComponent,
    pub settings_component: SettingsComponent,
    hostname: String,
    scheduler: RefreshScheduler,
    refresh_rx: mpsc::UnboundedReceiver<RefreshTick>,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let collector = Arc::new(Collector::system(config.sources.clone()));

        // Static metrics are sampled once, off the async workers.
        let initial = Arc::clone(&collector);
        let (overview, performance) =
            tokio::task::spawn_blocking(move || (initial.overview(), initial.performance()))
                .await?;

        let tui = Tui::new()?;
        let theme = Theme::new(config.color_scheme);
        let mut scheduler = RefreshScheduler::new(config.refresh_interval_ms);

        let home_component = HomeComponent::new(overview, theme.clone());
        let cpu_component = CpuComponent::new(performance.cpu, theme.clone());
        let memory_component = MemoryComponent::new(performance.memory, theme.clone());
        let settings_component = SettingsComponent::new(config.clone(), theme.clone());
        let gpu_component = GpuComponent::new(performance.gpu, scheduler.period(), theme.clone());

        // The GPU view exists now, so its refresh starts here and runs until exit.
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel::<RefreshTick>();
        scheduler.start(collector, refresh_tx);

        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());

        let mut app = Self {
            should_quit: false,
            tui,
            tab: Tab::Home,
            theme,
            config,
            home_component,
            gpu_component,
            cpu_component,
            memory_component,
            settings_component,
            hostname,
            scheduler,
            refresh_rx,
        };
        app.refresh_diagnostics();
        Ok(app)
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let frame_duration = Duration::from_millis(100);
        let mut needs_redraw = true;

        loop {
            // Receive new refreshes first
            while let Ok(tick) = self.refresh_rx.try_recv() {
                self.gpu_component.apply(tick);
                self.refresh_diagnostics();
                needs_redraw = true;
            }

            if needs_redraw {
                self.draw_frame()?;
                needs_redraw = false;
            }

            // Handle events
            if crossterm::event::poll(frame_duration)? {
                match crossterm::event::read()? {
                    CrosstermEvent::Key(key) => {
                        // Ignore key release events to avoid double-handling keys like Esc.
                        if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            if let Some(action) = Self::handle_key_events(key) {
                                self.handle_action(action);
                            }
                        }
                        needs_redraw = true;
                    }
                    CrosstermEvent::Resize(width, height) => {
                        self.tui.resize(width, height)?;
                        needs_redraw = true;
                    }
                    _ => {}
                }
            } else {
                // Keeps the clock in the status line moving.
                self.handle_action(Action::Tick);
                needs_redraw = true;
                tokio::task::yield_now().await;
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            scheduler = ?self.scheduler.state(),
            last_tick = ?self.gpu_component.last_tick,
            "shutting down"
        );
        self.tui.exit()?;
        Ok(())
    }

    fn handle_key_events(key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab | KeyCode::Right => Some(Action::NextTab),
            KeyCode::BackTab | KeyCode::Left => Some(Action::PrevTab),
            KeyCode::Char(c @ '1'..='3') => Some(Action::SelectTab(c as usize - '1' as usize)),
            KeyCode::Char('t') => Some(Action::SwitchTheme),
            KeyCode::Char('w') => Some(Action::SaveConfig),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::NextTab => {
                self.tab = self.tab.next();
            }
            Action::PrevTab => {
                self.tab = self.tab.prev();
            }
            Action::SelectTab(idx) => {
                if let Some(tab) = Tab::ALL.get(idx) {
                    self.tab = *tab;
                }
            }
            Action::SwitchTheme => {
                self.theme = self.theme.next();
                self.config.color_scheme = self.theme.color_scheme;
                self.sync_components();
            }
            Action::SaveConfig => {
                self.config.color_scheme = self.theme.color_scheme;
                let status = match self.config.save() {
                    Ok(path) => {
                        info!(path = %path.display(), "config saved");
                        format!("Saved to {}", path.display())
                    }
                    Err(err) => {
                        warn!("failed to save config: {}", err);
                        format!("Save failed: {}", err)
                    }
                };
                self.settings_component.status = Some(status);
                self.settings_component.config = self.config.clone();
            }
            Action::Tick => {}
        }
    }

    fn refresh_diagnostics(&mut self) {
        let reasons = settings::unavailable_reasons(
            self.home_component
                .results()
                .into_iter()
                .chain(self.gpu_component.results())
                .chain(self.cpu_component.results())
                .chain(self.memory_component.results()),
        );
        self.settings_component.reasons = reasons;
    }

    fn sync_components(&mut self) {
        self.home_component.theme = self.theme.clone();
        self.gpu_component.theme = self.theme.clone();
        self.cpu_component.theme = self.theme.clone();
        self.memory_component.theme = self.theme.clone();
        self.settings_component.theme = self.theme.clone();
    }

    fn draw_frame(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let tab = self.tab;
        let theme = self.theme.clone();
        let hostname = self.hostname.clone();
        let home = &self.home_component;
        let gpu = &self.gpu_component;
        let cpu = &self.cpu_component;
        let memory = &self.memory_component;
        let settings = &self.settings_component;

        self.tui.draw(|f| {
            let size = f.area();

            // Top (status + tabs), Middle (active tab), Bottom (keybinds)
            let main_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Top status line
                    Constraint::Length(1), // Tab bar
                    Constraint::Min(0),    // Main content area
                    Constraint::Length(1), // Bottom keybinds line
                ])
                .split(size);

            render_top_status_line(f, main_chunks[0], &hostname, &theme);
            render_tab_bar(f, main_chunks[1], tab, &theme);

            let body = main_chunks[2];
            match tab {
                Tab::Home => home.render_in_area(f, body),
                Tab::Performance => {
                    let rows = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(10), Constraint::Min(5)])
                        .split(body);
                    let top = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(rows[0]);
                    let bottom = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(rows[1]);

                    gpu.render_in_area(f, top[0]);
                    cpu.render_in_area(f, top[1]);
                    memory.render_in_area(f, bottom[0]);
                }
                Tab::Settings => settings.render_in_area(f, body),
            }

            render_bottom_keybinds(f, main_chunks[3], &theme);
        })?;
        Ok(())
    }
}

fn render_top_status_line(
    f: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    hostname: &str,
    theme: &Theme,
) {
    use ratatui::{
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::Paragraph,
    };

    let current_time = chrono::Local::now().format("%H:%M:%S").to_string();
    let status_line = Line::from(vec![
        Span::styled(
            " PULSETOOL ",
            Style::default()
                .fg(theme.get_color(Color::Black))
                .bg(theme.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  host:{}  ", hostname),
            Style::default().fg(theme.get_color(Color::White)),
        ),
        Span::styled(
            format!("time:{} ", current_time),
            Style::default().fg(theme.get_color(Color::Green)),
        ),
        Span::styled(
            format!(" theme:{} ", theme.name()),
            Style::default()
                .fg(theme.get_color(Color::LightMagenta))
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let block = Paragraph::new(status_line).style(
        Style::default()
            .fg(theme.get_color(Color::White))
            .bg(theme.get_color(Color::DarkGray)),
    );
    f.render_widget(block, area);
}

fn render_tab_bar(
    f: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    active: Tab,
    theme: &Theme,
) {
    use ratatui::{
        style::{Modifier, Style},
        widgets::Tabs,
    };

    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active.index())
        .style(theme.text_style())
        .highlight_style(
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn render_bottom_keybinds(f: &mut ratatui::Frame, area: ratatui::layout::Rect, theme: &Theme) {
    use ratatui::{
        style::{Color, Style},
        text::{Line, Span},
        widgets::Paragraph,
    };

    let keybinds_line = Line::from(vec![
        Span::styled(" [q] quit ", Style::default().fg(theme.get_color(Color::Red))),
        Span::styled(
            " [←/→] tab ",
            Style::default().fg(theme.get_color(Color::Green)),
        ),
        Span::styled(
            " [1-3] jump ",
            Style::default().fg(theme.get_color(Color::Cyan)),
        ),
        Span::styled(
            " [t] theme ",
            Style::default().fg(theme.get_color(Color::Yellow)),
        ),
        Span::styled(
            " [w] save ",
            Style::default().fg(theme.get_color(Color::LightGreen)),
        ),
    ]);

    let block = Paragraph::new(keybinds_line).style(
        Style::default()
            .fg(theme.get_color(Color::White))
            .bg(theme.get_color(Color::DarkGray)),
    );
    f.render_widget(block, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn tabs_wrap_both_ways() {
        assert_eq!(Tab::Home.next(), Tab::Performance);
        assert_eq!(Tab::Settings.next(), Tab::Home);
        assert_eq!(Tab::Home.prev(), Tab::Settings);
    }

    #[test]
    fn keys_map_to_actions() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(App::handle_key_events(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(App::handle_key_events(key(KeyCode::Tab)), Some(Action::NextTab));
        assert_eq!(
            App::handle_key_events(key(KeyCode::Char('2'))),
            Some(Action::SelectTab(1))
        );
        assert_eq!(App::handle_key_events(key(KeyCode::Char('x'))), None);
    }
}
