use anyhow::Result;
use clap::Parser;
use maze_runner_core::game::{GameStatus, UNKNOWN_MARKER, VISITED_MARKER};
use maze_runner_core::maze::PLAYER_MARKER;
use maze_runner_core::tools::GameSession;
use ratatui::{
    crossterm::{
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    io::{self, Stdout},
    path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width (5-10)
    #[arg(long, default_value_t = 7)]
    width: i32,

    /// Maze height (5-10)
    #[arg(long, default_value_t = 7)]
    height: i32,

    /// Layout file to load instead of the default maze
    #[arg(short, long, value_name = "LAYOUT_FILE")]
    map: Option<PathBuf>,

    /// Start with fog of war enabled
    #[arg(short, long)]
    fog: bool,
}

struct App {
    /// The core game session.
    session: GameSession,
    /// Message from the last action, shown in the status pane.
    message: String,
    /// Whether the maze is rendered under fog of war.
    fog_of_war: bool,
    /// Whether the help overlay is shown.
    show_help: bool,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(session: GameSession, fog_of_war: bool) -> Self {
        App {
            session,
            message: "Find your way from S to E, collecting keys along the way.".to_string(),
            fog_of_war,
            show_help: false,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('f') => self.fog_of_war = !self.fog_of_war,
            KeyCode::Char('r') => self.message = self.session.reset_game(),
            KeyCode::Up | KeyCode::Char('w') => self.move_player("up"),
            KeyCode::Down | KeyCode::Char('s') => self.move_player("down"),
            KeyCode::Left | KeyCode::Char('a') => self.move_player("left"),
            KeyCode::Right | KeyCode::Char('d') => self.move_player("right"),
            _ => {}
        }
    }

    fn move_player(&mut self, direction: &str) {
        let response = self.session.move_player(direction);
        self.message = response.message;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let session = match &args.map {
        Some(path) => {
            let file_string = std::fs::read_to_string(path)?;
            let layout: Vec<&str> = file_string.lines().collect();
            GameSession::from_layout(&layout)?
        }
        None => GameSession::new(args.width, args.height)?,
    };

    let mut terminal = setup_terminal()?;
    let mut app = App::new(session, args.fog);
    let result = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
///
/// The game is turn-based, so the loop just blocks on the next key press.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(7),    // Maze (or help overlay)
            Constraint::Length(4), // Status
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    if app.show_help {
        render_help(frame, main_layout[0]);
    } else {
        render_maze(frame, main_layout[0], app);
    }
    render_status(frame, main_layout[1], app);

    let hints = Paragraph::new("arrows/wasd move · f fog · r reset · h help · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hints, main_layout[2]);
}

/// Maps one display character from the core to a styled span. Presentation
/// only; the core's characters are never re-interpreted.
fn cell_span(c: char) -> Span<'static> {
    match c {
        PLAYER_MARKER => Span::styled("@", Style::default().fg(Color::Red).bold()),
        '#' => Span::styled("#", Style::default().fg(Color::DarkGray)),
        'K' => Span::styled("K", Style::default().fg(Color::Yellow)),
        'E' => Span::styled("E", Style::default().fg(Color::Green)),
        'S' => Span::styled("S", Style::default().fg(Color::Cyan)),
        VISITED_MARKER => Span::styled("·", Style::default().fg(Color::DarkGray)),
        UNKNOWN_MARKER => Span::styled("?", Style::default().fg(Color::DarkGray).dim()),
        '.' => Span::raw(" "),
        other => Span::raw(other.to_string()),
    }
}

/// Renders the maze onto the frame.
fn render_maze(frame: &mut Frame, area: Rect, app: &App) {
    let display = app.session.maze_display(app.fog_of_war);
    let lines: Vec<Line> = display
        .lines()
        .map(|row| Line::from(row.chars().map(cell_span).collect::<Vec<_>>()))
        .collect();

    let title = if app.fog_of_war {
        "Maze Runner (fog of war)"
    } else {
        "Maze Runner"
    };
    let maze_widget = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(maze_widget, area);
}

/// Renders the status pane: counters plus the last action's message.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.session.game_state();
    let counters = format!(
        "Keys {}/{}   Moves {}   Position ({}, {})",
        state.player.keys_collected,
        state.maze.total_keys,
        state.player.moves_made,
        state.player.position.x,
        state.player.position.y,
    );

    let (title, title_style) = match state.status {
        GameStatus::Playing => ("Status", Style::default()),
        GameStatus::Won => ("YOU WON!", Style::default().fg(Color::Green).bold()),
        GameStatus::Lost => ("Game over", Style::default().fg(Color::Red).bold()),
    };

    let status_widget = Paragraph::new(vec![
        Line::from(counters),
        Line::from(app.message.clone()),
    ])
    .block(
        Block::default()
            .title(Span::styled(title, title_style))
            .borders(Borders::ALL),
    );
    frame.render_widget(status_widget, area);
}

/// Renders the help overlay.
fn render_help(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("Movement:  arrow keys or w/a/s/d"),
        Line::from(""),
        Line::from("f          toggle fog of war"),
        Line::from("r          restart the game"),
        Line::from("h, ?       show this help"),
        Line::from("q, Esc     quit"),
        Line::from(""),
        Line::from("@ you   S start   E exit   K key   # wall"),
        Line::from("· visited   ? unexplored"),
        Line::from(""),
        Line::from("Press any key to continue."),
    ];
    let help_widget = Paragraph::new(lines)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help_widget, area);
}
