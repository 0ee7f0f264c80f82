use crate::app::{App, MenuItem, ScreenState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use pipes_core::{ConnectorSet, Direction, Position};
use std::io;

/// Each tile is drawn as a 5x3 block of characters
const CELL_W: u16 = 5;
const CELL_H: u16 = 3;
const PANEL_W: u16 = 24;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    let grid_width = app.puzzle.width() as u16 * CELL_W + 2;
    let grid_height = app.puzzle.height() as u16 * CELL_H + 2;
    let total_width = grid_width + 3 + PANEL_W;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 2;

    render_grid(stdout, app, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + grid_width + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + grid_height + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    if app.screen_state == ScreenState::Menu {
        render_menu(stdout, app, term_width, term_height)?;
    }

    if app.celebrate {
        app.celebrate = false;
        app.celebration
            .start(start_x + grid_width / 2, start_y + grid_height / 2);
    }
    if app.celebration.is_active() {
        render_particles(stdout, app, term_width, term_height)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

/// Hub glyphs indexed by the raw connector bits (N=1, E=2, S=4, W=8)
const HUB_GLYPHS: [char; 16] = [
    '·', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫', '┳', '╋',
];

/// Box-drawing glyph for the hub of a tile with these connectors
pub(crate) fn hub_glyph(connectors: ConnectorSet) -> char {
    HUB_GLYPHS[connectors.as_raw() as usize & 0b1111]
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let puzzle = &app.puzzle;
    let width = puzzle.width() as u16;
    let height = puzzle.height() as u16;
    let inner_w = (width * CELL_W) as usize;

    execute!(stdout, SetBackgroundColor(theme.bg), SetForegroundColor(theme.border))?;
    execute!(stdout, MoveTo(x, y), Print(format!("╭{}╮", "─".repeat(inner_w))))?;
    for row in 0..height * CELL_H {
        execute!(
            stdout,
            MoveTo(x, y + 1 + row),
            Print("│"),
            MoveTo(x + 1 + width * CELL_W, y + 1 + row),
            Print("│")
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + 1 + height * CELL_H),
        Print(format!("╰{}╯", "─".repeat(inner_w)))
    )?;

    // Tunnel openings on the frame
    let topology = puzzle.topology();
    execute!(stdout, SetForegroundColor(theme.tunnel))?;
    for &col in topology.column_tunnels() {
        let cx = x + 1 + col as u16 * CELL_W + CELL_W / 2;
        execute!(
            stdout,
            MoveTo(cx, y),
            Print("┃"),
            MoveTo(cx, y + 1 + height * CELL_H),
            Print("┃")
        )?;
    }
    for &row in topology.row_tunnels() {
        // North is up, so row 0 is drawn last
        let cy = y + 1 + (height - 1 - row as u16) * CELL_H + CELL_H / 2;
        execute!(
            stdout,
            MoveTo(x, cy),
            Print("━"),
            MoveTo(x + 1 + width * CELL_W, cy),
            Print("━")
        )?;
    }

    for pos in topology.positions() {
        let cx = x + 1 + pos.x as u16 * CELL_W;
        let cy = y + 1 + (height - 1 - pos.y as u16) * CELL_H;
        render_tile(stdout, app, pos, cx, cy)?;
    }

    Ok(())
}

fn render_tile(stdout: &mut io::Stdout, app: &App, pos: Position, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let tile = app.puzzle.tile(pos);
    let turning = !tile.is_idle();

    // Show the old pose for the first half of a turn, then the target
    let connectors = match app.actuator.remaining(pos) {
        Some(left) if left > 0.5 => tile.connectors(),
        _ if turning => tile.target_connectors(),
        _ => tile.connectors(),
    };
    let pipe = if turning {
        theme.turning
    } else {
        theme.pipe_color(tile.connected_colors())
    };
    let bg = if pos == app.cursor {
        theme.cursor_bg
    } else {
        theme.bg
    };

    let vertical = |d: Direction| if connectors.contains(d) { "  ┃  " } else { "     " };
    let west = if connectors.contains(Direction::West) { "━━" } else { "  " };
    let east = if connectors.contains(Direction::East) { "━━" } else { "  " };

    let (hub, hub_color) = if let Some(color) = tile.source_color() {
        ('◉', theme.pipe_color(&[color]))
    } else if tile.is_locked() {
        (hub_glyph(connectors), theme.locked)
    } else {
        (hub_glyph(connectors), pipe)
    };

    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(pipe),
        MoveTo(x, y),
        Print(vertical(Direction::North)),
        MoveTo(x, y + 1),
        Print(west),
        SetForegroundColor(hub_color),
        Print(hub),
        SetForegroundColor(pipe),
        Print(east),
        MoveTo(x, y + 2),
        Print(vertical(Direction::South)),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let puzzle = &app.puzzle;
    let evaluation = puzzle.evaluation();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title_color = if puzzle.is_won() { theme.success } else { theme.key };
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(title_color),
        Print("═══ PIPES ═══")
    )?;

    let lines = [
        format!("Time: {:>12}", app.elapsed_string()),
        format!("Seed: {:>12}", puzzle.seed()),
        format!("Size: {:>12}", format!("{}x{}", puzzle.width(), puzzle.height())),
        format!("Tunnels: {:>9}", puzzle.topology().tunnel_count()),
        format!("Moves: {:>11}", app.moves),
        format!("Hints used: {:>6}", app.hints_used),
        format!("Leaks: {:>11}", evaluation.leak_count()),
        format!("Dry tiles: {:>7}", evaluation.dry_count()),
    ];
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + 2 + i as u16),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }

    let status_y = y + 3 + lines.len() as u16;
    if puzzle.is_won() {
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.success),
            Print("Solved!  n: next  r: retry")
        )?;
    } else if app.actuator.is_busy() {
        execute!(
            stdout,
            MoveTo(x, status_y),
            SetForegroundColor(theme.turning),
            Print("Turning...")
        )?;
    }

    let tile = puzzle.tile(app.cursor);
    let mut tags = Vec::new();
    if tile.is_source() {
        tags.push("source");
    }
    if tile.is_locked() {
        tags.push("locked");
    }
    if let Some(status) = evaluation.status(puzzle.topology().index(app.cursor)) {
        if status.leaking {
            tags.push("leaking");
        }
        if status.colors.is_empty() {
            tags.push("dry");
        }
    }
    execute!(
        stdout,
        MoveTo(x, status_y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Tile ({}, {}) {}", app.cursor.x, app.cursor.y, tags.join(" ")))
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("hjkl/Arrows", "Move"),
        ("z/,", "Turn left"),
        ("x/Space", "Turn right"),
        ("?", "Hint"),
        ("r", "Retry"),
        ("n", "New puzzle"),
        ("Esc", "Menu"),
        ("q", "Quit"),
    ];

    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 24;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(stdout: &mut io::Stdout, app: &App, msg: &str, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.cursor_bg),
        Print(&padded),
        SetBackgroundColor(theme.bg)
    )?;

    Ok(())
}

fn render_menu(stdout: &mut io::Stdout, app: &App, term_width: u16, term_height: u16) -> io::Result<()> {
    let theme = &app.theme;
    let settings = &app.settings;
    let menu_w: u16 = 32;
    let menu_h: u16 = MenuItem::ALL.len() as u16 + 4;
    let x = term_width.saturating_sub(menu_w) / 2;
    let y = term_height.saturating_sub(menu_h) / 2;

    execute!(stdout, SetBackgroundColor(theme.bg), SetForegroundColor(theme.border))?;
    execute!(stdout, MoveTo(x, y), Print(format!("╭{}╮", "─".repeat(menu_w as usize - 2))))?;
    for row in 1..menu_h - 1 {
        execute!(
            stdout,
            MoveTo(x, y + row),
            Print(format!("│{}│", " ".repeat(menu_w as usize - 2)))
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + menu_h - 1),
        Print(format!("╰{}╯", "─".repeat(menu_w as usize - 2)))
    )?;
    execute!(stdout, MoveTo(x + 2, y + 1), SetForegroundColor(theme.key), Print("Settings"))?;

    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let value = match item {
            MenuItem::Width => format!("◂ {:>2} ▸", settings.width),
            MenuItem::Height => format!("◂ {:>2} ▸", settings.height),
            MenuItem::Sources => format!("◂ {:>2} ▸", settings.sources),
            MenuItem::Locks => format!("◂ {:>2} ▸", settings.locks),
            MenuItem::Tunnels => format!("◂ {:>2} ▸", settings.tunnels),
            MenuItem::SourceColors => {
                if settings.source_colors { "[on]".to_string() } else { "[off]".to_string() }
            }
            MenuItem::Seed => match settings.seed {
                Some(seed) => seed.to_string(),
                None => "random".to_string(),
            },
            MenuItem::Start | MenuItem::Retry | MenuItem::Quit => String::new(),
        };
        let selected = i == app.menu_selection;
        let (fg, bg) = if selected {
            (theme.fg, theme.cursor_bg)
        } else {
            (theme.info, theme.bg)
        };
        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!("{:<16}{:>12}", item.label(), value)),
            SetBackgroundColor(theme.bg)
        )?;
    }

    Ok(())
}

fn render_particles(stdout: &mut io::Stdout, app: &App, term_width: u16, term_height: u16) -> io::Result<()> {
    execute!(stdout, SetBackgroundColor(app.theme.bg))?;
    for p in app.celebration.particles() {
        if p.is_visible(term_width, term_height) {
            execute!(
                stdout,
                MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(p.color),
                Print(p.char)
            )?;
        }
    }
    execute!(stdout, SetForegroundColor(Color::Reset))?;
    Ok(())
}
