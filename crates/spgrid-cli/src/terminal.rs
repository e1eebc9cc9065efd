//! Terminal surface and prompts

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use parking_lot::Mutex;
use spgrid_grid::{
    CellView, ControlKind, ControlValue, GridSurface, GridView, Notification, RowEditState,
    UserInteraction, WidgetOptions,
};

/// What the surface currently shows
#[derive(Debug, Clone)]
pub struct Frame {
    pub options: WidgetOptions,
    pub view: GridView,
}

/// Surface that keeps the latest frame for the binary to print
///
/// Editing goes through several redraws; printing them all would bury the
/// result, so only the last one is printed.
#[derive(Default, Clone)]
pub struct TerminalSurface {
    current: Arc<Mutex<Option<Frame>>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Frame> {
        self.current.lock().clone()
    }
}

impl GridSurface for TerminalSurface {
    fn initialize(&mut self, options: &WidgetOptions, view: &GridView) {
        tracing::debug!(table_id = %view.table_id, rows = view.rows.len(), "Grid mounted");
        *self.current.lock() = Some(Frame {
            options: options.clone(),
            view: view.clone(),
        });
    }

    fn update(&mut self, view: &GridView) {
        if let Some(frame) = self.current.lock().as_mut() {
            frame.view = view.clone();
        }
    }

    fn teardown(&mut self) {
        self.current.lock().take();
    }
}

/// Render one page of the grid; `page` is 1-based.
pub fn render_table(frame: &Frame, page: usize) -> String {
    let view = &frame.view;
    let page_length = frame.options.page_length.max(1);
    let total = view.rows.len();
    let start = page.saturating_sub(1).saturating_mul(page_length).min(total);
    let end = (start + page_length).min(total);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(view.headers.iter().map(Cell::new).chain([Cell::new("Actions")]));

    for row in &view.rows[start..end] {
        let mut cells: Vec<Cell> = row.cells.iter().map(|c| Cell::new(cell_text(c))).collect();
        let actions = row
            .actions
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(" | ");
        let actions = match row.state {
            RowEditState::Viewing => actions,
            RowEditState::Editing => format!("editing: {}", actions),
            RowEditState::AddingNew => format!("new: {}", actions),
        };
        cells.push(Cell::new(actions));
        table.add_row(cells);
    }

    let summary = if total == 0 {
        "No data available in table".to_string()
    } else {
        format!("Showing {} to {} of {} entries", start + 1, end, total)
    };

    format!("{}\n{}", table, summary)
}

fn cell_text(cell: &CellView) -> String {
    match cell {
        CellView::Display { text, .. } => text.clone(),
        CellView::Control(control) => match (&control.kind, &control.value) {
            (_, ControlValue::Checked(checked)) => format!("[{}]", if *checked { "x" } else { " " }),
            (ControlKind::Select(options), _) => format!("<{}> ({} options)", control.text(), options.len()),
            (ControlKind::ReadOnly, _) => control.text(),
            (ControlKind::Input(_), _) => format!("[{}]", control.text()),
        },
    }
}

/// Prints notifications and asks confirmations on stdin
pub struct TerminalInteraction {
    assume_yes: bool,
}

impl TerminalInteraction {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl UserInteraction for TerminalInteraction {
    fn notify(&self, notification: &Notification) {
        if notification.success {
            println!("{}", notification);
        } else {
            eprintln!("{}", notification);
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
