//! Line-oriented commands driving the [`App`] from a terminal.

use core::str::FromStr;

use thiserror::Error;

use finprod_core::{DomainError, NotificationId, ProductId};
use finprod_products::Field;

use crate::app::{ActiveView, App};
use crate::render;
use crate::router::Route;
use crate::views::SubmitOutcome;

pub const HELP: &str = "\
commands:
  open <path>          go to /, /products/new or /products/edit/<id>
  search <term>        filter the product list (empty term clears)
  next | prev          change page
  per-page <n>         5, 10 or 20 rows per page
  delete <id>          ask to delete a product
  confirm | cancel     answer the delete confirmation
  new | edit <id>      open the product form
  set <field> <value>  fill a form field (id, name, description, logo, date_release)
  check-id             ask the backend whether the typed id is taken
  submit | reset       save or clear the form
  dismiss <n>          close a notification (pinned ones stay)
  dismiss-all          close every notification
  show                 print the current screen
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Search(String),
    Next,
    Prev,
    PerPage(usize),
    Delete(ProductId),
    Confirm,
    Cancel,
    New,
    Edit(ProductId),
    Set(Field, String),
    CheckId,
    Submit,
    Reset,
    Dismiss(NotificationId),
    DismissAll,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid page size '{0}'")]
    InvalidPageSize(String),

    #[error("no product '{0}' in the list")]
    UnknownProduct(ProductId),

    #[error("{0} cannot be closed")]
    NotDismissible(NotificationId),

    #[error("this command needs the {0} screen")]
    WrongScreen(&'static str),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl FromStr for Command {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let required = |command: &'static str, argument: &'static str| {
            if rest.is_empty() {
                Err(ShellError::MissingArgument { command, argument })
            } else {
                Ok(rest)
            }
        };

        let command = match name {
            "" => return Err(ShellError::Empty),
            "open" => Command::Open(required("open", "a path")?.to_string()),
            "search" => Command::Search(rest.to_string()),
            "next" => Command::Next,
            "prev" => Command::Prev,
            "per-page" => {
                let raw = required("per-page", "a page size")?;
                raw.parse()
                    .map(Command::PerPage)
                    .map_err(|_| ShellError::InvalidPageSize(raw.to_string()))?
            }
            "delete" => Command::Delete(required("delete", "a product id")?.parse()?),
            "confirm" => Command::Confirm,
            "cancel" => Command::Cancel,
            "new" => Command::New,
            "edit" => Command::Edit(required("edit", "a product id")?.parse()?),
            "set" => {
                let args = required("set", "a field and a value")?;
                let (field, value) = match args.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (args, ""),
                };
                Command::Set(field.parse()?, value.to_string())
            }
            "check-id" => Command::CheckId,
            "submit" => Command::Submit,
            "reset" => Command::Reset,
            "dismiss" => Command::Dismiss(required("dismiss", "a notification number")?.parse()?),
            "dismiss-all" => Command::DismissAll,
            "show" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ShellError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text and read the next line.
    Continue(String),
    Quit,
}

/// Parse and run one input line.
pub async fn run_line(app: &mut App, line: &str) -> Result<Flow, ShellError> {
    let command: Command = line.parse()?;
    execute(app, command).await
}

/// Run `command`, follow any navigation it caused and render the screen.
pub async fn execute(app: &mut App, command: Command) -> Result<Flow, ShellError> {
    tracing::debug!(?command, "execute");
    let mut note = None;

    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => return Ok(Flow::Continue(format!("{HELP}\n"))),
        Command::Show => {}
        Command::Open(path) => {
            app.open(&path).await;
        }
        Command::New => app.open_route(Route::NewProduct).await,
        Command::Edit(id) => app.open_route(Route::EditProduct(id)).await,
        Command::Dismiss(id) => {
            let store = app.notifications();
            if store.snapshot().iter().any(|n| n.id == id && !n.dismissible) {
                return Err(ShellError::NotDismissible(id));
            }
            store.dismiss(id);
        }
        Command::DismissAll => app.notifications().dismiss_all(),

        Command::Search(term) => list(app)?.search(&term),
        Command::Next => list(app)?.next_page(),
        Command::Prev => list(app)?.previous_page(),
        Command::PerPage(size) => {
            if !finprod_products::Pagination::PAGE_SIZE_OPTIONS.contains(&size) {
                return Err(ShellError::InvalidPageSize(size.to_string()));
            }
            list(app)?.set_items_per_page(size);
        }
        Command::Delete(id) => {
            if !list(app)?.request_delete_by_id(&id) {
                return Err(ShellError::UnknownProduct(id));
            }
        }
        Command::Confirm => list(app)?.confirm_delete().await,
        Command::Cancel => list(app)?.cancel_delete(),

        Command::Set(field, value) => {
            if !form(app)?.set_value(field, value) {
                note = Some(format!("{} is locked", field.label()));
            }
        }
        Command::CheckId => form(app)?.validate_id().await,
        Command::Reset => form(app)?.reset(),
        Command::Submit => {
            note = match form(app)?.submit().await {
                SubmitOutcome::Busy => Some("a save is already running".to_string()),
                SubmitOutcome::TornDown => Some("the form was closed".to_string()),
                SubmitOutcome::Invalid | SubmitOutcome::Saved(_) | SubmitOutcome::Failed(_) => None,
            };
        }
    }

    app.follow_navigation().await;

    let mut out = screen(app);
    if let Some(note) = note {
        out.push_str(&note);
        out.push('\n');
    }
    Ok(Flow::Continue(out))
}

/// The mounted view as text.
pub fn screen(app: &App) -> String {
    match app.active() {
        Some(ActiveView::List(view)) => render::render_list(&view.snapshot()),
        Some(ActiveView::Form(view)) => render::render_form(&view.snapshot()),
        None => String::new(),
    }
}

fn list(app: &App) -> Result<crate::views::ProductListView, ShellError> {
    app.list().cloned().ok_or(ShellError::WrongScreen("product list"))
}

fn form(app: &App) -> Result<crate::views::ProductFormView, ShellError> {
    app.form().cloned().ok_or(ShellError::WrongScreen("product form"))
}
