//! Plain-text rendering of view snapshots for the terminal.

use std::fmt::Write as _;

use finprod_products::Field;
use finprod_products::date::DISPLAY_DATE_FORMAT;

use crate::notification::Notification;
use crate::views::{ConfirmationModal, FormMode, LoadingIndicator, ProductFormState, ProductListState};

/// One line per notification; those without a close control are marked `(pinned)`.
pub fn render_notifications(notifications: &[Notification]) -> String {
    let mut out = String::new();
    for notification in notifications {
        let pinned = if notification.dismissible { "" } else { " (pinned)" };
        let _ = writeln!(
            out,
            "[{}] {} {}{pinned}",
            notification.id.as_u64(),
            notification.kind.as_str().to_uppercase(),
            notification.message
        );
    }
    out
}

pub fn render_loading(loading: &LoadingIndicator) -> String {
    let overlay = if loading.overlay { " overlay" } else { "" };
    format!("{} [{}{overlay}]\n", loading.message, loading.size_class())
}

/// Empty when the modal is closed.
pub fn render_modal(modal: &ConfirmationModal) -> String {
    if !modal.is_open {
        return String::new();
    }
    format!(
        "== {} ==\n{}\n[{}: confirm] [{}: cancel]\n",
        modal.title, modal.message, modal.confirm_text, modal.cancel_text
    )
}

pub fn render_list(state: &ProductListState) -> String {
    if state.is_loading {
        return render_loading(&state.loading);
    }

    let mut out = String::new();
    if !state.search_term.is_empty() {
        let _ = writeln!(out, "Search: {}", state.search_term);
    }

    let rows = state.page();
    if rows.is_empty() {
        out.push_str("No products found\n");
    } else {
        let _ = writeln!(
            out,
            "{:<10} | {:<24} | {:<32} | {:<10} | {:<10}",
            "ID", "Name", "Description", "Release", "Revision"
        );
        for product in rows {
            let _ = writeln!(
                out,
                "{:<10} | {:<24} | {:<32} | {:<10} | {:<10}",
                product.id,
                truncate(&product.name, 24),
                truncate(&product.description, 32),
                product.date_release.format(DISPLAY_DATE_FORMAT),
                product.date_revision.format(DISPLAY_DATE_FORMAT),
            );
        }
    }

    let _ = writeln!(
        out,
        "{} results | Page {} of {} | {} per page",
        state.filtered.len(),
        state.current_page(),
        state.total_pages(),
        state.pagination.items_per_page()
    );
    out.push_str(&render_modal(&state.delete_modal));
    out
}

pub fn render_form(state: &ProductFormState) -> String {
    let mut out = String::new();
    let title = match &state.mode {
        FormMode::New => "New product".to_string(),
        FormMode::Editing(id) => format!("Edit product {id}"),
    };
    let _ = writeln!(out, "== {title} ==");

    for field in Field::ALL {
        let control = state.form.control(field);
        let lock = if control.disabled { " (locked)" } else { "" };
        let _ = writeln!(out, "{}{lock}: {}", field.label(), control.value);
        if state.form.has_error(field) {
            if let Some(message) = state.form.error_message(field) {
                let _ = writeln!(out, "  ! {message}");
            }
        }
    }

    if state.is_submitting {
        out.push_str("Saving...\n");
    }
    out
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}
