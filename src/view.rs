//! Plain-text rendering of pages for the command line

use colored::Colorize;
use std::fmt::Write;

use crate::{
    models::{Book, BorrowedIndex, BorrowedRecord, Notice, Review},
    services::sync::SyncState,
};

/// One book card. Action hints are only shown with a session.
pub fn book_card(book: &Book, borrowed: bool, authenticated: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", book.id, book.title.bold());
    let _ = writeln!(out, "    by {}", book.author);
    if let Some(genre) = &book.genre {
        let _ = writeln!(out, "    {}", genre);
    }
    let status = if book.is_available {
        book.status_label().green()
    } else {
        book.status_label().red()
    };
    let _ = writeln!(out, "    {}  |  Read {} times", status, book.read_count);

    if authenticated {
        let hint = if borrowed {
            format!("lending return {}", book.id)
        } else if book.is_available {
            format!("lending borrow {}", book.id)
        } else {
            "not available".to_string()
        };
        let _ = writeln!(out, "    -> {}", hint.dimmed());
    }
    out
}

/// A page of books, with its loading/error state
pub fn book_page(
    title: &str,
    state: &SyncState<Book>,
    index: &BorrowedIndex,
    authenticated: bool,
    empty_message: &str,
) -> String {
    let mut out = format!("{}\n\n", title.bold().underline());

    if state.loading {
        out.push_str("Loading...\n");
        return out;
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", error.red());
        return out;
    }
    if state.data.is_empty() {
        let _ = writeln!(out, "{}", empty_message);
        return out;
    }
    for book in &state.data {
        out.push_str(&book_card(book, index.is_borrowed(book.id), authenticated));
        out.push('\n');
    }
    out
}

pub fn my_books(records: &[BorrowedRecord]) -> String {
    let mut out = format!("{}\n\n", "My Borrowed Books".bold().underline());
    if records.is_empty() {
        out.push_str("You have not borrowed any books yet.\n");
        return out;
    }
    for record in records {
        out.push_str(&book_card(&record.book, true, true));
        if let Some(at) = record.borrowed_at {
            let _ = writeln!(out, "    borrowed {}", at.format("%Y-%m-%d %H:%M"));
        }
        out.push('\n');
    }
    out
}

pub fn reviews(book_id: i64, reviews: &[Review]) -> String {
    let mut out = format!("{}\n\n", format!("Reviews for book {}", book_id).bold());
    if reviews.is_empty() {
        out.push_str("No reviews yet.\n");
    }
    for review in reviews {
        let stars = "*".repeat(review.rating.clamp(0, 5) as usize);
        let _ = writeln!(
            out,
            "{:<5} {} ({})",
            stars,
            review.user,
            review.created_at.format("%Y-%m-%d")
        );
        if let Some(comment) = &review.comment {
            let _ = writeln!(out, "      {}", comment);
        }
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    if notice.is_error {
        notice.message.red().to_string()
    } else {
        notice.message.clone()
    }
}
