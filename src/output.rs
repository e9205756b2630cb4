//! CLI output formatting for scans and the collection.
//!
//! # Information-First Display
//!
//! A card is shown by what was recognized on it (player, team, set, number),
//! with the photo identified by a short fingerprint of its bytes rather than
//! a file path. Source paths appear only as the header of a scan attempt, so
//! a run over a directory reads as an inventory of cards.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! 001 binder/jordan.jpg
//!     State: recognized
//!     Player: J. Doe
//!     Team: Bulls
//!     Set: 1997 Topps
//!     Number: 23
//!     Image: 3f2a9c0e11b2 (48213 bytes)
//! 002 binder/blurry.jpg
//!     State: failed
//!     Error: Invalid response format
//!     Hint: the recognition server sent an unexpected reply; please report it
//!
//! Scanned 2 photos, 1 recognized, 1 added to collection
//! ```
//!
//! ## Collection (grid)
//!
//! ```text
//! Collection (4 cards)
//! 001 J. Doe #23     002 A. Smith #7     003 B. Jones #11
//! 004 C. Brown #1
//! ```
//!
//! ## Collection (pages)
//!
//! ```text
//! Card 1 of 4
//!     Player: J. Doe
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::recognition::RecognitionError;
use crate::session::{ScanState, SessionView};
use crate::types::{CardRecord, ImageBlob};
use std::path::Path;

/// Shown in every field while the upload is in flight.
pub const LOADING: &str = "Loading...";

/// Shown instead of a grid or page when nothing was added yet.
pub const EMPTY_COLLECTION: &str = "No cards in collection";

const INVALID_RESPONSE_HINT: &str =
    "the recognition server sent an unexpected reply; please report it";

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn image_line(image: &ImageBlob) -> String {
    format!("Image: {} ({} bytes)", image.fingerprint(), image.len())
}

/// The four card fields, each on its own line.
fn field_lines(record: &CardRecord, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{pad}Player: {}", record.player_name()),
        format!("{pad}Team: {}", record.team_name()),
        format!("{pad}Set: {}", record.set_name()),
        format!("{pad}Number: {}", record.card_number()),
    ]
}

fn loading_lines(depth: usize) -> Vec<String> {
    let pad = indent(depth);
    ["Player", "Team", "Set", "Number"]
        .iter()
        .map(|label| format!("{pad}{label}: {LOADING}"))
        .collect()
}

fn error_lines(error: &RecognitionError, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = vec![format!("{pad}Error: {error}")];
    if matches!(error, RecognitionError::InvalidResponseFormat) {
        lines.push(format!("{pad}Hint: {INVALID_RESPONSE_HINT}"));
    }
    lines
}

/// Compact grid cell: index, player, and card number.
fn grid_cell(pos: usize, record: &CardRecord) -> String {
    format!(
        "{} {} #{}",
        format_index(pos),
        record.player_name(),
        record.card_number()
    )
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Scan session
// ============================================================================

/// Format the current scan screen.
///
/// Fields read [`LOADING`] while uploading. A failure shows the error
/// message; an invalid server reply adds a hint to report it instead of
/// retrying.
pub fn format_session_view(view: &SessionView, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = vec![format!("{pad}State: {}", view.state)];

    match view.state {
        ScanState::Uploading => lines.extend(loading_lines(depth)),
        ScanState::Recognized => {
            if let Some(record) = &view.record {
                lines.extend(field_lines(record, depth));
            }
        }
        ScanState::Failed => {
            if let Some(error) = &view.error {
                lines.extend(error_lines(error, depth));
            }
        }
        ScanState::Idle | ScanState::Capturing => {}
    }

    if let Some(image) = &view.image {
        lines.push(format!("{pad}{}", image_line(image)));
    }
    lines
}

/// Format one scan attempt: the source path as header, the session view
/// indented beneath it.
pub fn format_scan_attempt(index: usize, source: &Path, view: &SessionView) -> Vec<String> {
    let mut lines = vec![format!("{} {}", format_index(index), source.display())];
    lines.extend(format_session_view(view, 1));
    lines
}

pub fn print_scan_attempt(index: usize, source: &Path, view: &SessionView) {
    for line in format_scan_attempt(index, source, view) {
        println!("{}", line);
    }
}

pub fn format_scan_summary(scanned: usize, recognized: usize, added: usize) -> String {
    format!(
        "Scanned {}, {} recognized, {} added to collection",
        plural(scanned, "photo", "photos"),
        recognized,
        added
    )
}

// ============================================================================
// Collection
// ============================================================================

/// Format the collection as a grid of `columns` cells per row.
///
/// Cells are left-aligned to the widest cell so columns line up.
pub fn format_collection_grid(cards: &[CardRecord], columns: usize) -> Vec<String> {
    if cards.is_empty() {
        return vec![EMPTY_COLLECTION.to_string()];
    }
    let columns = columns.max(1);
    let cells: Vec<String> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| grid_cell(i + 1, card))
        .collect();
    let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);

    let mut lines = vec![format!(
        "Collection ({})",
        plural(cards.len(), "card", "cards")
    )];
    for row in cells.chunks(columns) {
        let line = row
            .iter()
            .map(|cell| format!("{:<width$}", cell))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines
}

pub fn print_collection_grid(cards: &[CardRecord], columns: usize) {
    for line in format_collection_grid(cards, columns) {
        println!("{}", line);
    }
}

/// Clamp a 0-based page index into `0..len` (0 when empty).
pub fn clamp_page(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Format one page of the paged collection view.
///
/// `index` is 0-based and clamped, so asking past the end shows the last
/// card.
pub fn format_collection_page(cards: &[CardRecord], index: usize) -> Vec<String> {
    if cards.is_empty() {
        return vec![EMPTY_COLLECTION.to_string()];
    }
    let index = clamp_page(index, cards.len());
    let card = &cards[index];

    let mut lines = vec![format!("Card {} of {}", index + 1, cards.len())];
    lines.extend(field_lines(card, 1));
    lines.push(format!("{}{}", indent(1), image_line(card.image())));
    lines
}

/// Print every page in order, separated by blank lines.
pub fn print_collection_pages(cards: &[CardRecord]) {
    if cards.is_empty() {
        println!("{}", EMPTY_COLLECTION);
        return;
    }
    for index in 0..cards.len() {
        if index > 0 {
            println!();
        }
        for line in format_collection_page(cards, index) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Health
// ============================================================================

pub fn format_health(endpoint: &str, reachable: bool) -> Vec<String> {
    vec![
        format!("Endpoint: {}", endpoint),
        format!(
            "Status: {}",
            if reachable { "reachable" } else { "unreachable" }
        ),
    ]
}

pub fn print_health(endpoint: &str, reachable: bool) {
    for line in format_health(endpoint, reachable) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{details, record};

    fn view(state: ScanState) -> SessionView {
        SessionView {
            state,
            record: None,
            error: None,
            image: None,
            can_retry: false,
            can_confirm: false,
        }
    }

    fn card(player: &str, number: &str) -> CardRecord {
        CardRecord::new(
            details(player, "Bulls", "1997 Topps", number),
            ImageBlob::from(&b"hello world"[..]),
        )
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_is_four_spaces_per_level() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0, 3), 0);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(99, 3), 2);
        assert_eq!(clamp_page(5, 0), 0);
    }

    // =========================================================================
    // Session view
    // =========================================================================

    #[test]
    fn idle_shows_state_only() {
        assert_eq!(format_session_view(&view(ScanState::Idle), 0), vec!["State: idle"]);
    }

    #[test]
    fn uploading_shows_loading_fields() {
        let mut v = view(ScanState::Uploading);
        v.image = Some(ImageBlob::from(&b"hello world"[..]));
        let lines = format_session_view(&v, 0);
        assert_eq!(
            lines,
            vec![
                "State: uploading",
                "Player: Loading...",
                "Team: Loading...",
                "Set: Loading...",
                "Number: Loading...",
                "Image: b94d27b9934d (11 bytes)",
            ]
        );
    }

    #[test]
    fn recognized_shows_all_fields() {
        let mut v = view(ScanState::Recognized);
        v.record = Some(card("J. Doe", "23"));
        let lines = format_session_view(&v, 1);
        assert_eq!(lines[0], "    State: recognized");
        assert!(lines.contains(&"    Player: J. Doe".to_string()));
        assert!(lines.contains(&"    Team: Bulls".to_string()));
        assert!(lines.contains(&"    Set: 1997 Topps".to_string()));
        assert!(lines.contains(&"    Number: 23".to_string()));
    }

    #[test]
    fn network_failure_shows_message_without_hint() {
        let mut v = view(ScanState::Failed);
        v.error = Some(RecognitionError::network("request timed out"));
        let lines = format_session_view(&v, 0);
        assert_eq!(
            lines,
            vec!["State: failed", "Error: Network error: request timed out"]
        );
    }

    #[test]
    fn invalid_response_adds_report_hint() {
        let mut v = view(ScanState::Failed);
        v.error = Some(RecognitionError::InvalidResponseFormat);
        let lines = format_session_view(&v, 0);
        assert_eq!(lines[1], "Error: Invalid response format");
        assert!(lines[2].starts_with("Hint: "));
        assert!(lines[2].contains("report"));
    }

    #[test]
    fn scan_attempt_header_uses_path() {
        let v = view(ScanState::Idle);
        let lines = format_scan_attempt(3, Path::new("binder/card.jpg"), &v);
        assert_eq!(lines, vec!["003 binder/card.jpg", "    State: idle"]);
    }

    #[test]
    fn scan_summary_pluralizes() {
        assert_eq!(
            format_scan_summary(1, 1, 0),
            "Scanned 1 photo, 1 recognized, 0 added to collection"
        );
        assert_eq!(
            format_scan_summary(3, 2, 2),
            "Scanned 3 photos, 2 recognized, 2 added to collection"
        );
    }

    // =========================================================================
    // Collection
    // =========================================================================

    #[test]
    fn empty_collection_message_in_both_views() {
        assert_eq!(format_collection_grid(&[], 3), vec![EMPTY_COLLECTION]);
        assert_eq!(format_collection_page(&[], 0), vec![EMPTY_COLLECTION]);
    }

    #[test]
    fn grid_wraps_rows_at_column_count() {
        let cards = vec![
            card("A", "1"),
            card("B", "2"),
            card("C", "3"),
            card("D", "4"),
        ];
        let lines = format_collection_grid(&cards, 3);
        assert_eq!(
            lines,
            vec![
                "Collection (4 cards)",
                "001 A #1  002 B #2  003 C #3",
                "004 D #4",
            ]
        );
    }

    #[test]
    fn grid_aligns_cells_to_widest() {
        let cards = vec![card("Long Name", "1"), card("B", "2")];
        let lines = format_collection_grid(&cards, 2);
        assert_eq!(lines[1], "001 Long Name #1  002 B #2");
    }

    #[test]
    fn grid_with_zero_columns_uses_one() {
        let cards = vec![card("A", "1"), card("B", "2")];
        let lines = format_collection_grid(&cards, 0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Collection (2 cards)");
    }

    #[test]
    fn page_shows_position_and_fields() {
        let cards = vec![card("A", "1"), card("B", "2")];
        let lines = format_collection_page(&cards, 1);
        assert_eq!(lines[0], "Card 2 of 2");
        assert_eq!(lines[1], "    Player: B");
        assert_eq!(lines[4], "    Number: 2");
        assert_eq!(lines[5], "    Image: b94d27b9934d (11 bytes)");
    }

    #[test]
    fn page_index_past_end_is_clamped() {
        let cards = vec![record("A", b"a"), record("B", b"b")];
        let lines = format_collection_page(&cards, 10);
        assert_eq!(lines[0], "Card 2 of 2");
        assert_eq!(lines[1], "    Player: B");
    }

    #[test]
    fn single_card_collection_grid() {
        let lines = format_collection_grid(&[card("A", "1")], 3);
        assert_eq!(lines, vec!["Collection (1 card)", "001 A #1"]);
    }

    // =========================================================================
    // Health
    // =========================================================================

    #[test]
    fn health_lines() {
        assert_eq!(
            format_health("http://127.0.0.1:5000/process_scan", true),
            vec![
                "Endpoint: http://127.0.0.1:5000/process_scan",
                "Status: reachable",
            ]
        );
        assert_eq!(
            format_health("http://x", false)[1],
            "Status: unreachable"
        );
    }
}
