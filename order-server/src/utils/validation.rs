//! Input validation helpers
//!
//! Centralized text length constants and sanitization. Limits are
//! chosen for kitchen-ticket readability and reasonable UX; the store
//! itself enforces no lengths.

// ── Text length limits ──────────────────────────────────────────────

/// Free-text notes: special instructions, cancellation reasons
pub const MAX_NOTE_LEN: usize = 500;

/// Table references ("T7", "Patio 3", ...)
pub const MAX_TABLE_LEN: usize = 64;

/// Customer names on takeout/handoff orders
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;

// ── Sanitization ────────────────────────────────────────────────────

/// Sanitize free text: strip control characters, trim whitespace
///
/// Returns `None` when nothing printable remains, so "required field"
/// checks treat whitespace-only input as absent.
pub fn sanitize_text(text: &str) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
