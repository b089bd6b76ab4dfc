//! Shared UI icons and emojis.
//!
//! Common emoji constants used across the CLI output for consistent visual
//! styling, with plain-text fallbacks for dumb terminals.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");

// Interview indicators
pub static QUESTION: Emoji<'_, '_> = Emoji("💬 ", "?");
pub static REQUIREMENT: Emoji<'_, '_> = Emoji("📌 ", "+");
pub static GAP: Emoji<'_, '_> = Emoji("🧭 ", "[GAP]");
