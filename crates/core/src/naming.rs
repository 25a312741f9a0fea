//! Filename convention for saved images and session logs.
//!
//! Images are named after the prompt that produced them so the output
//! directory stays browsable by hand.

use crate::types::Timestamp;

/// Longest prompt-derived prefix kept in a filename, in characters.
pub const MAX_PROMPT_CHARS: usize = 50;

/// `strftime` pattern shared by image and session log filenames.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reduce a prompt to a filesystem-safe filename prefix.
///
/// Keeps alphanumerics, spaces, `-` and `_`; drops trailing whitespace;
/// turns spaces into underscores; keeps at most [`MAX_PROMPT_CHARS`] chars.
///
/// # Examples
///
/// ```
/// use grokgen_core::naming::sanitize_prompt;
///
/// assert_eq!(sanitize_prompt("A cute robot cat!"), "A_cute_robot_cat");
/// assert_eq!(sanitize_prompt("../etc/passwd"), "etcpasswd");
/// ```
pub fn sanitize_prompt(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    kept.trim_end()
        .replace(' ', "_")
        .chars()
        .take(MAX_PROMPT_CHARS)
        .collect()
}

/// Filename for the `index`-th image (1-based) of a generation.
///
/// Convention: `{sanitized_prompt}_{YYYYmmdd_HHMMSS}_{index:02}.{extension}`
pub fn image_filename(prompt: &str, timestamp: &Timestamp, index: u32, extension: &str) -> String {
    format!(
        "{}_{}_{index:02}.{extension}",
        sanitize_prompt(prompt),
        timestamp.format(TIMESTAMP_FORMAT),
    )
}

/// Default filename for a saved session log.
pub fn session_log_filename(timestamp: &Timestamp) -> String {
    format!("session_log_{}.json", timestamp.format(TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> Timestamp {
        chrono::Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap()
    }

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(sanitize_prompt("Hello, world!"), "Hello_world");
    }

    #[test]
    fn dashes_and_underscores_survive() {
        assert_eq!(sanitize_prompt("sci-fi city_at night"), "sci-fi_city_at_night");
    }

    #[test]
    fn trailing_spaces_are_trimmed_before_replacement() {
        assert_eq!(sanitize_prompt("sunset   "), "sunset");
        // Leading spaces are kept (only the end is trimmed).
        assert_eq!(sanitize_prompt("  sunset"), "__sunset");
    }

    #[test]
    fn long_prompts_are_truncated_by_chars() {
        let prompt = "é".repeat(80);
        let sanitized = sanitize_prompt(&prompt);
        assert_eq!(sanitized.chars().count(), MAX_PROMPT_CHARS);
    }

    #[test]
    fn prompt_of_only_symbols_is_empty() {
        assert_eq!(sanitize_prompt("!!!???"), "");
    }

    #[test]
    fn image_filename_pads_index() {
        let name = image_filename("A dragon", &fixed_time(), 3, "jpg");
        assert_eq!(name, "A_dragon_20240309_140507_03.jpg");
    }

    #[test]
    fn two_digit_index_is_not_padded_further() {
        let name = image_filename("x", &fixed_time(), 10, "png");
        assert_eq!(name, "x_20240309_140507_10.png");
    }

    #[test]
    fn session_log_name() {
        assert_eq!(
            session_log_filename(&fixed_time()),
            "session_log_20240309_140507.json"
        );
    }
}
