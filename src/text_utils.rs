use chrono::{DateTime, Datelike, Utc};

pub const WORDS_PER_MINUTE: usize = 200;

pub fn format_date(date_time: &DateTime<Utc>) -> String {
    date_time.format("%Y-%m-%d").to_string()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn compute_read_time(content: &str) -> u32 {
    let minutes = word_count(content).div_ceil(WORDS_PER_MINUTE);
    minutes.max(1) as u32
}

pub fn read_time_label(minutes: u32) -> String {
    format!("{} min read", minutes)
}

/// `Hello World` written on 2024-05-01 becomes `hello-world-2024-05-01`.
/// Only spaces are replaced; other characters are kept as they are.
pub fn slugify(title: &str, date_time: &DateTime<Utc>) -> String {
    let title = title.to_lowercase().replace(' ', "-");
    format!("{}-{}", title, format_date(date_time))
}

/// Splits a comma separated admin input, dropping empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::test_data::words;

    use super::*;

    #[test]
    fn test_read_time() {
        assert_eq!(compute_read_time(""), 1);
        assert_eq!(compute_read_time("   \n\t "), 1);
        assert_eq!(compute_read_time(&words(1)), 1);
        assert_eq!(compute_read_time(&words(200)), 1);
        assert_eq!(compute_read_time(&words(201)), 2);
        assert_eq!(compute_read_time(&words(400)), 2);
        assert_eq!(compute_read_time(&words(401)), 3);
    }

    #[test]
    fn test_read_time_counts_any_whitespace() {
        let content = "<p>one two</p>\n<p>three\tfour</p>";
        assert_eq!(word_count(content), 4);
        assert_eq!(compute_read_time(content), compute_read_time(content));
    }

    #[test]
    fn test_read_time_label() {
        assert_eq!(read_time_label(3), "3 min read");
    }

    #[test]
    fn test_slugify() {
        let date = Utc.with_ymd_and_hms(2024, 12, 23, 18, 0, 0).unwrap();
        assert_eq!(slugify("Test Blog Post", &date), "test-blog-post-2024-12-23");
        assert_eq!(slugify("Rust & C++", &date), "rust-&-c++-2024-12-23");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Rust, HTML ,CSS"), ["Rust", "HTML", "CSS"]);
        assert_eq!(split_list(" , Rust,,"), ["Rust"]);
        assert!(split_list("").is_empty());
    }
}
