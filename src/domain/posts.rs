mod data;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

use super::categories::Category;

pub use data::{WELCOME_POST_ID, WELCOME_POST_TITLE, welcome_post};

/// Short Vietnamese calendar form, e.g. `19 thg 10, 2026`.
pub const DISPLAY_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:zero] thg [month padding:none], [year]");

pub const READ_TIME_SUFFIX: &str = "phút đọc";

pub const DEFAULT_CHARS_PER_MINUTE: u32 = 800;

/// A single blog entry as persisted in the `posts` slot and carried by share links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Category,
    pub author: String,
    pub date: String,
    pub image_url: String,
    pub read_time: String,
}

impl Post {
    /// Non-blank paragraphs of the body, in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
    }

    /// Avatar letter shown next to the author name.
    pub fn author_initial(&self) -> Option<char> {
        self.author.chars().next()
    }
}

/// Post fields supplied by the author; the store assigns the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: Category,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

pub fn format_display_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .expect("valid calendar date")
}

/// Reading time in whole minutes, rounded up and never below one.
pub fn read_time_minutes(content: &str, chars_per_minute: NonZeroU32) -> u32 {
    let chars = content.chars().count() as u64;
    let minutes = chars.div_ceil(u64::from(chars_per_minute.get())).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub fn format_read_time(minutes: u32) -> String {
    format!("{minutes} {READ_TIME_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn per_minute(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).expect("non-zero")
    }

    #[test]
    fn display_date_uses_short_vietnamese_form() {
        assert_eq!(format_display_date(date!(2026 - 10 - 19)), "19 thg 10, 2026");
        assert_eq!(format_display_date(date!(2025 - 03 - 05)), "05 thg 3, 2025");
    }

    #[test]
    fn read_time_rounds_up() {
        let cpm = per_minute(DEFAULT_CHARS_PER_MINUTE);
        assert_eq!(read_time_minutes("c", cpm), 1);
        assert_eq!(read_time_minutes(&"a".repeat(800), cpm), 1);
        assert_eq!(read_time_minutes(&"a".repeat(801), cpm), 2);
        assert_eq!(read_time_minutes("", cpm), 1);
    }

    #[test]
    fn read_time_counts_characters_not_bytes() {
        let content = "đ".repeat(10);
        assert_eq!(read_time_minutes(&content, per_minute(10)), 1);
        assert_eq!(format_read_time(3), "3 phút đọc");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let post = welcome_post("19 thg 10, 2026".to_string());
        let value = serde_json::to_value(&post).expect("serialize");
        assert_eq!(value["imageUrl"], post.image_url);
        assert_eq!(value["readTime"], "1 phút đọc");
        assert_eq!(value["category"], "Design");
    }

    #[test]
    fn loads_posts_written_with_localized_categories() {
        let raw = r#"{"id":"1","title":"t","excerpt":"e","content":"c","category":"Du lịch",
            "author":"a","date":"d","imageUrl":"u","readTime":"1 phút đọc"}"#;
        let post: Post = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(post.category, Category::Travel);
    }

    #[test]
    fn paragraphs_skip_blank_lines() {
        let mut post = welcome_post(String::new());
        post.content = "first\r\n\nsecond\n  \nthird".to_string();
        let paragraphs: Vec<&str> = post.paragraphs().collect();
        assert_eq!(paragraphs, ["first", "second", "third"]);
        assert_eq!(post.author_initial(), Some('M'));
    }
}
