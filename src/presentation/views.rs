//! Terminal views: serializable view models with a plain-text rendering.

use std::fmt;

use serde::Serialize;

use crate::application::view::ViewState;
use crate::domain::categories::{Category, CategoryFilter};
use crate::domain::posts::Post;
use crate::domain::types::Theme;

pub const HOME_HEADING: &str = "Bài viết mới nhất";
pub const ARCHIVE_HEADING: &str = "Tất cả bài viết";
pub const EMPTY_HOME: &str = "Chưa có bài viết nào.";
pub const EMPTY_ARCHIVE: &str = "Không tìm thấy bài viết nào phù hợp.";
pub const NOT_FOUND_TITLE: &str = "Không tìm thấy bài viết";
pub const NOT_FOUND_HINT: &str = "Bài viết có thể đã bị xóa hoặc liên kết không đúng.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCardView {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub category_label: String,
    pub author: String,
    pub author_initial: Option<char>,
    pub date: String,
    pub read_time: String,
    pub image_url: String,
}

impl From<&Post> for PostCardView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.id().to_string(),
            category_label: post.category.label().to_string(),
            author: post.author.clone(),
            author_initial: post.author_initial(),
            date: post.date.clone(),
            read_time: post.read_time.clone(),
            image_url: post.image_url.clone(),
        }
    }
}

impl fmt::Display for PostCardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.title)?;
        writeln!(
            f,
            "    {} · {} · {} · {}",
            self.category_label, self.date, self.read_time, self.author
        )?;
        write!(f, "    {}", self.excerpt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListView {
    pub heading: String,
    pub search: String,
    pub category: String,
    pub total: usize,
    pub posts: Vec<PostCardView>,
    #[serde(skip)]
    empty_message: &'static str,
}

impl PostListView {
    /// Featured posts on the home page, newest first.
    pub fn home(posts: &[Post]) -> Self {
        Self {
            heading: HOME_HEADING.to_string(),
            search: String::new(),
            category: CategoryFilter::All.label().to_string(),
            total: posts.len(),
            posts: posts.iter().map(PostCardView::from).collect(),
            empty_message: EMPTY_HOME,
        }
    }

    /// Archive listing for the filters held by `view`.
    pub fn archive(view: &ViewState, posts: &[&Post]) -> Self {
        Self {
            heading: ARCHIVE_HEADING.to_string(),
            search: view.search().to_string(),
            category: view.category().label().to_string(),
            total: posts.len(),
            posts: posts.iter().map(|post| PostCardView::from(*post)).collect(),
            empty_message: EMPTY_ARCHIVE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl fmt::Display for PostListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading)?;
        if !self.search.trim().is_empty() {
            write!(f, " · \"{}\"", self.search.trim())?;
        }
        writeln!(f, " · {}", self.category)?;

        if self.is_empty() {
            return write!(f, "\n{}", self.empty_message);
        }
        for card in &self.posts {
            write!(f, "\n{card}\n")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailView {
    #[serde(flatten)]
    pub card: PostCardView,
    pub paragraphs: Vec<String>,
    /// Set when the post was read from a share link rather than the store.
    pub shared: bool,
}

impl PostDetailView {
    pub fn new(post: &Post, shared: bool) -> Self {
        Self {
            card: PostCardView::from(post),
            paragraphs: post.paragraphs().map(str::to_string).collect(),
            shared,
        }
    }
}

impl fmt::Display for PostDetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = &self.card;
        writeln!(f, "{}", card.title)?;
        writeln!(f, "{}", "=".repeat(card.title.chars().count().max(1)))?;
        let initial = card.author_initial.map(String::from).unwrap_or_default();
        writeln!(
            f,
            "({initial}) {} · {} · {} · {}",
            card.author, card.date, card.read_time, card.category_label
        )?;
        writeln!(f, "Ảnh bìa: {}", card.image_url)?;
        if self.shared {
            writeln!(f, "Được chia sẻ qua liên kết")?;
        }
        write!(f, "\n{}\n", card.excerpt)?;
        for paragraph in &self.paragraphs {
            write!(f, "\n{paragraph}\n")?;
        }
        Ok(())
    }
}

/// Detail page state when no post could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundView {
    pub requested_id: Option<String>,
    pub title: &'static str,
    pub hint: &'static str,
}

impl NotFoundView {
    pub fn new(requested_id: Option<&str>) -> Self {
        Self {
            requested_id: requested_id.map(str::to_string),
            title: NOT_FOUND_TITLE,
            hint: NOT_FOUND_HINT,
        }
    }
}

impl fmt::Display for NotFoundView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        write!(f, "{}", self.hint)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinkView {
    pub id: String,
    pub url: String,
}

impl fmt::Display for ShareLinkView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeView {
    pub theme: &'static str,
    pub dark: bool,
}

impl From<Theme> for ThemeView {
    fn from(theme: Theme) -> Self {
        Self {
            theme: theme.as_str(),
            dark: theme.is_dark(),
        }
    }
}

impl fmt::Display for ThemeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.theme)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOptionView {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListView {
    pub categories: Vec<CategoryOptionView>,
}

impl CategoryListView {
    pub fn known() -> Self {
        Self {
            categories: Category::known()
                .iter()
                .map(|category| CategoryOptionView {
                    id: category.id().to_string(),
                    label: category.label().to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CategoryListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .categories
            .iter()
            .map(|option| option.id.len())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = self
            .categories
            .iter()
            .map(|option| format!("{:width$}  {}", option.id, option.label))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::welcome_post;

    fn post(id: &str, title: &str, category: Category) -> Post {
        let mut post = welcome_post("19 thg 10, 2026".to_string());
        post.id = id.to_string();
        post.title = title.to_string();
        post.category = category;
        post
    }

    #[test]
    fn card_shows_label_not_identifier() {
        let card = PostCardView::from(&post("7", "Phở", Category::Food));
        let text = card.to_string();
        assert!(text.starts_with("[7] Phở\n"));
        assert!(text.contains("Ẩm thực · 19 thg 10, 2026"));
        assert_eq!(card.category, "food");
    }

    #[test]
    fn empty_archive_renders_the_empty_state() {
        let mut view = ViewState::new();
        view.set_search("nothing");
        let listing = PostListView::archive(&view, &[]);
        let text = listing.to_string();
        assert!(text.starts_with("Tất cả bài viết · \"nothing\" · Tất cả\n"));
        assert!(text.ends_with(EMPTY_ARCHIVE));
    }

    #[test]
    fn home_listing_keeps_order() {
        let posts = vec![
            post("3", "c", Category::Design),
            post("2", "b", Category::Design),
        ];
        let listing = PostListView::home(&posts);
        let ids: Vec<&str> = listing.posts.iter().map(|card| card.id.as_str()).collect();
        assert_eq!(ids, ["3", "2"]);
        assert_eq!(listing.total, 2);
        assert!(PostListView::home(&[]).to_string().ends_with(EMPTY_HOME));
    }

    #[test]
    fn detail_lists_paragraphs_and_share_origin() {
        let mut shared = post("9", "Chuyến đi", Category::Travel);
        shared.content = "Đoạn một\n\nĐoạn hai\n".to_string();
        let detail = PostDetailView::new(&shared, true);

        assert_eq!(detail.paragraphs, ["Đoạn một", "Đoạn hai"]);
        let text = detail.to_string();
        assert!(text.starts_with("Chuyến đi\n=========\n"));
        assert!(text.contains("Được chia sẻ qua liên kết"));
        assert!(text.ends_with("\nĐoạn hai\n"));
    }

    #[test]
    fn detail_json_is_flat() {
        let detail = PostDetailView::new(&post("1", "t", Category::Design), false);
        let value = serde_json::to_value(&detail).expect("json");
        assert_eq!(value["id"], "1");
        assert_eq!(value["categoryLabel"], "Thiết kế");
        assert_eq!(value["shared"], false);
    }

    #[test]
    fn category_listing_aligns_labels() {
        let text = CategoryListView::known().to_string();
        let first = text.lines().next().expect("line");
        assert_eq!(first, "technology  Công nghệ");
        assert_eq!(text.lines().count(), 5);
    }
}
