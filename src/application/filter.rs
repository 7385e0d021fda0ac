//! Archive filtering: a linear predicate scan that preserves collection order.

use crate::domain::categories::CategoryFilter;
use crate::domain::posts::Post;

/// Search text and category selection applied to the archive listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: String,
    pub category: CategoryFilter,
}

impl PostQuery {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        matches_search(post, &self.search.to_lowercase()) && self.category.matches(&post.category)
    }
}

/// Posts whose title or content contains `search` (case-insensitively) and
/// whose category passes `category`, in their original order.
pub fn visible_posts<'a>(
    posts: &'a [Post],
    search: &str,
    category: &CategoryFilter,
) -> Vec<&'a Post> {
    let needle = search.to_lowercase();
    posts
        .iter()
        .filter(|post| matches_search(post, &needle) && category.matches(&post.category))
        .collect()
}

fn matches_search(post: &Post, needle: &str) -> bool {
    needle.is_empty()
        || post.title.to_lowercase().contains(needle)
        || post.content.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::categories::Category;

    fn post(id: &str, title: &str, content: &str, category: Category) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            content: content.to_string(),
            category,
            author: "a".to_string(),
            date: String::new(),
            image_url: String::new(),
            read_time: String::new(),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post("3", "Hi", "c", Category::Design),
            post("2", "Phở Hà Nội", "Nước dùng trong", Category::Food),
            post("1", "Chào mừng", "HI THERE from the seed", Category::Design),
        ]
    }

    fn ids(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|post| post.id.clone()).collect()
    }

    #[test]
    fn empty_query_and_all_returns_everything_in_order() {
        let posts = sample();
        assert_eq!(ids(&visible_posts(&posts, "", &CategoryFilter::All)), ["3", "2", "1"]);
    }

    #[test]
    fn search_matches_title_or_content_case_insensitively() {
        let posts = sample();
        assert_eq!(ids(&visible_posts(&posts, "hi", &CategoryFilter::All)), ["3", "1"]);
        assert_eq!(ids(&visible_posts(&posts, "NƯỚC", &CategoryFilter::All)), ["2"]);
        assert_eq!(ids(&visible_posts(&posts, "hà nội", &CategoryFilter::All)), ["2"]);
    }

    #[test]
    fn category_restricts_results() {
        let posts = sample();
        let food = CategoryFilter::Only(Category::Food);
        assert_eq!(ids(&visible_posts(&posts, "", &food)), ["2"]);
        assert_eq!(ids(&visible_posts(&posts, "hi", &food)), Vec::<String>::new());
    }

    #[test]
    fn category_without_posts_yields_empty_sequence() {
        let posts = sample();
        let travel = CategoryFilter::Only(Category::Travel);
        assert!(visible_posts(&posts, "", &travel).is_empty());
    }

    #[test]
    fn query_struct_agrees_with_free_function() {
        let posts = sample();
        let query = PostQuery::new("hI", CategoryFilter::Only(Category::Design));
        let by_struct: Vec<&Post> = posts.iter().filter(|post| query.matches(post)).collect();
        assert_eq!(by_struct, visible_posts(&posts, &query.search, &query.category));
    }

    #[test]
    fn whitespace_in_the_query_is_matched_literally() {
        let posts = vec![
            post("2", "Hi", "c", Category::Design),
            post("1", "Hello world", "c", Category::Design),
        ];
        assert!(visible_posts(&posts, "  ", &CategoryFilter::All).is_empty());
        assert!(visible_posts(&posts, "hi ", &CategoryFilter::All).is_empty());
        assert_eq!(ids(&visible_posts(&posts, "o w", &CategoryFilter::All)), ["1"]);

        let query = PostQuery::new("hi ", CategoryFilter::All);
        assert!(!posts.iter().any(|post| query.matches(post)));
    }

    fn arb_category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::known().to_vec())
    }

    fn arb_post() -> impl Strategy<Value = Post> {
        ("[0-9]{1,4}", "[a-zA-Zà-ỹ ]{0,12}", "[a-zA-Zà-ỹ ]{0,24}", arb_category())
            .prop_map(|(id, title, content, category)| post(&id, &title, &content, category))
    }

    fn arb_filter() -> impl Strategy<Value = CategoryFilter> {
        prop_oneof![
            Just(CategoryFilter::All),
            arb_category().prop_map(CategoryFilter::Only),
        ]
    }

    proptest! {
        #[test]
        fn visible_posts_is_an_order_preserving_subset(
            posts in prop::collection::vec(arb_post(), 0..16),
            search in "[a-zA-Z ]{0,3}",
            filter in arb_filter(),
        ) {
            let visible = visible_posts(&posts, &search, &filter);
            let mut cursor = 0;
            for shown in &visible {
                let offset = posts[cursor..]
                    .iter()
                    .position(|candidate| std::ptr::eq(candidate, *shown));
                prop_assert!(offset.is_some());
                cursor += offset.unwrap_or(0) + 1;
            }
        }
    }
}
