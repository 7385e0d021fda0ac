//! Session-local view state: current page, selection and archive filters.

use tracing::debug;
use url::Url;

use crate::application::filter::PostQuery;
use crate::application::share::{self, SharedLink};
use crate::application::store::PostStore;
use crate::domain::categories::CategoryFilter;
use crate::domain::posts::Post;
use crate::domain::types::Page;

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    page: Page,
    selected_post_id: Option<String>,
    query: PostQuery,
    shared: SharedLink,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn selected_post_id(&self) -> Option<&str> {
        self.selected_post_id.as_deref()
    }

    pub fn search(&self) -> &str {
        &self.query.search
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.query.category
    }

    pub fn query(&self) -> &PostQuery {
        &self.query
    }

    pub fn shared_link(&self) -> &SharedLink {
        &self.shared
    }

    /// Switch pages. Only the detail page keeps a selection; ids are not
    /// checked against the store.
    pub fn navigate(&mut self, page: Page, post_id: Option<String>) {
        self.page = page;
        self.shared = SharedLink::Absent;
        self.selected_post_id = match page {
            Page::PostDetail => post_id,
            _ => None,
        };
        debug!(page = page.as_str(), selected = ?self.selected_post_id, "navigated");
    }

    pub fn open_post(&mut self, id: impl Into<String>) {
        self.navigate(Page::PostDetail, Some(id.into()));
    }

    /// Enter the detail page from a shared link carried by `url`.
    ///
    /// Returns `false` and leaves the state untouched when the URL has no
    /// share parameter. An undecodable payload still opens the detail page,
    /// which then renders as not found.
    pub fn open_location(&mut self, url: &Url) -> bool {
        let link = share::resolve(url);
        if !link.is_present() {
            return false;
        }

        self.page = Page::PostDetail;
        self.selected_post_id = link.post().map(|post| post.id.clone());
        self.shared = link;
        true
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    /// Archive listing for the current filters.
    pub fn visible_posts<'a>(&self, store: &'a PostStore) -> Vec<&'a Post> {
        store
            .list()
            .iter()
            .filter(|post| self.query.matches(post))
            .collect()
    }

    /// Post shown on the detail page. A shared link takes precedence over the
    /// store; `None` means the page renders its not-found state.
    pub fn selected_post<'a>(&'a self, store: &'a PostStore) -> Option<&'a Post> {
        if self.page != Page::PostDetail {
            return None;
        }
        if self.shared.is_present() {
            return self.shared.post();
        }
        self.selected_post_id
            .as_deref()
            .and_then(|id| store.find(id))
    }
}
