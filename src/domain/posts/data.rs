use super::{Post, format_read_time};
use crate::domain::categories::Category;

pub const WELCOME_POST_ID: &str = "welcome-myblog";
pub const WELCOME_POST_TITLE: &str = "Chào mừng bạn đến với MyBlog!";

const WELCOME_POST_EXCERPT: &str = "Hãy bắt đầu hành trình sáng tạo của bạn ngay hôm nay.";
const WELCOME_POST_CONTENT: &str = "Chào bạn!\n\n\
Đây là MyBlog - nơi bạn có thể lưu trữ những suy nghĩ và kiến thức của mình một cách tối giản nhất.\n\n\
Lưu ý quan trọng: bài viết được lưu trong một tệp dữ liệu cục bộ. Mọi bài bạn đăng chỉ nằm trên máy này; \
nếu xóa tệp hoặc đổi sang máy khác, các bài viết sẽ không xuất hiện.\n\n\
Hãy thử lệnh \"create\" để đăng câu chuyện đầu tiên, và lệnh \"share\" để gửi bài cho bạn bè qua một đường link!";
const WELCOME_POST_AUTHOR: &str = "MyBlog Team";
const WELCOME_POST_IMAGE: &str =
    "https://images.unsplash.com/photo-1499750310107-5fef28a66643?q=80&w=1000&auto=format&fit=crop";

/// The single built-in post used when no collection has been persisted yet.
pub fn welcome_post(date: String) -> Post {
    Post {
        id: WELCOME_POST_ID.to_string(),
        title: WELCOME_POST_TITLE.to_string(),
        excerpt: WELCOME_POST_EXCERPT.to_string(),
        content: WELCOME_POST_CONTENT.to_string(),
        category: Category::Design,
        author: WELCOME_POST_AUTHOR.to_string(),
        date,
        image_url: WELCOME_POST_IMAGE.to_string(),
        read_time: format_read_time(1),
    }
}
