use std::error::Error as StdError;

use thiserror::Error;

use crate::application::form::{FormErrors, ImageError};
use crate::application::repos::StorageError;
use crate::domain::error::DomainError;
use crate::infra::error::InfraError;

/// Message chain of an error, outermost first.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Form(#[from] FormErrors),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short, user-facing summary printed by the binary.
    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => "Không tìm thấy bài viết",
            AppError::Domain(_) | AppError::Form(_) => "Dữ liệu nhập chưa hợp lệ",
            AppError::Image(_) => "Không thể dùng hình ảnh này",
            AppError::Storage(_) => "Không thể lưu dữ liệu",
            AppError::Infra(InfraError::Configuration { .. }) => "Cấu hình không hợp lệ",
            AppError::Infra(InfraError::Telemetry(_)) => "Không thể khởi động ghi log",
            AppError::Infra(InfraError::Io(_)) => "Lỗi đọc/ghi",
            AppError::Unexpected(_) => "Đã xảy ra lỗi không mong muốn",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_walks_the_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let error = AppError::from(StorageError::from(io));
        let report = error.report();

        assert_eq!(report.source, "application::error::AppError");
        assert_eq!(report.messages[0], "storage io error: read-only volume");
        assert_eq!(error.presentation_message(), "Không thể lưu dữ liệu");
    }

    #[test]
    fn unknown_category_is_a_validation_problem() {
        let error = AppError::from(DomainError::unknown_category("Sports"));
        assert_eq!(error.presentation_message(), "Dữ liệu nhập chưa hợp lệ");
        assert_eq!(error.to_string(), "unknown category `Sports`");
    }

    #[test]
    fn missing_post_has_its_own_summary() {
        let error = AppError::from(DomainError::not_found("post"));
        assert_eq!(error.presentation_message(), "Không tìm thấy bài viết");
        assert_eq!(error.to_string(), "domain entity `post` not found");
    }
}
