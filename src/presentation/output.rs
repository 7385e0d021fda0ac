use std::fmt::Display;
use std::io::Write;

use serde::Serialize;

use crate::application::error::AppError;
use crate::config::OutputFormat;

/// Render `value` as pretty JSON or as its text form.
pub fn render<T: Serialize + Display>(format: OutputFormat, value: &T) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(value.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| AppError::unexpected(format!("failed to render output: {err}"))),
    }
}

pub fn print<T: Serialize + Display>(format: OutputFormat, value: &T) -> Result<(), AppError> {
    let out = render(format, value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", out.trim_end()).map_err(|err| AppError::Infra(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Theme;
    use crate::presentation::views::ThemeView;

    #[test]
    fn text_and_json_forms() {
        let view = ThemeView::from(Theme::Dark);
        assert_eq!(render(OutputFormat::Text, &view).expect("text"), "dark");

        let json = render(OutputFormat::Json, &view).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["dark"], true);
    }
}
