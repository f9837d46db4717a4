//! Placeholder substitution for expansion templates.
//!
//! Recognised macros are `{{date}}`, `{{time}}` and `{{clipboard}}`, each
//! replaced at every occurrence and resolved in that order. Only the
//! clipboard read can suspend or fail; a failed read logs a warning and
//! substitutes empty text. Any other `{{...}}` token is left as written.

use crate::config::MacroFormats;
use crate::error::{AutofillError, Result};
use arboard::Clipboard;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use tracing::warn;

pub const DATE_MACRO: &str = "{{date}}";
pub const TIME_MACRO: &str = "{{time}}";
pub const CLIPBOARD_MACRO: &str = "{{clipboard}}";

/// Source of the text substituted for `{{clipboard}}`.
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    async fn read_text(&self) -> Result<String>;
}

/// The system clipboard, read on a blocking worker thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn read_text(&self) -> Result<String> {
        tokio::task::spawn_blocking(|| {
            let mut clipboard =
                Clipboard::new().map_err(|e| AutofillError::Clipboard(e.to_string()))?;
            clipboard
                .get_text()
                .map_err(|e| AutofillError::Clipboard(e.to_string()))
        })
        .await
        .map_err(|e| AutofillError::Clipboard(e.to_string()))?
    }
}

/// A clipboard that always refuses to be read.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

#[async_trait]
impl ClipboardSource for NoClipboard {
    async fn read_text(&self) -> Result<String> {
        Err(AutofillError::Clipboard("clipboard access disabled".to_string()))
    }
}

#[async_trait]
impl<C: ClipboardSource + ?Sized> ClipboardSource for Box<C> {
    async fn read_text(&self) -> Result<String> {
        (**self).read_text().await
    }
}

pub struct MacroResolver<C> {
    clipboard: C,
    formats: MacroFormats,
}

impl<C: ClipboardSource> MacroResolver<C> {
    pub fn new(clipboard: C, formats: MacroFormats) -> Self {
        Self { clipboard, formats }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub async fn resolve(&self, template: &str) -> String {
        self.resolve_at(template, Local::now()).await
    }

    /// Resolve `template` with `now` as the current time. Never fails.
    pub async fn resolve_at(&self, template: &str, now: DateTime<Local>) -> String {
        let mut resolved = template.to_string();

        if resolved.contains(DATE_MACRO) {
            let date = now.format(self.formats.date()).to_string();
            resolved = resolved.replace(DATE_MACRO, &date);
        }
        if resolved.contains(TIME_MACRO) {
            let time = now.format(self.formats.time()).to_string();
            resolved = resolved.replace(TIME_MACRO, &time);
        }
        if resolved.contains(CLIPBOARD_MACRO) {
            let text = match self.clipboard.read_text().await {
                Ok(text) => text,
                Err(err) => {
                    warn!(error = %err, "clipboard read failed, substituting empty text");
                    String::new()
                }
            };
            resolved = resolved.replace(CLIPBOARD_MACRO, &text);
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClipboard(&'static str);

    #[async_trait]
    impl ClipboardSource for FixedClipboard {
        async fn read_text(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct CountingClipboard(AtomicUsize);

    #[async_trait]
    impl ClipboardSource for CountingClipboard {
        async fn read_text(&self) -> Result<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("clip".to_string())
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap()
    }

    fn resolver<C: ClipboardSource>(clipboard: C) -> MacroResolver<C> {
        MacroResolver::new(clipboard, MacroFormats::default())
    }

    #[tokio::test]
    async fn template_without_macros_is_unchanged() {
        let r = resolver(FixedClipboard("ignored"));
        assert_eq!(r.resolve("plain text").await, "plain text");
    }

    #[tokio::test]
    async fn date_and_time_use_configured_formats() {
        let r = resolver(NoClipboard);
        let out = r.resolve_at("{{date}} at {{time}}", fixed_now()).await;
        assert_eq!(out, "3/7/2024 at 09:05 AM");
    }

    #[tokio::test]
    async fn repeated_date_is_replaced_identically() {
        let r = resolver(NoClipboard);
        let out = r.resolve_at("{{date}}|{{date}}", fixed_now()).await;
        assert_eq!(out, "3/7/2024|3/7/2024");
    }

    #[tokio::test]
    async fn clipboard_text_is_substituted_everywhere() {
        let r = resolver(FixedClipboard("pasted"));
        assert_eq!(
            r.resolve("{{clipboard}} and {{clipboard}}").await,
            "pasted and pasted"
        );
    }

    #[tokio::test]
    async fn clipboard_failure_substitutes_empty_text() {
        let r = resolver(NoClipboard);
        assert_eq!(r.resolve("before[{{clipboard}}]after").await, "before[]after");
    }

    #[tokio::test]
    async fn clipboard_is_only_read_when_referenced() {
        let r = resolver(CountingClipboard::default());
        r.resolve("no clipboard here {{date}}").await;
        assert_eq!(r.clipboard.0.load(Ordering::SeqCst), 0);

        r.resolve("{{clipboard}}{{clipboard}}").await;
        assert_eq!(r.clipboard.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_placeholders_pass_through() {
        let r = resolver(NoClipboard);
        assert_eq!(r.resolve("{{name}} {{ date }}").await, "{{name}} {{ date }}");
    }

    #[tokio::test]
    async fn clipboard_content_is_not_expanded_again() {
        let r = resolver(FixedClipboard("{{date}}"));
        assert_eq!(r.resolve_at("{{clipboard}}", fixed_now()).await, "{{date}}");
    }

    #[tokio::test]
    async fn custom_formats_apply() {
        let formats = MacroFormats::new("%Y-%m-%d", "%H:%M").unwrap();
        let r = MacroResolver::new(NoClipboard, formats);
        assert_eq!(
            r.resolve_at("{{date}} {{time}}", fixed_now()).await,
            "2024-03-07 09:05"
        );
    }
}
