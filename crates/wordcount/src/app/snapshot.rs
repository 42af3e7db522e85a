//! Capturing [`SelectionSnapshot`]s from a platform.

use tracing::warn;

use crate::app::counting;
use crate::app::platform::SelectionPlatform;
use crate::domain::model::SelectionSnapshot;

impl SelectionSnapshot {
    /// Read the platform selection once and capture it.
    ///
    /// Returns `None` unless the selection has exactly one range and non-empty
    /// text. A failing platform read is treated the same as no selection.
    pub fn capture<P>(platform: &P) -> Option<Self>
    where
        P: SelectionPlatform + ?Sized,
    {
        let selection = match platform.selection() {
            Ok(selection) => selection?,
            Err(err) => {
                warn!(error = %err, "selection unavailable, treating as unselected");
                return None;
            }
        };

        if selection.range_count != 1 || selection.text.is_empty() {
            return None;
        }

        let word_count = counting::word_count_in_selection(&selection);
        let character_count = counting::character_count_in_selection(&selection, platform);
        Some(Self::new(selection.text, word_count, character_count))
    }

    /// Count a plain string as though it were selected within a single node.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = counting::word_count_in_string(text.as_str());
        let character_count = counting::character_count_in_string(text.as_str());
        Self::new(text, word_count, character_count)
    }
}
