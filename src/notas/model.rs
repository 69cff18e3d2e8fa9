use crate::stats::{compute_statistics, TextStatistics};
use std::path::{Path, PathBuf};

const APP_TITLE: &str = "Notas";

/// The note currently open in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    pub path: Option<PathBuf>,
    pub content: String,
    pub is_dirty: bool,
}

impl Note {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(path: PathBuf, content: String) -> Self {
        Self {
            path: Some(path),
            content,
            is_dirty: false,
        }
    }

    /// Replace the content as the user typed it.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.is_dirty = true;
    }

    pub fn mark_saved(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
        self.is_dirty = false;
    }

    pub fn statistics(&self) -> TextStatistics {
        compute_statistics(&self.content)
    }

    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Window title in the form `Notas - <file name>`.
    pub fn display_title(&self) -> String {
        match self.file_name() {
            Some(name) => format!("{} - {}", APP_TITLE, name),
            None => APP_TITLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_empty_and_clean() {
        let note = Note::new();
        assert!(note.path.is_none());
        assert!(note.content.is_empty());
        assert!(!note.is_dirty);
        assert_eq!(note.display_title(), "Notas");
    }

    #[test]
    fn test_edit_marks_dirty_and_stats_follow_content() {
        let mut note = Note::new();
        note.edit("Hola mundo");
        assert!(note.is_dirty);
        assert_eq!(note.statistics().word_count, 2);

        note.edit("uno dos tres");
        assert_eq!(note.statistics().word_count, 3);
    }

    #[test]
    fn test_mark_saved_sets_path_and_clears_dirty() {
        let mut note = Note::new();
        note.edit("text");
        note.mark_saved(Path::new("/tmp/notes/today.md"));
        assert!(!note.is_dirty);
        assert_eq!(note.file_name().as_deref(), Some("today.md"));
        assert_eq!(note.display_title(), "Notas - today.md");
    }
}
