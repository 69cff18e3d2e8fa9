//! # Quick Capture
//!
//! Instant note creation from a template: pick a template (explicitly or from
//! the current context), get a [`Draft`] with the skeleton and a default
//! title, let the user edit it, then [`QuickCapture::commit`] it into the
//! notes directory under a filename derived from the title.
//!
//! A user-edited title is never overwritten by a template change.

use crate::context::{ContextAdvisor, ContextType};
use crate::error::Result;
use crate::store::{FileStore, StorageBackend};
use crate::templates::{default_title, TemplateCatalog};
use log::debug;
use std::path::PathBuf;

pub const UNTITLED_NOTE: &str = "Untitled Note";
pub const DEFAULT_EXTENSION: &str = ".md";

const INVALID_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// An unsaved quick-capture note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub template: Option<String>,
    pub title: String,
    pub content: String,
}

pub struct QuickCapture<'a> {
    catalog: &'a TemplateCatalog,
    advisor: &'a ContextAdvisor,
    extension: String,
}

impl<'a> QuickCapture<'a> {
    pub fn new(catalog: &'a TemplateCatalog, advisor: &'a ContextAdvisor) -> Self {
        Self {
            catalog,
            advisor,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn with_extension(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.extension = ext.to_string();
        } else {
            self.extension = format!(".{}", ext);
        }
        self
    }

    /// An unknown or absent template gives an empty, untitled draft.
    pub fn start_capture(&self, template: Option<&str>) -> Draft {
        match template.and_then(|name| self.catalog.get(name).ok()) {
            Some(t) => Draft {
                template: Some(t.name.to_string()),
                title: default_title(t.name),
                content: t.skeleton.to_string(),
            },
            None => Draft::default(),
        }
    }

    pub fn change_template(&self, mut draft: Draft, name: &str) -> Result<Draft> {
        let template = self.catalog.get(name)?;
        draft.content = template.skeleton.to_string();
        draft.template = Some(template.name.to_string());
        if draft.title.trim().is_empty() {
            draft.title = default_title(template.name);
        }
        Ok(draft)
    }

    pub fn capture_with_context(
        &self,
        context_type: Option<ContextType>,
        context_value: Option<&str>,
    ) -> Draft {
        let template = match (context_type, context_value) {
            (Some(ct), Some(value)) => self.advisor.suggest_template_for_context(ct, value),
            _ => None,
        };
        debug!(
            "event=capture_with_context module=capture template={}",
            template.unwrap_or("none")
        );
        self.start_capture(template)
    }

    /// The path a draft would be committed to.
    pub fn target_path<B: StorageBackend>(&self, draft: &Draft, store: &FileStore<B>) -> PathBuf {
        store
            .notes_directory()
            .join(self.filename_for(&draft.title))
    }

    /// Saves the draft into the notes directory and returns the written path.
    pub fn commit<B: StorageBackend>(&self, draft: &Draft, store: &FileStore<B>) -> Result<PathBuf> {
        let path = self.target_path(draft, store);
        store.save(&path, &draft.content)?;
        Ok(path)
    }

    fn filename_for(&self, title: &str) -> String {
        let title = title.trim();
        let title = if title.is_empty() { UNTITLED_NOTE } else { title };
        format!("{}{}", sanitize_filename(title), self.extension)
    }
}

/// Replaces each of `< > : " / \ | ? *` with `_` and trims surrounding whitespace.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
