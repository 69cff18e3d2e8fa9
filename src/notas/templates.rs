//! # Template Catalog
//!
//! The fixed set of markdown skeletons used by quick capture. The catalog is
//! compiled in and immutable; display order is the order of [`TEMPLATES`].

use crate::error::{NotasError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub skeleton: &'static str,
}

pub const TEMPLATES: &[Template] = &[
    Template {
        name: "meeting",
        skeleton: "# Meeting Notes\n\n**Attendees:**\n- \n\n**Agenda:**\n- \n\n**Action Items:**\n- \n\n**Decisions:**\n- \n\n**Next Steps:**\n- \n\n",
    },
    Template {
        name: "project",
        skeleton: "# Project Plan\n\n**Objective:**\n\n**Scope:**\n\n**Timeline:**\n\n**Resources:**\n- \n\n**Risks:**\n- \n\n**Milestones:**\n- \n\n",
    },
    Template {
        name: "research",
        skeleton: "# Research Notes\n\n**Topic:**\n\n**Sources:**\n- \n\n**Key Findings:**\n- \n\n**Questions:**\n- \n\n**Conclusions:**\n\n",
    },
    Template {
        name: "code_review",
        skeleton: "# Code Review\n\n**Files Reviewed:**\n- \n\n**Issues Found:**\n- \n\n**Suggestions:**\n- \n\n**Approved:** Yes/No\n\n",
    },
    Template {
        name: "idea",
        skeleton: "# Idea\n\n**What:**\n\n**Why:**\n\n**How:**\n\n**Next Steps:**\n\n",
    },
    Template {
        name: "bug",
        skeleton: "# Bug Report\n\n**Description:**\n\n**Steps to Reproduce:**\n1. \n\n**Expected Result:**\n\n**Actual Result:**\n\n**Environment:**\n\n",
    },
    Template {
        name: "todo",
        skeleton: "# TODO\n\n**Tasks:**\n- [ ] \n- [ ] \n- [ ] \n\n**Priority:** High/Medium/Low\n\n**Deadline:**\n\n",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TemplateCatalog {
    templates: &'static [Template],
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            templates: TEMPLATES,
        }
    }

    pub fn get(&self, name: &str) -> Result<&'static Template> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| NotasError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.templates.iter().map(|t| t.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Default capture title for a template: `code_review` -> `Code_Review Notes`.
pub fn default_title(name: &str) -> String {
    format!("{} Notes", title_case(name))
}

/// Upper-cases every letter that follows a non-letter, lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_names() {
        let catalog = TemplateCatalog::new();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["meeting", "project", "research", "code_review", "idea", "bug", "todo"]
        );
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_todo_has_three_checkboxes() {
        let todo = TemplateCatalog::new().get("todo").unwrap();
        assert!(todo.skeleton.contains("TODO"));
        assert_eq!(todo.skeleton.matches("- [ ]").count(), 3);
    }

    #[test]
    fn test_skeleton_sections() {
        let catalog = TemplateCatalog::new();
        let meeting = catalog.get("meeting").unwrap().skeleton;
        assert!(meeting.contains("**Attendees:**"));
        assert!(meeting.contains("**Agenda:**"));

        let project = catalog.get("project").unwrap().skeleton;
        assert!(project.contains("**Objective:**"));
        assert!(project.contains("**Scope:**"));

        for template in catalog.iter() {
            assert!(template.skeleton.starts_with("# "), "{}", template.name);
        }
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let err = TemplateCatalog::new().get("diary").unwrap_err();
        assert!(matches!(err, NotasError::NotFound(ref name) if name == "diary"));
        assert!(!TemplateCatalog::new().contains("diary"));
    }

    #[test]
    fn test_default_title() {
        assert_eq!(default_title("meeting"), "Meeting Notes");
        assert_eq!(default_title("code_review"), "Code_Review Notes");
        assert_eq!(default_title("TODO"), "Todo Notes");
    }
}
