//! Named, ordered groups of fields with a current position and progress.

use crate::error::FormError;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// A named subset of the form's fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub fields: Vec<String>,
    /// Result of the last `validate_section` for this section.
    pub valid: bool,
}

/// Sections in insertion order plus an optional explicit ordering.
#[derive(Clone, Debug, Default)]
pub struct SectionTracker {
    sections: Vec<Section>,
    index: HashMap<String, usize>,
    order: Option<Vec<String>>,
    current: Option<String>,
    progress: u32,
    final_section_for_review: bool,
}

impl SectionTracker {
    /// With `final_section_for_review`, the last section does not count
    /// towards progress.
    pub fn new(final_section_for_review: bool) -> Self {
        SectionTracker {
            final_section_for_review,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Create a section, or overwrite an existing one's fields and reset its
    /// validity.
    pub fn define_section(&mut self, name: impl Into<String>, fields: Vec<String>) {
        let name = name.into();
        if let Some(&i) = self.index.get(&name) {
            self.sections[i].fields = fields;
            self.sections[i].valid = false;
            return;
        }
        self.index.insert(name.clone(), self.sections.len());
        if let Some(order) = self.order.as_mut() {
            order.push(name.clone());
        }
        self.sections.push(Section {
            name,
            fields,
            valid: false,
        });
    }

    /// Add a field to a section, creating the section on first use. The
    /// first section created this way becomes the current section.
    pub fn assign_field(&mut self, section: &str, field: &str) {
        if !self.index.contains_key(section) {
            self.define_section(section, Vec::new());
        }
        if let Some(&i) = self.index.get(section) {
            let fields = &mut self.sections[i].fields;
            if !fields.iter().any(|f| f == field) {
                fields.push(field.to_string());
            }
        }
        if self.current.is_none() {
            self.current = Some(section.to_string());
        }
    }

    /// Sections in explicit order if one was set, else insertion order.
    pub fn sections(&self) -> Vec<&Section> {
        match &self.order {
            Some(order) => order.iter().filter_map(|name| self.section(name)).collect(),
            None => self.sections.iter().collect(),
        }
    }

    /// Section names in effective order.
    pub fn names(&self) -> Vec<&str> {
        self.sections().into_iter().map(|s| s.name.as_str()).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.index.get(name).map(|&i| &self.sections[i])
    }

    pub fn section_fields(&self, name: &str) -> Result<&[String], FormError> {
        self.section(name)
            .map(|s| s.fields.as_slice())
            .ok_or_else(|| FormError::SectionNotDefined {
                name: name.to_string(),
            })
    }

    /// False for sections never validated and for unknown names.
    pub fn is_section_valid(&self, name: &str) -> bool {
        self.section(name).is_some_and(|s| s.valid)
    }

    /// Set an explicit order. `names` must list every known section exactly
    /// once (repeats are ignored); otherwise the current order is kept.
    pub fn order_sections<I, S>(&mut self, names: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !order.contains(&name) {
                order.push(name);
            }
        }

        let unknown: Vec<String> = order
            .iter()
            .filter(|name| !self.index.contains_key(*name))
            .cloned()
            .collect();
        let missing: Vec<String> = self
            .sections
            .iter()
            .filter(|s| !order.contains(&s.name))
            .map(|s| s.name.clone())
            .collect();

        if !missing.is_empty() || !unknown.is_empty() {
            return Err(FormError::InvalidSectionOrder { missing, unknown });
        }

        debug!("section order set to {:?}", order);
        self.order = Some(order);
        Ok(())
    }

    pub fn current_section(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Progress percentage as of the last navigation.
    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn set_current_section(&mut self, name: &str) -> Result<(), FormError> {
        if !self.index.contains_key(name) {
            return Err(FormError::SectionNotDefined {
                name: name.to_string(),
            });
        }
        self.current = Some(name.to_string());
        self.update_progress()?;
        debug!("current section: {} ({}%)", name, self.progress);
        Ok(())
    }

    /// Move forward one section, staying on the last one. With no current
    /// section, moves to the first.
    pub fn next_section(&mut self) -> Result<(), FormError> {
        let target = match self.position() {
            Some(i) => (i + 1).min(self.sections.len().saturating_sub(1)),
            None => 0,
        };
        self.move_to(target)
    }

    /// Move back one section, staying on the first one.
    pub fn previous_section(&mut self) -> Result<(), FormError> {
        let target = self.position().map_or(0, |i| i.saturating_sub(1));
        self.move_to(target)
    }

    /// Recompute progress from the current position.
    ///
    /// The review section (if configured) is excluded from the count; when
    /// nothing is left to count, progress is 100.
    pub fn update_progress(&mut self) -> Result<u32, FormError> {
        if self.sections.is_empty() {
            return Err(FormError::NoSections);
        }
        let counted = self.sections.len() - usize::from(self.final_section_for_review);
        let position = self.position().unwrap_or(0);
        self.progress = if counted == 0 {
            100
        } else {
            let percent = (position as f64 / counted as f64 * 100.0).round() as u32;
            percent.min(100)
        };
        Ok(self.progress)
    }

    /// True if every field belongs to some section and every section field
    /// is a known field.
    pub fn covers<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        let fields: Vec<&str> = fields.into_iter().collect();
        let assigned = |field: &str| {
            self.sections
                .iter()
                .any(|s| s.fields.iter().any(|f| f == field))
        };
        fields.iter().all(|f| assigned(*f))
            && self
                .sections
                .iter()
                .flat_map(|s| s.fields.iter())
                .all(|f| fields.contains(&f.as_str()))
    }

    pub(crate) fn set_valid(&mut self, name: &str, valid: bool) {
        if let Some(&i) = self.index.get(name) {
            self.sections[i].valid = valid;
        }
    }

    fn position(&self) -> Option<usize> {
        let current = self.current.as_deref()?;
        self.names().iter().position(|name| *name == current)
    }

    fn move_to(&mut self, position: usize) -> Result<(), FormError> {
        let name = self
            .names()
            .get(position)
            .map(|name| name.to_string())
            .ok_or(FormError::NoSections)?;
        self.set_current_section(&name)
    }
}
