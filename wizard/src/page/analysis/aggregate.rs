use std::collections::HashMap;

use tracing::debug;

use crate::{
    page::analysis::{
        extractor::StyleSample,
        scanner::{normalize_font_family, usage_percent},
    },
    types::{insert_distinct, ColorSummaryEntry, FontSummaryEntry},
};

/// Running color counts for one pass.
#[derive(Debug, Default)]
pub struct ColorTally {
    entries: Vec<ColorSummaryEntry>,
    index: HashMap<String, usize>,
}

impl ColorTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every present color of the sample once per role.
    pub fn observe(&mut self, sample: &StyleSample) {
        for color in sample.colors() {
            let idx = match self.index.get(color) {
                Some(idx) => *idx,
                None => {
                    self.entries.push(ColorSummaryEntry::new(color));
                    self.index.insert(color.to_string(), self.entries.len() - 1);
                    self.entries.len() - 1
                }
            };
            let entry = &mut self.entries[idx];
            entry.count += 1;
            insert_distinct(&mut entry.elements, &sample.element_tag);
        }
    }

    /// Entries by descending count; ties keep first-seen order.
    pub fn finish(self) -> Vec<ColorSummaryEntry> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        debug!("Color tally finished with {} distinct colors", entries.len());
        entries
    }
}

#[derive(Debug)]
struct FontAccumulator {
    name: String,
    count: usize,
    weights: Vec<String>,
    sizes: Vec<String>,
    elements: Vec<String>,
}

/// Running font family counts for one pass.
#[derive(Debug, Default)]
pub struct FontTally {
    entries: Vec<FontAccumulator>,
    index: HashMap<String, usize>,
}

impl FontTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the sample carried a font family and was counted.
    pub fn observe(&mut self, sample: &StyleSample) -> bool {
        let Some(family) = sample.font_family.as_deref() else {
            return false;
        };
        let name = normalize_font_family(family);

        let idx = match self.index.get(&name) {
            Some(idx) => *idx,
            None => {
                self.entries.push(FontAccumulator {
                    name: name.clone(),
                    count: 0,
                    weights: Vec::new(),
                    sizes: Vec::new(),
                    elements: Vec::new(),
                });
                self.index.insert(name, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[idx];
        entry.count += 1;
        if let Some(weight) = &sample.font_weight {
            insert_distinct(&mut entry.weights, weight);
        }
        if let Some(size) = &sample.font_size {
            insert_distinct(&mut entry.sizes, size);
        }
        insert_distinct(&mut entry.elements, &sample.element_tag);
        true
    }

    /// Entries by descending count with their usage share.
    pub fn finish(self) -> Vec<FontSummaryEntry> {
        let total = self.entries.iter().map(|entry| entry.count).sum::<usize>();
        if total == 0 {
            return Vec::new();
        }

        let mut entries = self
            .entries
            .into_iter()
            .map(|entry| FontSummaryEntry {
                usage_percent: usage_percent(entry.count, total),
                name: entry.name,
                weights: entry.weights,
                sizes: entry.sizes,
                elements: entry.elements,
                count: entry.count,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        debug!(
            "Font tally finished with {} families over {} elements",
            entries.len(),
            total
        );
        entries
    }
}
