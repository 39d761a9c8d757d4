use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::page::document::{PageMut, Priority};

/// Inline properties the highlight treatment may overwrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[derive(strum_macros::EnumIter, strum_macros::IntoStaticStr, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleFragment {
    Color,
    Outline,
    BoxShadow,
    Animation,
    Border,
    TextShadow,
}

impl StyleFragment {
    pub fn property(self) -> &'static str {
        self.into()
    }
}

/// Pre-highlight inline values of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FragmentSnapshot {
    fragments: SmallVec<[(StyleFragment, String, Priority); 6]>,
}

impl FragmentSnapshot {
    /// Record every fragment, including the ones the element leaves unset.
    pub fn capture<P: PageMut>(page: &P, node: &P::Node) -> Self {
        let fragments = StyleFragment::iter()
            .map(|fragment| {
                let property = fragment.property();
                (
                    fragment,
                    page.inline_style(node, property),
                    page.inline_priority(node, property),
                )
            })
            .collect();
        Self { fragments }
    }

    /// Write back exactly what was captured. An empty value removes the
    /// declaration again.
    pub fn restore<P: PageMut>(&self, page: &mut P, node: &P::Node) {
        for (fragment, value, priority) in &self.fragments {
            page.set_inline_style(node, fragment.property(), value, *priority);
        }
    }
}

/// Snapshots of highlighted elements, in the order they were taken.
#[derive(Debug)]
pub struct SnapshotTable<N> {
    entries: Vec<(N, FragmentSnapshot)>,
}

impl<N> Default for SnapshotTable<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N: PartialEq> SnapshotTable<N> {
    pub fn insert(&mut self, node: N, snapshot: FragmentSnapshot) {
        self.entries.push((node, snapshot));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empty the table, handing out every entry.
    pub fn drain(&mut self) -> impl Iterator<Item = (N, FragmentSnapshot)> + '_ {
        self.entries.drain(..)
    }
}
