//! Tag book — the single mutable tag array shared by every rule in a pass.
//!
//! Rules read trailing history from the book and return placements; only the
//! classifier writes. An exclusive placement first clears every other bar
//! holding the same tag, so at most one such tag is live in the series.

use super::rule::Placement;
use crate::domain::Tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBook {
    tags: Vec<Tag>,
}

impl TagBook {
    pub fn new(len: usize) -> Self {
        Self {
            tags: vec![Tag::None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, index: usize) -> Tag {
        self.tags[index]
    }

    /// True if `tag` is held within the trailing `window` bars ending at
    /// `index` (inclusive), i.e. by one of the `window - 1` bars before it.
    pub fn recent(&self, tag: Tag, index: usize, window: usize) -> bool {
        let start = (index + 1).saturating_sub(window).min(index);
        self.tags[start..index].contains(&tag)
    }

    pub fn place(&mut self, placement: Placement) {
        if placement.exclusive {
            for t in self.tags.iter_mut().filter(|t| **t == placement.tag) {
                *t = Tag::None;
            }
        }
        self.tags[placement.index] = placement.tag;
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }
}
