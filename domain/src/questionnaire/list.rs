//! Question list aggregate
//!
//! The list is an ordered sequence of divider markers and question entries.
//! Each question belongs to the group opened by the nearest preceding
//! divider. New questions are always appended as a `{divider, entry}` pair,
//! and deleting a question removes the divider that opened its group.
//!
//! After every mutation the whole list is renumbered: a single pass assigns
//! `1..=N` to the questions in encounter order.

use super::entry::QuestionEntry;
use crate::core::error::DomainError;
use std::collections::BTreeSet;

/// An element of the question list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionItem {
    Divider,
    Question(QuestionEntry),
}

impl QuestionItem {
    pub fn is_divider(&self) -> bool {
        matches!(self, QuestionItem::Divider)
    }

    pub fn as_question(&self) -> Option<&QuestionEntry> {
        match self {
            QuestionItem::Question(entry) => Some(entry),
            QuestionItem::Divider => None,
        }
    }
}

/// A question together with its derived position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedQuestion<'a> {
    /// 1-based group number (count of dividers seen so far); 0 if no divider precedes it
    pub section_index: usize,
    /// 1-based position among all questions
    pub local_index: usize,
    pub entry: &'a QuestionEntry,
}

/// Label and block id of a question, as offered for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionCandidate<'a> {
    pub label: &'a str,
    pub block_id: &'a str,
}

/// Single-pass iterator over the questions of a list, skipping dividers
pub struct DeletionCandidates<'a> {
    items: std::slice::Iter<'a, QuestionItem>,
}

impl<'a> Iterator for DeletionCandidates<'a> {
    type Item = DeletionCandidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.by_ref().find_map(|item| {
            item.as_question().map(|entry| DeletionCandidate {
                label: entry.label(),
                block_id: entry.block_id(),
            })
        })
    }
}

/// The live questionnaire (Aggregate)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionList {
    items: Vec<QuestionItem>,
}

impl QuestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap items loaded from storage as-is (no renumbering)
    pub fn from_items(items: Vec<QuestionItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    /// Number of questions (dividers excluded)
    pub fn len(&self) -> usize {
        self.questions().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn divider_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_divider()).count()
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionEntry> {
        self.items.iter().filter_map(QuestionItem::as_question)
    }

    pub fn find(&self, block_id: &str) -> Option<&QuestionEntry> {
        self.questions().find(|q| q.block_id() == block_id)
    }

    /// Questions with their derived group and position
    pub fn positioned(&self) -> Vec<PositionedQuestion<'_>> {
        let mut section_index = 0;
        let mut local_index = 0;
        let mut positioned = Vec::new();
        for item in &self.items {
            match item {
                QuestionItem::Divider => section_index += 1,
                QuestionItem::Question(entry) => {
                    local_index += 1;
                    positioned.push(PositionedQuestion {
                        section_index,
                        local_index,
                        entry,
                    });
                }
            }
        }
        positioned
    }

    /// Split raw modal text into question labels.
    ///
    /// Lines are trimmed and blank lines dropped. Input with no usable line is
    /// rejected so callers never persist a no-op change.
    pub fn parse_new_questions(raw: &str) -> Result<Vec<String>, DomainError> {
        let labels: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if labels.is_empty() {
            return Err(DomainError::Validation(
                "no question text found in input".to_string(),
            ));
        }
        Ok(labels)
    }

    /// Append one `{divider, entry}` pair per label, then renumber.
    ///
    /// Returns the number of questions added.
    pub fn add_questions<I, S>(&mut self, labels: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next_index = self.len() + 1;
        let mut added = 0;
        for label in labels {
            self.items.push(QuestionItem::Divider);
            self.items
                .push(QuestionItem::Question(QuestionEntry::new(label, next_index)));
            next_index += 1;
            added += 1;
        }
        self.renumber();
        added
    }

    /// Remove every question whose block id is selected, together with the
    /// divider that opens its group, then renumber.
    ///
    /// Ids refer to the numbering before this call. Unknown ids are skipped
    /// and not counted. An empty selection deletes nothing.
    pub fn delete_questions(&mut self, selected_block_ids: &BTreeSet<String>) -> usize {
        if selected_block_ids.is_empty() {
            return 0;
        }

        let mut deleted = 0;
        for block_id in selected_block_ids {
            let Some(position) = self.items.iter().position(|item| {
                item.as_question()
                    .is_some_and(|entry| entry.block_id() == block_id)
            }) else {
                continue;
            };

            let divider = self.items[..position]
                .iter()
                .rposition(QuestionItem::is_divider);

            self.items.remove(position);
            if let Some(divider) = divider {
                self.items.remove(divider);
            }
            deleted += 1;
        }

        if deleted > 0 {
            self.renumber();
        }
        deleted
    }

    /// Reassign `1..=N` to all questions in encounter order.
    pub fn renumber(&mut self) {
        let mut counter = 1;
        for item in &mut self.items {
            if let QuestionItem::Question(entry) = item {
                entry.renumber(counter);
                counter += 1;
            }
        }
    }

    /// Whether question indices run `1..=N` with no gap or duplicate
    pub fn is_contiguous(&self) -> bool {
        self.questions().enumerate().all(|(i, q)| {
            q.index() == Some(i + 1) && q.action_id().ends_with(&format!("_{}", i + 1))
        })
    }

    /// Whether every question sits in a group opened by a divider and no
    /// divider opens an empty group
    pub fn is_sectioned(&self) -> bool {
        let mut group_open = false;
        let mut group_has_question = false;
        for item in &self.items {
            match item {
                QuestionItem::Divider => {
                    if group_open && !group_has_question {
                        return false;
                    }
                    group_open = true;
                    group_has_question = false;
                }
                QuestionItem::Question(_) => {
                    if !group_open {
                        return false;
                    }
                    group_has_question = true;
                }
            }
        }
        !group_open || group_has_question
    }

    /// Label/block-id pairs for a deletion picker, dividers excluded
    pub fn deletion_candidates(&self) -> DeletionCandidates<'_> {
        DeletionCandidates {
            items: self.items.iter(),
        }
    }
}
