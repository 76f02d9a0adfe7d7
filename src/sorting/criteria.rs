//! The ordered, non-empty list of sort criteria and the edits the sort panel
//! can make to it. Every edit returns a fresh list; refused edits return an
//! error and leave the original untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{SortCriterion, SortDirection, SortField};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("sort criteria list cannot be empty")]
    Empty,
    #[error("field {0:?} is already used by another criterion")]
    DuplicateField(SortField),
    #[error("criterion index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("every sortable field is already in use")]
    NoFieldAvailable,
    #[error("the last remaining criterion cannot be removed")]
    LastCriterion,
}

/// One edit to the criteria list, as issued by the sort panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaAction {
    Add,
    Remove(usize),
    SetField(usize, SortField),
    ToggleDirection(usize, SortDirection),
    Reorder { from: usize, to: usize },
    ClearAll,
}

/// Sort criteria in precedence order (first = primary key).
///
/// Invariants: never empty, and no field appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SortCriterion>", into = "Vec<SortCriterion>")]
pub struct SortCriteria(Vec<SortCriterion>);

impl Default for SortCriteria {
    fn default() -> Self {
        Self(vec![SortCriterion::ascending(SortField::Name)])
    }
}

impl TryFrom<Vec<SortCriterion>> for SortCriteria {
    type Error = CriteriaError;

    fn try_from(criteria: Vec<SortCriterion>) -> Result<Self, Self::Error> {
        Self::new(criteria)
    }
}

impl From<SortCriteria> for Vec<SortCriterion> {
    fn from(criteria: SortCriteria) -> Self {
        criteria.0
    }
}

impl SortCriteria {
    pub fn new(criteria: Vec<SortCriterion>) -> Result<Self, CriteriaError> {
        if criteria.is_empty() {
            return Err(CriteriaError::Empty);
        }
        for (i, criterion) in criteria.iter().enumerate() {
            if criteria[..i].iter().any(|c| c.field == criterion.field) {
                return Err(CriteriaError::DuplicateField(criterion.field));
            }
        }
        Ok(Self(criteria))
    }

    pub fn as_slice(&self) -> &[SortCriterion] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&SortCriterion> {
        self.0.get(index)
    }

    pub fn contains_field(&self, field: SortField) -> bool {
        self.0.iter().any(|c| c.field == field)
    }

    /// Fields not yet in the list, in canonical order.
    pub fn available_fields(&self) -> Vec<SortField> {
        SortField::ALL
            .into_iter()
            .filter(|field| !self.contains_field(*field))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), CriteriaError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(CriteriaError::IndexOutOfRange {
                index,
                len: self.0.len(),
            })
        }
    }

    pub fn apply(&self, action: CriteriaAction) -> Result<Self, CriteriaError> {
        match action {
            CriteriaAction::Add => self.add(),
            CriteriaAction::Remove(index) => self.remove(index),
            CriteriaAction::SetField(index, field) => self.set_field(index, field),
            CriteriaAction::ToggleDirection(index, direction) => {
                self.toggle_direction(index, direction)
            }
            CriteriaAction::Reorder { from, to } => self.reorder(from, to),
            CriteriaAction::ClearAll => Ok(Self::default()),
        }
    }

    /// Appends the first available field, ascending.
    pub fn add(&self) -> Result<Self, CriteriaError> {
        let field = self
            .available_fields()
            .first()
            .copied()
            .ok_or(CriteriaError::NoFieldAvailable)?;
        let mut next = self.0.clone();
        next.push(SortCriterion::ascending(field));
        Ok(Self(next))
    }

    pub fn remove(&self, index: usize) -> Result<Self, CriteriaError> {
        self.check_index(index)?;
        if self.0.len() == 1 {
            return Err(CriteriaError::LastCriterion);
        }
        let mut next = self.0.clone();
        next.remove(index);
        Ok(Self(next))
    }

    pub fn set_field(&self, index: usize, field: SortField) -> Result<Self, CriteriaError> {
        self.check_index(index)?;
        let used_elsewhere = self
            .0
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.field == field);
        if used_elsewhere {
            return Err(CriteriaError::DuplicateField(field));
        }
        let mut next = self.0.clone();
        next[index].field = field;
        Ok(Self(next))
    }

    /// Sets the direction at `index`. Selecting the direction the criterion
    /// already has deselects it instead: the criterion is removed, or the list
    /// is reset to the default when it is the only one left.
    pub fn toggle_direction(
        &self,
        index: usize,
        direction: SortDirection,
    ) -> Result<Self, CriteriaError> {
        self.check_index(index)?;
        if self.0[index].direction != direction {
            let mut next = self.0.clone();
            next[index].direction = direction;
            return Ok(Self(next));
        }
        if self.0.len() == 1 {
            Ok(Self::default())
        } else {
            self.remove(index)
        }
    }

    /// Moves the criterion at `from` to `to`, shifting the ones in between.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Self, CriteriaError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let mut next = self.0.clone();
        let moved = next.remove(from);
        next.insert(to, moved);
        Ok(Self(next))
    }
}
