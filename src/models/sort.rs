use serde::{Deserialize, Serialize};

/// A sortable client column, serialized with the record's camelCase key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    ClientId,
    Name,
    Type,
    Email,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Canonical ordering, matching the table's column order
    pub const ALL: [SortField; 7] = [
        SortField::ClientId,
        SortField::Name,
        SortField::Type,
        SortField::Email,
        SortField::Status,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortField::ClientId => "Client ID",
            SortField::Name => "Client Name",
            SortField::Type => "Client Type",
            SortField::Email => "Email",
            SortField::Status => "Status",
            SortField::CreatedAt => "Created At",
            SortField::UpdatedAt => "Updated At",
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, SortField::CreatedAt | SortField::UpdatedAt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Human label for a direction on a given field
    pub fn label_for(&self, field: SortField) -> &'static str {
        match (field.is_timestamp(), self) {
            (true, SortDirection::Ascending) => "↓ Oldest",
            (true, SortDirection::Descending) => "↑ Newest",
            (false, SortDirection::Ascending) => "↑ A-Z",
            (false, SortDirection::Descending) => "↓ Z-A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_serializes_like_stored_preferences() {
        let criterion = SortCriterion::new(SortField::CreatedAt, SortDirection::Descending);
        let json = serde_json::to_string(&criterion).unwrap();
        assert_eq!(json, r#"{"field":"createdAt","direction":"desc"}"#);

        let back: SortCriterion = serde_json::from_str(r#"{"field":"clientId","direction":"asc"}"#).unwrap();
        assert_eq!(back, SortCriterion::ascending(SortField::ClientId));
    }

    #[test]
    fn timestamp_fields_use_age_labels() {
        assert_eq!(SortDirection::Ascending.label_for(SortField::UpdatedAt), "↓ Oldest");
        assert_eq!(SortDirection::Descending.label_for(SortField::Name), "↓ Z-A");
    }
}
