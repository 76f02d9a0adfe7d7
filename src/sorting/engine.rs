use std::cmp::Ordering;

use crate::models::{Client, SortCriterion, SortDirection, SortField};

/// Case-insensitive ordinal comparison, without allocating lowercase copies.
fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn compare_field(a: &Client, b: &Client, field: SortField) -> Ordering {
    match field {
        SortField::ClientId => a.client_id.cmp(&b.client_id),
        SortField::Name => compare_case_insensitive(&a.name, &b.name),
        SortField::Type => compare_case_insensitive(a.client_type.as_str(), b.client_type.as_str()),
        SortField::Email => compare_case_insensitive(&a.email, &b.email),
        // false < true, so ascending puts inactive clients first
        SortField::Status => a.status.cmp(&b.status),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Compares two clients by each criterion in turn; the first non-equal
/// result wins. Descending only flips that criterion's own result.
pub fn compare_clients(a: &Client, b: &Client, criteria: &[SortCriterion]) -> Ordering {
    criteria
        .iter()
        .map(|criterion| {
            let ordering = compare_field(a, b, criterion.field);
            match criterion.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Returns a new, stably sorted list; the input is left untouched.
pub fn sort_clients<'a>(clients: &[&'a Client], criteria: &[SortCriterion]) -> Vec<&'a Client> {
    let mut sorted = clients.to_vec();
    sorted.sort_by(|a, b| compare_clients(a, b, criteria));
    sorted
}
