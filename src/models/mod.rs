mod client;
mod sort;
mod tab;

pub use client::{Client, ClientRow, ClientType};
pub use sort::{SortCriterion, SortDirection, SortField};
pub use tab::Tab;
