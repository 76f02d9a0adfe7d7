//! Client-side list shaping: tab filtering, multi-key sorting and the
//! editable sort-criteria list.

pub mod criteria;
pub mod engine;
pub mod filter;

pub use criteria::{CriteriaAction, SortCriteria};
pub use engine::sort_clients;
pub use filter::filter_clients;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use crate::models::{Client, ClientType};

    pub fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    pub fn client(id: i64, name: &str, client_type: ClientType, status: bool) -> Client {
        Client {
            client_id: id,
            name: name.to_string(),
            client_type,
            email: format!("{}@example.test", name.to_lowercase()),
            status,
            created_at: at(id),
            updated_at: at(id * 2),
        }
    }

    pub fn arb_client() -> impl Strategy<Value = Client> {
        (
            0i64..50,
            prop::sample::select(vec!["alice", "Alice", "bob", "Bob", "carol", "Dave", ""]),
            any::<bool>(),
            any::<bool>(),
            0i64..5,
            0i64..5,
        )
            .prop_map(|(id, name, company, status, created, updated)| Client {
                client_id: id,
                name: name.to_string(),
                client_type: if company {
                    ClientType::Company
                } else {
                    ClientType::Individual
                },
                email: format!("{name}@example.test"),
                status,
                created_at: at(created),
                updated_at: at(updated),
            })
    }
}
