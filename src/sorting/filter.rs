use crate::models::{Client, Tab};

/// Keeps the clients belonging to `tab`; `Tab::All` passes everything through in order.
pub fn filter_clients(clients: &[Client], tab: Tab) -> Vec<&Client> {
    match tab.client_type() {
        None => clients.iter().collect(),
        Some(client_type) => clients
            .iter()
            .filter(|client| client.client_type == client_type)
            .collect(),
    }
}
