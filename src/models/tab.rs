use crate::models::ClientType;

/// Category filter over the client list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Individual,
    Company,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::All, Tab::Individual, Tab::Company];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::All => "All",
            Tab::Individual => "Individual",
            Tab::Company => "Company",
        }
    }

    /// The client type this tab restricts to, `None` for the passthrough tab
    pub fn client_type(&self) -> Option<ClientType> {
        match self {
            Tab::All => None,
            Tab::Individual => Some(ClientType::Individual),
            Tab::Company => Some(ClientType::Company),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::All => 0,
            Tab::Individual => 1,
            Tab::Company => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}
