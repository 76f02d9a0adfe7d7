//! The client list screen's state, changed only through `dispatch`.

use tracing::debug;

use crate::fetch::FetchOutcome;
use crate::models::{Client, Tab};
use crate::sorting::{CriteriaAction, SortCriteria, filter_clients, sort_clients};

pub type CommitHook = Box<dyn FnMut(&SortCriteria)>;

#[derive(Debug)]
pub enum ViewAction {
    SelectTab(Tab),
    Criteria(CriteriaAction),
    FetchStarted,
    FetchFinished(FetchOutcome),
}

pub struct ClientsView {
    clients: Vec<Client>,
    loading: bool,
    last_error: Option<String>,
    tab: Tab,
    criteria: SortCriteria,
    on_commit: Option<CommitHook>,
}

impl ClientsView {
    pub fn new(criteria: SortCriteria) -> Self {
        Self {
            clients: Vec::new(),
            loading: false,
            last_error: None,
            tab: Tab::default(),
            criteria,
            on_commit: None,
        }
    }

    /// Registers a callback run after every committed criteria change.
    pub fn with_commit_hook(mut self, hook: impl FnMut(&SortCriteria) + 'static) -> Self {
        self.on_commit = Some(Box::new(hook));
        self
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn criteria(&self) -> &SortCriteria {
        &self.criteria
    }

    /// Rows to display: the active tab's clients in criteria order.
    pub fn visible(&self) -> Vec<&Client> {
        let filtered = filter_clients(&self.clients, self.tab);
        sort_clients(&filtered, self.criteria.as_slice())
    }

    /// Applies one action. Returns whether anything changed.
    pub fn dispatch(&mut self, action: ViewAction) -> bool {
        match action {
            ViewAction::SelectTab(tab) => {
                let changed = self.tab != tab;
                self.tab = tab;
                changed
            }
            ViewAction::Criteria(action) => match self.criteria.apply(action) {
                Ok(next) => {
                    if next == self.criteria {
                        return false;
                    }
                    self.criteria = next;
                    if let Some(hook) = self.on_commit.as_mut() {
                        hook(&self.criteria);
                    }
                    true
                }
                Err(err) => {
                    debug!(?action, "sort edit refused: {err}");
                    false
                }
            },
            ViewAction::FetchStarted => {
                self.loading = true;
                true
            }
            ViewAction::FetchFinished(FetchOutcome::Loaded(clients)) => {
                self.clients = clients;
                self.loading = false;
                self.last_error = None;
                true
            }
            ViewAction::FetchFinished(FetchOutcome::Failed(message)) => {
                // Previously loaded clients stay on screen
                self.loading = false;
                self.last_error = Some(message);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::models::{ClientType, SortDirection, SortField};
    use crate::sorting::fixtures::client;

    fn loaded_view() -> ClientsView {
        let mut view = ClientsView::new(SortCriteria::default());
        view.dispatch(ViewAction::FetchStarted);
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Loaded(vec![
            client(2, "Bob", ClientType::Individual, true),
            client(1, "alice", ClientType::Company, false),
            client(3, "carol", ClientType::Individual, false),
        ])));
        view
    }

    fn visible_ids(view: &ClientsView) -> Vec<i64> {
        view.visible().iter().map(|c| c.client_id).collect()
    }

    #[test]
    fn starts_empty_on_all_tab() {
        let view = ClientsView::new(SortCriteria::default());
        assert_eq!(view.tab(), Tab::All);
        assert!(view.visible().is_empty());
        assert!(!view.is_loading());
    }

    #[test]
    fn loading_flag_follows_fetch_lifecycle() {
        let mut view = ClientsView::new(SortCriteria::default());
        view.dispatch(ViewAction::FetchStarted);
        assert!(view.is_loading());
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Loaded(vec![])));
        assert!(!view.is_loading());
    }

    #[test]
    fn visible_rows_are_filtered_then_sorted() {
        let mut view = loaded_view();
        assert_eq!(visible_ids(&view), [1, 2, 3]);

        view.dispatch(ViewAction::SelectTab(Tab::Individual));
        assert_eq!(visible_ids(&view), [2, 3]);

        view.dispatch(ViewAction::Criteria(CriteriaAction::ToggleDirection(
            0,
            SortDirection::Descending,
        )));
        assert_eq!(visible_ids(&view), [3, 2]);
    }

    #[test]
    fn failed_fetch_keeps_previous_clients() {
        let mut view = loaded_view();
        view.dispatch(ViewAction::FetchStarted);
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Failed("boom".into())));
        assert!(!view.is_loading());
        assert_eq!(view.clients().len(), 3);
        assert_eq!(view.last_error(), Some("boom"));
    }

    #[test]
    fn first_failed_fetch_leaves_list_empty() {
        let mut view = ClientsView::new(SortCriteria::default());
        view.dispatch(ViewAction::FetchStarted);
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Failed("down".into())));
        assert!(view.clients().is_empty());
        assert!(!view.is_loading());
    }

    #[test]
    fn successful_fetch_clears_error() {
        let mut view = ClientsView::new(SortCriteria::default());
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Failed("down".into())));
        view.dispatch(ViewAction::FetchFinished(FetchOutcome::Loaded(vec![])));
        assert_eq!(view.last_error(), None);
    }

    #[test]
    fn commit_hook_sees_each_criteria_change_only() {
        let committed: Rc<RefCell<Vec<SortCriteria>>> = Rc::default();
        let sink = Rc::clone(&committed);
        let mut view = ClientsView::new(SortCriteria::default())
            .with_commit_hook(move |criteria| sink.borrow_mut().push(criteria.clone()));

        assert!(view.dispatch(ViewAction::Criteria(CriteriaAction::Add)));
        assert!(view.dispatch(ViewAction::SelectTab(Tab::Company)));
        assert!(view.dispatch(ViewAction::Criteria(CriteriaAction::Remove(1))));
        // last criterion stays
        assert!(!view.dispatch(ViewAction::Criteria(CriteriaAction::Remove(0))));
        // no-op: already the default
        assert!(!view.dispatch(ViewAction::Criteria(CriteriaAction::ClearAll)));

        let committed = committed.borrow();
        assert_eq!(committed.len(), 2);
        assert_eq!(committed[0].len(), 2);
        assert_eq!(committed[1], SortCriteria::default());
    }

    #[test]
    fn deselecting_only_criterion_resets_to_name_ascending() {
        let mut view = ClientsView::new(
            SortCriteria::new(vec![crate::models::SortCriterion::ascending(SortField::Email)])
                .unwrap(),
        );
        view.dispatch(ViewAction::Criteria(CriteriaAction::ToggleDirection(
            0,
            SortDirection::Ascending,
        )));
        assert_eq!(view.criteria(), &SortCriteria::default());
    }
}
