//! In-memory order state: dense collections plus id-to-position indexes.
//!
//! The collections keep server order; the indexes are derived and must
//! exactly mirror current positions after every mutation. Removing from a
//! dense sequence shifts every later element, so removals rebuild the
//! affected index instead of deleting one entry.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::{
    types::{OrderSession, OrderedProduct, OrderedProductStatus, SessionStatus},
    ws::OrderEvent,
};

#[derive(Debug, Default)]
pub struct OrdersState {
    sessions: Vec<OrderSession>,
    products: Vec<OrderedProduct>,
    session_index: HashMap<Uuid, usize>,
    product_index: HashMap<Uuid, usize>,
}

impl OrdersState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both collections wholesale and rebuild both indexes.
    pub fn replace(&mut self, sessions: Vec<OrderSession>, products: Vec<OrderedProduct>) {
        self.sessions = sessions;
        self.products = products;
        self.rebuild_session_index();
        self.rebuild_product_index();
    }

    fn rebuild_session_index(&mut self) {
        self.session_index = self
            .sessions
            .iter()
            .enumerate()
            .map(|(position, session)| (session.id, position))
            .collect();
    }

    fn rebuild_product_index(&mut self) {
        self.product_index = self
            .products
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id, position))
            .collect();
    }

    pub fn push_session(&mut self, session: OrderSession) {
        self.session_index.insert(session.id, self.sessions.len());
        self.sessions.push(session);
    }

    /// Remove a session by id. Position shifts force a full index rebuild.
    pub fn remove_session(&mut self, id: Uuid) -> Option<OrderSession> {
        let position = self.session_index.get(&id).copied()?;
        let removed = self.sessions.remove(position);
        self.rebuild_session_index();
        Some(removed)
    }

    pub fn session_by_id(&self, id: Uuid) -> Option<&OrderSession> {
        self.session_index
            .get(&id)
            .and_then(|&position| self.sessions.get(position))
    }

    pub fn replace_session(&mut self, session: OrderSession) -> bool {
        match self.session_index.get(&session.id) {
            Some(&position) => {
                self.sessions[position] = session;
                true
            }
            None => false,
        }
    }

    pub fn sessions(&self) -> &[OrderSession] {
        &self.sessions
    }

    pub fn products(&self) -> &[OrderedProduct] {
        &self.products
    }

    /// Products with the given status, in collection order.
    pub fn products_by_status(&self, status: OrderedProductStatus) -> Vec<OrderedProduct> {
        self.products
            .iter()
            .filter(|product| product.status == status)
            .cloned()
            .collect()
    }

    /// Apply one inbound feed event.
    ///
    /// Events referencing an id we do not hold are silent no-ops: the local
    /// view is eventually consistent and may race the snapshot load.
    pub fn apply(&mut self, event: &OrderEvent) {
        match event {
            OrderEvent::Order(order) => {
                if self.product_index.contains_key(&order.id) {
                    debug!(id = %order.id, "order event for an already held ordered product");
                    return;
                }
                self.product_index.insert(order.id, self.products.len());
                self.products.push(OrderedProduct {
                    id: order.id,
                    product_id: order.product_id,
                    order_session_id: order.session_id,
                    status: order.status,
                });
            }
            OrderEvent::Delete(deleted) => {
                let Some(&position) = self.product_index.get(&deleted.id) else {
                    debug!(id = %deleted.id, "delete event for unknown ordered product");
                    return;
                };
                self.products.remove(position);
                self.rebuild_product_index();
            }
            OrderEvent::UpdateSession(change) => {
                let Some(&position) = self.session_index.get(&change.id) else {
                    debug!(id = %change.id, "update event for unknown session");
                    return;
                };
                let session = &mut self.sessions[position];
                session.table_number = change.table_number;
                session.status = change.status;
            }
            OrderEvent::SessionPaid(paid) => {
                let Some(&position) = self.session_index.get(&paid.id) else {
                    debug!(id = %paid.id, "pay event for unknown session");
                    return;
                };
                self.sessions[position].status = SessionStatus::Paid;
                self.products
                    .retain(|product| product.order_session_id != paid.id);
                self.rebuild_product_index();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_indexes_consistent(&self) {
        assert_eq!(self.session_index.len(), self.sessions.len());
        for (position, session) in self.sessions.iter().enumerate() {
            assert_eq!(self.session_index[&session.id], position);
        }
        assert_eq!(self.product_index.len(), self.products.len());
        for (position, product) in self.products.iter().enumerate() {
            assert_eq!(self.product_index[&product.id], position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::{DeletedOrder, NewOrder, SessionChange, SessionPaid};

    fn session(table_number: u32) -> OrderSession {
        OrderSession {
            id: Uuid::new_v4(),
            table_number,
            status: SessionStatus::Open,
        }
    }

    fn order_event(session_id: Uuid, status: OrderedProductStatus) -> OrderEvent {
        OrderEvent::Order(NewOrder {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            session_id,
            status,
        })
    }

    #[test]
    fn test_order_event_appends_and_indexes() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        state.replace(vec![s1.clone()], vec![]);

        state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
        state.apply(&order_event(s1.id, OrderedProductStatus::Preparing));

        assert_eq!(state.products().len(), 2);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_replayed_order_event_is_noop() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        state.replace(vec![s1.clone()], vec![]);

        let event = order_event(s1.id, OrderedProductStatus::Pending);
        state.apply(&event);
        state.apply(&event);

        assert_eq!(state.products().len(), 1);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        state.replace(vec![s1.clone()], vec![]);
        state.apply(&order_event(s1.id, OrderedProductStatus::Pending));

        state.apply(&OrderEvent::Delete(DeletedOrder { id: Uuid::new_v4() }));

        assert_eq!(state.products().len(), 1);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_delete_rebuilds_index_after_shift() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        state.replace(vec![s1.clone()], vec![]);
        for _ in 0..4 {
            state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
        }
        // Remove the second product; positions of the last two shift down.
        let victim = state.products()[1].id;
        state.apply(&OrderEvent::Delete(DeletedOrder { id: victim }));

        assert_eq!(state.products().len(), 3);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_index_consistency_across_mixed_operations() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        let s2 = session(2);
        state.replace(vec![s1.clone(), s2.clone()], vec![]);

        for round in 0..5 {
            state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
            state.apply(&order_event(s2.id, OrderedProductStatus::Done));
            state.assert_indexes_consistent();

            if round % 2 == 0 {
                let first = state.products()[0].id;
                state.apply(&OrderEvent::Delete(DeletedOrder { id: first }));
                state.assert_indexes_consistent();
            }
        }
    }

    #[test]
    fn test_update_session_in_place() {
        let mut state = OrdersState::new();
        let s1 = session(3);
        state.replace(vec![s1.clone()], vec![]);

        state.apply(&OrderEvent::UpdateSession(SessionChange {
            id: s1.id,
            table_number: 9,
            status: SessionStatus::Closed,
        }));

        let updated = state.session_by_id(s1.id).unwrap();
        assert_eq!(updated.table_number, 9);
        assert_eq!(updated.status, SessionStatus::Closed);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_update_unknown_session_is_noop() {
        let mut state = OrdersState::new();
        state.apply(&OrderEvent::UpdateSession(SessionChange {
            id: Uuid::new_v4(),
            table_number: 1,
            status: SessionStatus::Open,
        }));
        assert!(state.sessions().is_empty());
    }

    #[test]
    fn test_paid_session_purges_only_its_products() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        let s2 = session(2);
        state.replace(vec![s1.clone(), s2.clone()], vec![]);
        for _ in 0..3 {
            state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
        }
        state.apply(&order_event(s2.id, OrderedProductStatus::Preparing));

        state.apply(&OrderEvent::SessionPaid(SessionPaid { id: s1.id }));

        assert_eq!(state.session_by_id(s1.id).unwrap().status, SessionStatus::Paid);
        assert!(state
            .products()
            .iter()
            .all(|product| product.order_session_id != s1.id));
        assert_eq!(state.products().len(), 1);
        // The other session is untouched.
        assert_eq!(state.session_by_id(s2.id).unwrap().status, SessionStatus::Open);
        state.assert_indexes_consistent();
    }

    #[test]
    fn test_status_filter_keeps_relative_order() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        state.replace(vec![s1.clone()], vec![]);
        state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
        state.apply(&order_event(s1.id, OrderedProductStatus::Done));
        state.apply(&order_event(s1.id, OrderedProductStatus::Pending));
        state.apply(&order_event(s1.id, OrderedProductStatus::Preparing));

        let pending = state.products_by_status(OrderedProductStatus::Pending);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, state.products()[0].id);
        assert_eq!(pending[1].id, state.products()[2].id);
    }

    #[test]
    fn test_remove_session_rebuilds_index() {
        let mut state = OrdersState::new();
        let s1 = session(1);
        let s2 = session(2);
        let s3 = session(3);
        state.replace(vec![s1.clone(), s2.clone(), s3.clone()], vec![]);

        assert!(state.remove_session(s2.id).is_some());
        assert!(state.remove_session(s2.id).is_none());
        assert_eq!(state.sessions().len(), 2);
        state.assert_indexes_consistent();
    }
}
