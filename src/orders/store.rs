//! The order store: one consistent client-side view of sessions and ordered
//! products, fed by a REST snapshot and the live WebSocket stream.
//!
//! All mutation funnels through a single mutex held only across synchronous
//! sections, and the listener task applies feed events strictly in arrival
//! order. Session edits are REST-confirmed and applied immediately;
//! ordered-product lifecycle is event-driven because other actors (kitchen,
//! customer app) mutate it concurrently, so the store only requests changes
//! and waits for the confirming event.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    orders::{service::OrderApi, state::OrdersState},
    prelude::*,
    types::{OrderSession, OrderedProduct, OrderedProductStatus, SessionUpdate},
    voucher::VoucherRenderer,
    ws::{OrderFeed, OutgoingMessage},
    BaseUrl, Credentials, Error,
};

/// Voucher page: A4 in PDF points.
const VOUCHER_PAGE_SIZE: (f64, f64) = (595.0, 842.0);
/// Rendered QR edge length in PDF points.
const VOUCHER_QR_SIZE: f64 = 512.0;

/// State container for order sessions and ordered products.
///
/// Dependencies are constructor-injected so tests can substitute fakes for
/// the REST API, the feed, and the voucher renderer.
pub struct OrderStore<A, F, V> {
    api: A,
    feed: F,
    voucher: V,
    credentials: Credentials,
    public_base_url: String,
    state: Arc<Mutex<OrdersState>>,
    listener: Option<JoinHandle<()>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<A, F, V> OrderStore<A, F, V>
where
    A: OrderApi,
    F: OrderFeed,
    V: VoucherRenderer,
{
    pub fn new(api: A, feed: F, voucher: V, credentials: Credentials, base: &BaseUrl) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api,
            feed,
            voucher,
            credentials,
            public_base_url: base.rest_url(),
            state: Arc::new(Mutex::new(OrdersState::new())),
            listener: None,
            revision: Arc::new(revision),
        }
    }

    /// Receiver that observes a counter bumped on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OrdersState> {
        // Held only across synchronous sections, so poisoning means a panic
        // mid-mutation; propagating it would not help anyone.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch sessions and ordered products and replace the local view.
    ///
    /// Commit is all-or-nothing: both fetches must succeed before either
    /// collection is touched, so a failed second call never leaves a
    /// half-replaced view.
    pub async fn load_initial_snapshot(&self) -> Result<()> {
        let sessions = self.api.order_sessions(&self.credentials).await?;
        let products = self.api.ordered_products(&self.credentials).await?;

        self.lock().replace(sessions, products);
        self.bump();
        Ok(())
    }

    /// Create a session server-side and append it locally.
    pub async fn create_session(&self) -> Result<OrderSession> {
        let created = self.api.create_session(&self.credentials).await?;
        self.lock().push_session(created.clone());
        self.bump();
        Ok(created)
    }

    /// Delete a session server-side and remove it locally.
    ///
    /// Ordered products referencing it are not cascade-removed client-side;
    /// their lifecycle stays server-owned.
    pub async fn delete_session(&self, id: Uuid) -> Result<()> {
        self.api.delete_session(&self.credentials, id).await?;
        if self.lock().remove_session(id).is_some() {
            self.bump();
        }
        Ok(())
    }

    /// Patch a session with only the fields that changed.
    ///
    /// A no-change update skips the wire call entirely. Fails with
    /// [`Error::SessionNotFound`] when the session is no longer held, which
    /// can also happen if a feed event removed it while the PATCH was in
    /// flight.
    pub async fn update_session(&self, updated: OrderSession) -> Result<()> {
        let stored = self
            .lock()
            .session_by_id(updated.id)
            .cloned()
            .ok_or(Error::SessionNotFound(updated.id))?;

        let update = SessionUpdate::diff(&stored, &updated);
        if update.is_empty() {
            return Ok(());
        }

        self.api
            .update_session(&self.credentials, updated.id, &update)
            .await?;

        // Re-validate after the await: the session may have vanished.
        let id = updated.id;
        if !self.lock().replace_session(updated) {
            return Err(Error::SessionNotFound(id));
        }
        self.bump();
        Ok(())
    }

    pub fn session_by_id(&self, id: Uuid) -> Option<OrderSession> {
        self.lock().session_by_id(id).cloned()
    }

    pub fn sessions(&self) -> Vec<OrderSession> {
        self.lock().sessions().to_vec()
    }

    pub fn ordered_products(&self) -> Vec<OrderedProduct> {
        self.lock().products().to_vec()
    }

    pub fn ordered_products_by_status(
        &self,
        status: OrderedProductStatus,
    ) -> Vec<OrderedProduct> {
        self.lock().products_by_status(status)
    }

    /// Render a printable QR voucher for a session and write it to `path`.
    ///
    /// The QR encodes the public ordering URL for the session. Render and
    /// persist failures stay distinct so the UI can tell them apart.
    pub fn generate_session_voucher(&self, session: &OrderSession, path: &Path) -> Result<()> {
        let url = format!("{}/public?session_id={}", self.public_base_url, session.id);
        let bytes = self.voucher.render(
            &url,
            &session.id.to_string(),
            VOUCHER_PAGE_SIZE,
            VOUCHER_QR_SIZE,
        )?;
        std::fs::write(path, bytes).map_err(|e| Error::VoucherPersist(e.to_string()))
    }

    /// Connect to the feed and start applying inbound events.
    ///
    /// Idempotent: an existing listener is cancelled and replaced. Events
    /// are applied serially in arrival order. When the stream terminates the
    /// listener stops; the caller restarts by calling this again.
    pub async fn start_listening(&mut self) -> Result<()> {
        self.stop_listening();

        let mut events = self.feed.connect(&self.credentials).await?;
        let state = Arc::clone(&self.state);
        let revision = Arc::clone(&self.revision);

        self.listener = Some(tokio::spawn(async move {
            while let Some(item) = events.recv().await {
                match item {
                    Ok(event) => {
                        {
                            let mut state =
                                state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                            state.apply(&event);
                        }
                        revision.send_modify(|revision| *revision += 1);
                    }
                    Err(err) => {
                        warn!(%err, "order feed terminated; restart listening to reconnect");
                        break;
                    }
                }
            }
            info!("order feed listener stopped");
        }));
        Ok(())
    }

    /// Cancel the listener. Safe to call when not listening; application
    /// state is untouched.
    pub fn stop_listening(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }

    /// Ask the server to delete an ordered product.
    ///
    /// Fire-and-forget: local state changes only when the confirming
    /// `DELETE_ORDERED_PRODUCT_OK` event round-trips. Send failures are
    /// logged, not surfaced; the visible effect is simply that nothing
    /// happens.
    pub async fn request_ordered_product_deletion(&self, id: Uuid) {
        let message = OutgoingMessage::DeleteOrderedProduct { id };
        if let Err(err) = self.feed.send(&message).await {
            warn!(%err, %id, "failed to send ordered product deletion request");
        }
    }

    /// Ask the server to move an ordered product to a new status. Same
    /// fire-and-forget contract as deletion.
    pub async fn request_status_change(&self, id: Uuid, status: OrderedProductStatus) {
        let message = OutgoingMessage::UpdateOrderedProduct { id, status };
        if let Err(err) = self.feed.send(&message).await {
            warn!(%err, %id, "failed to send status change request");
        }
    }
}

impl<A, F, V> Drop for OrderStore<A, F, V> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}
