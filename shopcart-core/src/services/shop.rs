//! Shop service - the single owner of cart, session and filter state
//!
//! Every user action goes through this service. Derived views (visible
//! products, totals) are recomputed on demand. Side effects happen at fixed
//! points: rehydration in [`ShopService::open`], a storage write at the end of
//! every operation that changed the cart, and event-log records on session
//! transitions and when the cart runs empty.

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{
    compute_total, compute_visible, CartState, Catalog, CatalogItem, CategoryFilter, FilterState,
    Session, SessionTransition,
};
use crate::ports::Confirmation;
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::persistence::{LoadOutcome, PersistenceService};

/// Question asked before taking payment
pub const CHECKOUT_PROMPT: &str = "Do you want to proceed to payment?";

/// What a checkout attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to pay for; no prompt was shown
    EmptyCart,
    /// The user declined; the cart is untouched
    Cancelled,
    /// Paid; the cart has been cleared
    Completed { total: Decimal, item_count: u64 },
}

impl CheckoutOutcome {
    /// Message for the user
    pub fn message(&self) -> &'static str {
        match self {
            CheckoutOutcome::EmptyCart => "Your cart is empty.",
            CheckoutOutcome::Cancelled => "Checkout cancelled.",
            CheckoutOutcome::Completed { .. } => "Payment successful! Thank you for your purchase.",
        }
    }
}

/// Shop service owning all mutable state
pub struct ShopService {
    catalog: Catalog,
    cart: CartState,
    session: Session,
    filter: FilterState,
    persistence: PersistenceService,
    logger: Option<LoggingService>,
    load_outcome: LoadOutcome,
}

impl ShopService {
    /// Rehydrate the cart from storage and write it straight back
    ///
    /// Never fails: unusable stored data starts an empty cart, and a failed
    /// write-back is recorded in the event log and retried on the next change.
    pub fn open(
        catalog: Catalog,
        persistence: PersistenceService,
        logger: Option<LoggingService>,
    ) -> Self {
        let loaded = persistence.load();

        let service = Self {
            catalog,
            cart: loaded.cart,
            session: Session::new(),
            filter: FilterState::default(),
            persistence,
            logger,
            load_outcome: loaded.outcome.clone(),
        };

        match &loaded.outcome {
            LoadOutcome::Missing => {}
            LoadOutcome::Restored { lines } => service.record(
                LogEvent::new("cart_rehydrated").with_detail(format!("{} line(s)", lines)),
            ),
            LoadOutcome::Discarded { reason } => service.record(
                LogEvent::new("stored_cart_discarded")
                    .with_error(reason.clone())
                    .with_detail(format!("key={}", service.persistence.key())),
            ),
        }

        if let Err(e) = service.persistence.save(&service.cart) {
            service.record(LogEvent::new("cart_write_failed").with_error(e.to_string()));
        }

        service
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// How the startup read of the stored cart went
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Catalog items matching the current filter
    pub fn visible_products(&self) -> Vec<&CatalogItem> {
        compute_visible(&self.catalog, &self.filter)
    }

    /// Current cart total
    pub fn total(&self) -> Decimal {
        compute_total(&self.cart)
    }

    // === Cart ===

    /// Add one unit of `name` at `price`
    ///
    /// A negative price is rejected and the cart is left alone; stored carts
    /// never hold one.
    pub fn add_item(&mut self, name: &str, price: Decimal) -> Result<()> {
        if price < Decimal::ZERO {
            return Err(Error::validation(format!(
                "price of '{}' cannot be negative ({})",
                name, price
            )));
        }
        let was_empty = self.cart.is_empty();
        let changed = self.cart.add_item(name, price);
        self.commit(was_empty, changed)
    }

    /// Add one unit of a catalog product, looked up by name
    ///
    /// Returns the matched product name, or `None` if the catalog has no
    /// such product (the cart is left alone).
    pub fn add_product(&mut self, name: &str) -> Result<Option<String>> {
        let Some(item) = self.catalog.find(name).cloned() else {
            return Ok(None);
        };
        self.add_item(&item.name, item.price)?;
        Ok(Some(item.name))
    }

    /// Shift the quantity of `name` by `delta`; returns whether anything changed
    pub fn change_quantity(&mut self, name: &str, delta: i64) -> Result<bool> {
        let was_empty = self.cart.is_empty();
        let changed = self.cart.change_quantity(name, delta);
        self.commit(was_empty, changed)?;
        Ok(changed)
    }

    pub fn increment(&mut self, name: &str) -> Result<bool> {
        self.change_quantity(name, 1)
    }

    pub fn decrement(&mut self, name: &str) -> Result<bool> {
        self.change_quantity(name, -1)
    }

    /// Remove the line for `name`; returns whether it existed
    pub fn remove_item(&mut self, name: &str) -> Result<bool> {
        let was_empty = self.cart.is_empty();
        let changed = self.cart.remove_item(name);
        self.commit(was_empty, changed)?;
        Ok(changed)
    }

    /// Empty the cart; returns whether it had anything in it
    pub fn clear(&mut self) -> Result<bool> {
        let was_empty = self.cart.is_empty();
        let changed = self.cart.clear();
        self.commit(was_empty, changed)?;
        Ok(changed)
    }

    // === Checkout ===

    /// Pay for the cart after asking for confirmation
    pub fn checkout(&mut self, confirmation: &dyn Confirmation) -> Result<CheckoutOutcome> {
        if self.cart.is_empty() {
            return Ok(CheckoutOutcome::EmptyCart);
        }

        if !confirmation.confirm(CHECKOUT_PROMPT)? {
            return Ok(CheckoutOutcome::Cancelled);
        }

        let total = self.total();
        let item_count = self.cart.item_count();
        self.clear()?;

        let mut event = LogEvent::new("checkout_completed")
            .with_detail(format!("{} item(s), total {}", item_count, total.normalize()));
        if let Some(user) = self.session.user() {
            event = event.with_username(user);
        }
        self.record(event);

        Ok(CheckoutOutcome::Completed { total, item_count })
    }

    // === Session ===

    /// Log in as `username`; blank names are ignored
    pub fn login(&mut self, username: &str) -> SessionTransition {
        let transition = self.session.login(username);
        if transition == SessionTransition::LoggedIn {
            self.record(LogEvent::new("user_logged_in").with_username(&self.session.username));
        }
        transition
    }

    /// Log out, resetting the product filter; the cart is kept
    pub fn logout(&mut self) -> SessionTransition {
        let username = self.session.username.clone();
        let transition = self.session.logout();
        if transition == SessionTransition::LoggedOut {
            self.filter.reset();
            self.record(LogEvent::new("user_logged_out").with_username(username));
        }
        transition
    }

    // === Filter ===

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    /// Persist after a cart operation and note the cart running empty
    fn commit(&self, was_empty: bool, changed: bool) -> Result<()> {
        if !changed {
            return Ok(());
        }

        if !was_empty && self.cart.is_empty() {
            let mut event = LogEvent::new("cart_emptied");
            if let Some(user) = self.session.user() {
                event = event.with_username(user);
            }
            self.record(event);
        }

        self.persistence.save(&self.cart)
    }

    /// Write to the event log, ignoring failures (logging never breaks the cart)
    fn record(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }
}
