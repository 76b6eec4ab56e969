//! Application state

use std::sync::Arc;

use stay_core::booking::{BookingRepository, FileBookingStore};
use stay_core::checkout::Checkout;
use stay_core::notify::{Notifier, SmtpMailer};
use stay_core::payment::{PaymentGateway, StripeGateway, UnconfiguredGateway};
use stay_core::room::{FileRoomStore, RoomRepository};
use stay_core::user::{FileUserStore, UserRepository};
use tracing::{info, warn};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    users: Arc<dyn UserRepository>,
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Notifier,
}

impl AppState {
    /// Open the stores under the configured data directory and pick the
    /// payment gateway and mailer the configuration allows
    pub async fn new(config: Config) -> stay_core::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir).await?;
        info!("Using data directory: {:?}", config.data_dir);

        let users = Arc::new(FileUserStore::new(config.data_dir.join("users.json")).await?);
        let rooms = Arc::new(FileRoomStore::new(config.data_dir.join("rooms.json")).await?);
        let bookings =
            Arc::new(FileBookingStore::new(config.data_dir.join("bookings.json")).await?);

        let payments: Arc<dyn PaymentGateway> = match config.stripe_secret_key.as_deref() {
            Some(key) => Arc::new(StripeGateway::new(key, config.stripe_api_base.as_str())),
            None => {
                warn!("STRIPE_SECRET_KEY not set, payment routes will fail");
                Arc::new(UnconfiguredGateway)
            }
        };

        let notifier = match &config.smtp {
            Some(smtp) => Notifier::new(Arc::new(SmtpMailer::new(
                &smtp.host,
                smtp.port,
                smtp.username.clone(),
                smtp.password.clone(),
            )?)),
            None => Notifier::log_only(),
        };

        Ok(Self::with_services(
            config, users, rooms, bookings, payments, notifier,
        ))
    }

    /// Assemble state from already built services
    pub fn with_services(
        config: Config,
        users: Arc<dyn UserRepository>,
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Notifier,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                users,
                rooms,
                bookings,
                payments,
                notifier,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn users(&self) -> &dyn UserRepository {
        self.inner.users.as_ref()
    }

    pub fn rooms(&self) -> &dyn RoomRepository {
        self.inner.rooms.as_ref()
    }

    pub fn bookings(&self) -> &dyn BookingRepository {
        self.inner.bookings.as_ref()
    }

    pub fn payments(&self) -> &dyn PaymentGateway {
        self.inner.payments.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Checkout saga over this state's stores and gateway
    pub fn checkout(&self) -> Checkout<'_> {
        Checkout::new(self.rooms(), self.bookings(), self.payments())
    }
}
