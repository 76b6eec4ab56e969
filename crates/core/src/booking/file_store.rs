//! File-based booking storage

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Booking, BookingStatus, SpentTransaction};
use super::repository::BookingRepository;
use crate::stats::{SaleRecord, StatsScope};
use crate::store::{DeleteResult, InsertOneResult, JsonCollection, UpdateResult};
use crate::user::normalize_email;
use crate::{Error, Result};

/// Booking collection persisted as JSON, with a ledger of spent
/// transactions kept next to it
pub struct FileBookingStore {
    bookings: JsonCollection<Booking>,
    spent: JsonCollection<SpentTransaction>,
}

impl FileBookingStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ledger = path.with_extension("transactions.json");
        Ok(Self {
            bookings: JsonCollection::open(path).await?,
            spent: JsonCollection::open(ledger).await?,
        })
    }
}

#[async_trait]
impl BookingRepository for FileBookingStore {
    async fn insert(&self, booking: Booking) -> Result<InsertOneResult> {
        let entry = SpentTransaction::for_booking(&booking);
        let entry_id = entry.id;
        let transaction_id = booking.transaction_id.clone();

        match self
            .spent
            .insert_one_unique(entry, |existing| existing.transaction_id == transaction_id)
            .await
        {
            Ok(_) => {}
            Err(Error::Conflict(_)) => {
                return Err(Error::Conflict(format!(
                    "Transaction {} was already used",
                    transaction_id
                )))
            }
            Err(err) => return Err(err),
        }

        match self
            .bookings
            .insert_one_unique(booking, |existing| existing.transaction_id == transaction_id)
            .await
        {
            Ok(result) => Ok(result),
            Err(err) => {
                self.spent.delete_one(|entry| entry.id == entry_id).await?;
                Err(err)
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.find_one(|booking| booking.id == id).await)
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .find_one(|booking| booking.transaction_id == transaction_id)
            .await)
    }

    async fn is_spent(&self, transaction_id: &str) -> Result<bool> {
        Ok(self
            .spent
            .count(|entry| entry.transaction_id == transaction_id)
            .await
            > 0)
    }

    async fn find_by_room(&self, room_id: Uuid) -> Result<Option<Booking>> {
        Ok(self.bookings.find_one(|booking| booking.room_id == room_id).await)
    }

    async fn list_by_guest(&self, email: &str) -> Result<Vec<Booking>> {
        let email = normalize_email(email)?;
        Ok(self
            .bookings
            .find(|booking| booking.guest.email == email)
            .await)
    }

    async fn list_by_host(&self, email: &str) -> Result<Vec<Booking>> {
        let email = normalize_email(email)?;
        Ok(self.bookings.find(|booking| booking.host.email == email).await)
    }

    async fn list_pending(&self) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .find(|booking| booking.status == BookingStatus::Pending)
            .await)
    }

    async fn confirm(&self, id: Uuid) -> Result<UpdateResult> {
        self.bookings
            .update_one(
                |booking| booking.id == id,
                |booking| booking.status = BookingStatus::Confirmed,
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<DeleteResult> {
        self.bookings.delete_one(|booking| booking.id == id).await
    }

    async fn release(&self, id: Uuid) -> Result<DeleteResult> {
        let result = self.bookings.delete_one(|booking| booking.id == id).await?;
        self.spent.delete_one(|entry| entry.booking_id == id).await?;
        Ok(result)
    }

    async fn sales(&self, scope: &StatsScope) -> Result<Vec<SaleRecord>> {
        let scope = scope.normalized()?;
        Ok(self
            .bookings
            .find(|booking| booking.is_confirmed() && scope.covers(booking))
            .await
            .iter()
            .map(SaleRecord::from)
            .collect())
    }
}
