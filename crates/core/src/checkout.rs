//! Checkout saga
//!
//! Turns a settled payment into a confirmed booking in three local steps:
//! record a pending booking, reserve the room with a conditional update, then
//! confirm the booking. When the room cannot be reserved the pending booking
//! is removed again. Pending bookings left behind by a crash are picked up by
//! [`Checkout::reconcile`].

use tracing::{info, warn};

use crate::booking::{Booking, BookingRepository, BookingStatus, NewBooking};
use crate::payment::PaymentGateway;
use crate::room::{Reservation, RoomRepository};
use crate::{Error, Result};

/// A booking produced by [`Checkout::commit`]
#[derive(Debug, Clone)]
pub struct Committed {
    pub booking: Booking,
    /// The transaction had already been committed by an earlier call
    pub replayed: bool,
}

pub struct Checkout<'a> {
    rooms: &'a dyn RoomRepository,
    bookings: &'a dyn BookingRepository,
    payments: &'a dyn PaymentGateway,
}

impl<'a> Checkout<'a> {
    pub fn new(
        rooms: &'a dyn RoomRepository,
        bookings: &'a dyn BookingRepository,
        payments: &'a dyn PaymentGateway,
    ) -> Self {
        Self {
            rooms,
            bookings,
            payments,
        }
    }

    /// Record the booking for a payment the client has confirmed.
    ///
    /// Calling this again with the same transaction id returns the existing
    /// booking, resuming it first if it is still pending.
    /// A transaction whose booking was cancelled is refused as a conflict.
    pub async fn commit(&self, request: NewBooking) -> Result<Committed> {
        if let Some(existing) = self
            .bookings
            .find_by_transaction(&request.transaction_id)
            .await?
        {
            if existing.is_confirmed() {
                return Ok(Committed {
                    booking: existing,
                    replayed: true,
                });
            }
            let booking = self.finish(existing).await?;
            return Ok(Committed {
                booking,
                replayed: false,
            });
        }

        if self.bookings.is_spent(&request.transaction_id).await? {
            return Err(Error::Conflict(format!(
                "Transaction {} was already used",
                request.transaction_id
            )));
        }

        let intent = match self.payments.retrieve_intent(&request.transaction_id).await {
            Ok(intent) => intent,
            Err(Error::NotFound(_)) => {
                return Err(Error::PaymentNotSettled(format!(
                    "Unknown payment intent {}",
                    request.transaction_id
                )))
            }
            Err(err) => return Err(err),
        };
        if !intent.is_settled() {
            return Err(Error::PaymentNotSettled(format!(
                "Payment intent {} has status {:?}",
                intent.id, intent.status
            )));
        }

        let room = self
            .rooms
            .get(request.room_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Room {} not found", request.room_id)))?;

        let due = room.details.price_in_minor_units();
        if intent.amount < due {
            return Err(Error::PaymentNotSettled(format!(
                "Payment intent {} covers {} but the room costs {}",
                intent.id, intent.amount, due
            )));
        }

        let booking = Booking::pending(
            &room,
            request.guest,
            request.transaction_id,
            intent.amount as f64 / 100.0,
        );
        self.bookings.insert(booking.clone()).await?;

        let booking = self.finish(booking).await?;
        Ok(Committed {
            booking,
            replayed: false,
        })
    }

    /// Reserve the room for a pending booking and confirm it, or remove the
    /// booking when the room is gone or taken
    async fn finish(&self, mut booking: Booking) -> Result<Booking> {
        let reservation = self.rooms.reserve(booking.room_id, booking.id).await?;
        if reservation != Reservation::Reserved {
            warn!(
                transaction_id = %booking.transaction_id,
                room_id = %booking.room_id,
                "Room unavailable after payment ({:?}), dropping pending booking",
                reservation
            );
            self.bookings.release(booking.id).await?;
            return Err(Error::Conflict(format!(
                "Room {} is no longer available",
                booking.room_id
            )));
        }

        self.bookings.confirm(booking.id).await?;
        booking.status = BookingStatus::Confirmed;
        info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            "Booking confirmed"
        );
        Ok(booking)
    }

    /// Resume every pending booking; returns how many were confirmed
    pub async fn reconcile(&self) -> Result<usize> {
        let mut confirmed = 0;
        for booking in self.bookings.list_pending().await? {
            let id = booking.id;
            match self.finish(booking).await {
                Ok(_) => confirmed += 1,
                Err(Error::Conflict(_)) => {}
                Err(err) => warn!(booking_id = %id, "Failed to reconcile booking: {}", err),
            }
        }
        Ok(confirmed)
    }
}
