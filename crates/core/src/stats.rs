//! Sales statistics
//!
//! Aggregates confirmed bookings into totals and a per-day chart series for
//! the admin, host and guest dashboards.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::booking::Booking;
use crate::user::normalize_email;
use crate::Result;

/// Which bookings an aggregation covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    /// Every booking on the platform
    All,
    /// Bookings of rooms published by this host
    Host(String),
    /// Bookings made by this guest
    Guest(String),
}

impl StatsScope {
    pub fn normalized(&self) -> Result<Self> {
        Ok(match self {
            Self::All => Self::All,
            Self::Host(email) => Self::Host(normalize_email(email)?),
            Self::Guest(email) => Self::Guest(normalize_email(email)?),
        })
    }

    pub fn covers(&self, booking: &Booking) -> bool {
        match self {
            Self::All => true,
            Self::Host(email) => booking.host.email == *email,
            Self::Guest(email) => booking.guest.email == *email,
        }
    }
}

/// The projection of a booking that statistics need
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: DateTime<Utc>,
    pub price: f64,
}

impl From<&Booking> for SaleRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            date: booking.date,
            price: booking.price_paid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartValue {
    Text(String),
    Amount(f64),
}

/// One `[label, value]` pair of the chart series
pub type ChartRow = (String, ChartValue);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_price: f64,
    pub total_bookings: usize,
    pub chart_data: Vec<ChartRow>,
}

impl SalesSummary {
    /// Sum the records and build the chart series, headed by `["Day", "Sales"]`,
    /// in record order
    pub fn from_records(records: &[SaleRecord]) -> Self {
        let total_price = records.iter().map(|record| record.price).sum();

        let mut chart_data = Vec::with_capacity(records.len() + 1);
        chart_data.push(("Day".to_string(), ChartValue::Text("Sales".to_string())));
        chart_data.extend(
            records
                .iter()
                .map(|record| (day_label(record.date), ChartValue::Amount(record.price))),
        );

        Self {
            total_price,
            total_bookings: records.len(),
            chart_data,
        }
    }
}

/// `day/month` of a date in UTC, month counted from 1
pub fn day_label(date: DateTime<Utc>) -> String {
    format!("{}/{}", date.day(), date.month())
}
