use chrono::{TimeZone, Utc};

use crate::booking::GuestSnapshot;
use crate::room::{HostSnapshot, Room, RoomDetails};

pub fn sample_details(price: f64) -> RoomDetails {
    RoomDetails {
        title: "Lakeside cabin".to_string(),
        category: "Lake".to_string(),
        location: "Hallstatt".to_string(),
        price,
        guests: 4,
        bedrooms: 2,
        bathrooms: 1,
        description: "Quiet cabin by the water".to_string(),
        image: None,
        from: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2026, 6, 30, 0, 0, 0).unwrap(),
    }
}

pub fn sample_room(price: f64, host_email: &str) -> Room {
    Room::new(
        sample_details(price),
        HostSnapshot {
            name: Some("Hana".to_string()),
            email: host_email.to_string(),
            image: None,
        },
    )
}

pub fn sample_guest(email: &str) -> GuestSnapshot {
    GuestSnapshot {
        name: Some("Gus".to_string()),
        email: email.to_string(),
        image: None,
    }
}
