use std::fmt;

use serde::{Deserialize, Serialize};

use crate::acl::{ContentGraph, vocab};

/// Slot of the day an activity is scheduled in. Every trip day carries one
/// activity per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySlot {
    Morning,
    Afternoon,
    Evening,
}

impl DaySlot {
    pub const ALL: [DaySlot; 3] = [DaySlot::Morning, DaySlot::Afternoon, DaySlot::Evening];

    pub fn as_tag(&self) -> &'static str {
        match self {
            DaySlot::Morning => "morning",
            DaySlot::Afternoon => "afternoon",
            DaySlot::Evening => "evening",
        }
    }

    pub fn from_tag(tag: &str) -> Option<DaySlot> {
        match tag {
            "morning" => Some(DaySlot::Morning),
            "afternoon" => Some(DaySlot::Afternoon),
            "evening" => Some(DaySlot::Evening),
            _ => None,
        }
    }
}

impl fmt::Display for DaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub id: String,
    pub name: String,
    pub address: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketOffer {
    pub id: String,
    pub departure: String,
    pub arrival: String,
    pub seat: String,
    pub class: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOffer {
    pub id: String,
    pub name: String,
    pub slot: DaySlot,
    pub day: u32,
}

/// Writes a hotel offer under the shared vocabulary; returns its subject.
pub fn add_hotel(graph: &mut ContentGraph, offer: &HotelOffer) -> String {
    let subject = format!("pln:hotel-{}", offer.id);
    graph.add(&subject, vocab::IS_A, vocab::HOTEL);
    graph.add(&subject, vocab::NAME, &offer.name);
    graph.add(&subject, vocab::ADDRESS, &offer.address);
    graph.add(&subject, vocab::PRICE, offer.price.to_string());
    subject
}

/// Writes a transport ticket under the shared vocabulary; returns its
/// subject.
pub fn add_ticket(graph: &mut ContentGraph, offer: &TicketOffer) -> String {
    let subject = format!("pln:ticket-{}", offer.id);
    graph.add(&subject, vocab::IS_A, vocab::TICKET);
    graph.add(&subject, vocab::NAME, &offer.id);
    graph.add(&subject, vocab::DEPARTURE, &offer.departure);
    graph.add(&subject, vocab::ARRIVAL, &offer.arrival);
    graph.add(&subject, vocab::SEAT, &offer.seat);
    graph.add(&subject, vocab::TRAVEL_CLASS, &offer.class);
    graph.add(&subject, vocab::PRICE, offer.price.to_string());
    subject
}

/// Writes one scheduled activity under the shared vocabulary; returns its
/// subject.
pub fn add_activity(graph: &mut ContentGraph, offer: &ActivityOffer) -> String {
    let subject = format!("pln:activity-{}", offer.id);
    graph.add(&subject, vocab::IS_A, vocab::ACTIVITY);
    graph.add(&subject, vocab::NAME, &offer.name);
    graph.add(&subject, vocab::SLOT, offer.slot.as_tag());
    graph.add(&subject, vocab::DAY, offer.day.to_string());
    subject
}

/// First hotel subject in the graph, as a typed offer. `None` covers both
/// "no hotel subject" and a subject with missing or malformed fields; the
/// caller decides what an absent offer means.
pub fn first_hotel(graph: &ContentGraph) -> Option<HotelOffer> {
    let subject = graph.subject_with(vocab::IS_A, vocab::HOTEL)?;
    Some(HotelOffer {
        id: subject.to_string(),
        name: graph.value_of(subject, vocab::NAME)?.to_string(),
        address: graph.value_of(subject, vocab::ADDRESS)?.to_string(),
        price: graph.value_of(subject, vocab::PRICE)?.parse().ok()?,
    })
}

/// First ticket subject in the graph, as a typed offer.
pub fn first_ticket(graph: &ContentGraph) -> Option<TicketOffer> {
    let subject = graph.subject_with(vocab::IS_A, vocab::TICKET)?;
    Some(TicketOffer {
        id: graph.value_of(subject, vocab::NAME)?.to_string(),
        departure: graph.value_of(subject, vocab::DEPARTURE)?.to_string(),
        arrival: graph.value_of(subject, vocab::ARRIVAL)?.to_string(),
        seat: graph.value_of(subject, vocab::SEAT)?.to_string(),
        class: graph.value_of(subject, vocab::TRAVEL_CLASS)?.to_string(),
        price: graph.value_of(subject, vocab::PRICE)?.parse().ok()?,
    })
}

/// Every well-formed activity subject in the graph, in insertion order.
/// Malformed subjects are skipped rather than failing the whole list.
pub fn activities(graph: &ContentGraph) -> Vec<ActivityOffer> {
    graph
        .subjects_with(vocab::IS_A, vocab::ACTIVITY)
        .into_iter()
        .filter_map(|subject| {
            Some(ActivityOffer {
                id: subject.to_string(),
                name: graph.value_of(subject, vocab::NAME)?.to_string(),
                slot: DaySlot::from_tag(graph.value_of(subject, vocab::SLOT)?)?,
                day: graph.value_of(subject, vocab::DAY)?.parse().ok()?,
            })
        })
        .collect()
}
