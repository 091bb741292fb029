use async_trait::async_trait;

use crate::error::Result;
use crate::info::offers::{HotelOffer, TicketOffer};
use crate::info::{ActivityListing, ActivityQuery, FlightQuery, HotelQuery, TravelDataProvider};

/// Deterministic in-memory stand-in for the external travel-data providers.
/// Used by the demo binary and the tests; a production deployment swaps in
/// a provider that talks to the real search APIs behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

// (name, address, stars, price per night)
fn hotels_in(city_code: &str) -> &'static [(&'static str, &'static str, u8, f64)] {
    match city_code {
        "BCN" => &[
            ("Hotel Miramar", "Passeig de Colom 22, Barcelona, 08002", 4, 140.0),
            ("Casa Camper", "Carrer d'Elisabets 11, Barcelona, 08001", 3, 98.0),
            ("Gran Via Palace", "Gran Via 642, Barcelona, 08007", 5, 245.0),
        ],
        "PAR" => &[
            ("Hôtel du Louvre", "Place André Malraux, Paris, 75001", 5, 310.0),
            ("Le Marais Inn", "Rue des Archives 18, Paris, 75004", 3, 120.0),
        ],
        "AMS" => &[
            ("Canal House", "Keizersgracht 148, Amsterdam, 1015 CX", 4, 180.0),
        ],
        "LHR" => &[
            ("The Strand Palace", "Strand 372, London, WC2R 0JJ", 4, 165.0),
            ("Camden Lock Hotel", "Chalk Farm Road 89, London, NW1 8AN", 3, 88.0),
        ],
        "FCO" => &[
            ("Albergo del Senato", "Piazza della Rotonda 73, Roma, 00186", 4, 195.0),
        ],
        _ => &[],
    }
}

fn activities_in(city_code: &str) -> &'static [(&'static str, &'static str)] {
    match city_code {
        "BCN" => &[
            ("ACT-BCN-1", "Sagrada Família guided tour"),
            ("ACT-BCN-2", "Gothic Quarter walking tour"),
            ("ACT-BCN-3", "Picasso Museum"),
            ("ACT-BCN-4", "Camp Nou experience"),
            ("ACT-BCN-5", "Tibidabo funicular"),
        ],
        "PAR" => &[
            ("ACT-PAR-1", "Louvre skip-the-line visit"),
            ("ACT-PAR-2", "Seine evening cruise"),
            ("ACT-PAR-3", "Montmartre food walk"),
        ],
        "LHR" => &[
            ("ACT-LON-1", "Tower of London tour"),
            ("ACT-LON-2", "West End show"),
        ],
        _ => &[],
    }
}

// (origin, destination, flight number, departure time, arrival time, seat, price)
const FLIGHTS: &[(&str, &str, &str, &str, &str, &str, f64)] = &[
    ("PAR", "BCN", "VY8013", "08:25", "10:05", "14C", 96.0),
    ("BCN", "PAR", "VY8012", "18:40", "20:20", "21A", 104.0),
    ("LHR", "BCN", "BA478", "07:50", "11:05", "09F", 132.0),
    ("BCN", "LHR", "BA479", "12:10", "13:35", "17D", 127.0),
    ("AMS", "BCN", "KL1673", "09:35", "11:45", "11B", 118.0),
];

#[async_trait]
impl TravelDataProvider for StaticCatalog {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>> {
        let nights = (query.check_out - query.check_in).num_days().max(1) as f64;
        let offers = hotels_in(&query.city_code)
            .iter()
            .enumerate()
            .filter(|(_, (_, _, stars, price))| {
                *stars >= query.ratings && price * nights <= query.budget
            })
            .map(|(i, (name, address, _, price))| HotelOffer {
                id: format!("{}-H{}", query.city_code, i + 1),
                name: (*name).to_string(),
                address: (*address).to_string(),
                price: price * nights,
            })
            .collect();
        Ok(offers)
    }

    async fn search_activities(&self, query: &ActivityQuery) -> Result<Vec<ActivityListing>> {
        let listings = activities_in(&query.city_code)
            .iter()
            .map(|(id, name)| ActivityListing {
                id: (*id).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        Ok(listings)
    }

    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<TicketOffer>> {
        let offers = FLIGHTS
            .iter()
            .filter(|(origin, destination, _, _, _, _, price)| {
                *origin == query.origin_code
                    && *destination == query.destination_code
                    && *price <= query.budget
            })
            .map(|(_, _, number, departs, arrives, seat, price)| TicketOffer {
                id: (*number).to_string(),
                departure: format!("{}T{}", query.departure, departs),
                arrival: format!("{}T{}", query.departure, arrives),
                seat: (*seat).to_string(),
                class: "economy".to_string(),
                price: *price,
            })
            .collect();
        Ok(offers)
    }
}
