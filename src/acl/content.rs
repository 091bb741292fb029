use serde::{Deserialize, Serialize};

/// Predicate and tag vocabulary shared by every agent. Prefixes mirror the
/// namespaces of the wire ontology: `acl:` for envelope fields, `dso:` for
/// the directory service, `iaa:`/`pln:` for information-agent actions and
/// plan content.
pub mod vocab {
    pub const RDF_TYPE: &str = "rdf:type";

    // Envelope fields, attached to the message node.
    pub const ACL_MESSAGE: &str = "acl:FipaAclMessage";
    pub const PERFORMATIVE: &str = "acl:performative";
    pub const SENDER: &str = "acl:sender";
    pub const RECEIVER: &str = "acl:receiver";
    pub const MSG_ID: &str = "acl:message-id";
    pub const CONTENT: &str = "acl:content";

    // Directory service fields.
    pub const AGENT_URI: &str = "dso:Uri";
    pub const AGENT_ADDRESS: &str = "dso:Address";
    pub const AGENT_TYPE: &str = "dso:AgentType";
    pub const AGENT_NAME: &str = "foaf:name";

    // Search criteria, passed as an opaque bag from the coordinator down to
    // the information adapters.
    pub const ORIGIN_CITY: &str = "pln:originCity";
    pub const DESTINATION_CITY: &str = "pln:destinationCity";
    pub const DEPARTURE_DATE: &str = "pln:departureDate";
    pub const COMEBACK_DATE: &str = "pln:comebackDate";
    pub const BUDGET: &str = "pln:budget";
    pub const HOTEL_BUDGET: &str = "pln:hotelBudget";
    pub const RATINGS: &str = "pln:ratings";
    pub const ROOM_QUANTITY: &str = "pln:roomQuantity";
    pub const ADULTS: &str = "pln:adults";
    pub const RADIUS: &str = "pln:radius";

    // Offer subjects and their fields.
    pub const IS_A: &str = "pln:isA";
    pub const HOTEL: &str = "pln:Hotel";
    pub const TICKET: &str = "pln:Ticket";
    pub const ACTIVITY: &str = "pln:Activity";
    pub const NAME: &str = "pln:name";
    pub const ADDRESS: &str = "pln:address";
    pub const PRICE: &str = "pln:price";
    pub const DEPARTURE: &str = "pln:departure";
    pub const ARRIVAL: &str = "pln:arrival";
    pub const SEAT: &str = "pln:seat";
    pub const TRAVEL_CLASS: &str = "pln:class";
    pub const SLOT: &str = "pln:slot";
    pub const DAY: &str = "pln:day";
}

/// One (subject, predicate, value) statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub value: String,
}

/// Ordered triple store carried as message content.
///
/// The JSON wire form is a plain array of triples, which keeps the
/// subject/predicate/value addressing scheme: a statement means "this field
/// belongs to this subject". All values are strings; typed consumers parse
/// at their own boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentGraph {
    triples: Vec<Triple>,
}

impl ContentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.triples.push(Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            value: value.into(),
        });
    }

    /// Value of the first statement matching (subject, predicate), if any.
    pub fn value_of(&self, subject: &str, predicate: &str) -> Option<&str> {
        self.triples
            .iter()
            .find(|t| t.subject == subject && t.predicate == predicate)
            .map(|t| t.value.as_str())
    }

    /// First subject carrying the statement (_, predicate, value), if any.
    pub fn subject_with(&self, predicate: &str, value: &str) -> Option<&str> {
        self.triples
            .iter()
            .find(|t| t.predicate == predicate && t.value == value)
            .map(|t| t.subject.as_str())
    }

    /// All distinct subjects carrying (_, predicate, value), in insertion
    /// order.
    pub fn subjects_with(&self, predicate: &str, value: &str) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for t in &self.triples {
            if t.predicate == predicate && t.value == value && !subjects.contains(&t.subject.as_str())
            {
                subjects.push(t.subject.as_str());
            }
        }
        subjects
    }

    /// Copies every property of `subject` (except its `rdf:type` tag) onto
    /// `new_subject` in `target`. Used to forward a criteria bag unmodified
    /// under a fresh action subject.
    pub fn copy_properties(&self, subject: &str, target: &mut ContentGraph, new_subject: &str) {
        for t in &self.triples {
            if t.subject == subject && t.predicate != vocab::RDF_TYPE {
                target.add(new_subject, t.predicate.clone(), t.value.clone());
            }
        }
    }

    pub fn merge(&mut self, other: &ContentGraph) {
        self.triples.extend(other.triples.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
