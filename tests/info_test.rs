#[cfg(test)]
mod info_tests {
    use std::sync::Arc;

    use voyagent::acl::{ContentGraph, Performative, vocab};
    use voyagent::agent::{AgentIdentity, AgentRef};
    use voyagent::dispatch::{Action, Dispatcher};
    use voyagent::info::offers::{self, DaySlot};
    use voyagent::info::{InfoService, StaticCatalog};

    fn identity(name: &str) -> Arc<AgentIdentity> {
        Arc::new(AgentIdentity::new(AgentRef::new(
            name,
            format!("agn:{name}"),
            format!("http://{name}.test/comm"),
            format!("http://{name}.test/Stop"),
        )))
    }

    fn info_agent() -> Dispatcher<InfoService> {
        let agent = identity("InfoAgent");
        let service = Arc::new(InfoService::new(agent.clone(), Arc::new(StaticCatalog::new())));
        Dispatcher::new(agent, service)
    }

    fn hotel_search(client: &AgentIdentity, city: &str) -> String {
        let subject = "Manager-InfoSearch";
        let mut graph = ContentGraph::new();
        graph.add(subject, vocab::RDF_TYPE, Action::SearchHotels.tag());
        graph.add(subject, vocab::DESTINATION_CITY, city);
        graph.add(subject, vocab::DEPARTURE_DATE, "2026-09-14");
        graph.add(subject, vocab::COMEBACK_DATE, "2026-09-17");
        graph.add(subject, vocab::HOTEL_BUDGET, "600");
        graph.add(subject, vocab::RATINGS, "3");
        graph.add(subject, vocab::ROOM_QUANTITY, "1");
        graph.add(subject, vocab::ADULTS, "2");
        graph.add(subject, vocab::RADIUS, "15");
        client
            .message(graph, Performative::Request, Some("agn:InfoAgent"), Some(subject))
            .serialize()
            .unwrap()
    }

    fn flight_search(client: &AgentIdentity, origin: &str, destination: &str, budget: &str) -> String {
        let subject = "Manager-InfoSearch";
        let mut graph = ContentGraph::new();
        graph.add(subject, vocab::RDF_TYPE, Action::SearchFlights.tag());
        graph.add(subject, vocab::ORIGIN_CITY, origin);
        graph.add(subject, vocab::DESTINATION_CITY, destination);
        graph.add(subject, vocab::DEPARTURE_DATE, "2026-09-14");
        graph.add(subject, vocab::COMEBACK_DATE, "2026-09-17");
        graph.add(subject, vocab::BUDGET, budget);
        client
            .message(graph, Performative::Request, Some("agn:InfoAgent"), Some(subject))
            .serialize()
            .unwrap()
    }

    fn activity_search(client: &AgentIdentity, city: &str, from: &str, to: &str) -> String {
        let subject = "Manager-InfoSearch";
        let mut graph = ContentGraph::new();
        graph.add(subject, vocab::RDF_TYPE, Action::SearchActivities.tag());
        graph.add(subject, vocab::DESTINATION_CITY, city);
        graph.add(subject, vocab::DEPARTURE_DATE, from);
        graph.add(subject, vocab::COMEBACK_DATE, to);
        graph.add(subject, vocab::RADIUS, "15");
        client
            .message(graph, Performative::Request, Some("agn:InfoAgent"), Some(subject))
            .serialize()
            .unwrap()
    }

    #[tokio::test]
    async fn hotel_search_takes_the_first_offer_the_provider_returns() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        let reply = dispatcher.dispatch(&hotel_search(&client, "Barcelona")).await;
        let props = reply.properties().unwrap();

        assert_eq!(props.performative, Performative::Inform);
        let hotel = offers::first_hotel(reply.graph()).unwrap();
        assert_eq!(hotel.name, "Hotel Miramar");
        // Three nights at the catalog rate.
        assert_eq!(hotel.price, 420.0);
    }

    #[tokio::test]
    async fn unmapped_city_is_a_failure_not_a_crash() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        let reply = dispatcher.dispatch(&hotel_search(&client, "Atlantis")).await;
        let props = reply.properties().unwrap();

        // Understood, but the city-code lookup failed.
        assert_eq!(props.performative, Performative::Failure);
        assert_eq!(props.receiver.as_deref(), Some("agn:Manager"));
    }

    #[tokio::test]
    async fn malformed_numeric_field_is_a_failure() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        let subject = "Manager-InfoSearch";
        let mut graph = ContentGraph::new();
        graph.add(subject, vocab::RDF_TYPE, Action::SearchHotels.tag());
        graph.add(subject, vocab::DESTINATION_CITY, "Barcelona");
        graph.add(subject, vocab::DEPARTURE_DATE, "2026-09-14");
        graph.add(subject, vocab::COMEBACK_DATE, "2026-09-17");
        graph.add(subject, vocab::HOTEL_BUDGET, "600");
        graph.add(subject, vocab::RATINGS, "three stars");
        graph.add(subject, vocab::ROOM_QUANTITY, "1");
        graph.add(subject, vocab::ADULTS, "2");
        graph.add(subject, vocab::RADIUS, "15");
        let raw = client
            .message(graph, Performative::Request, Some("agn:InfoAgent"), Some(subject))
            .serialize()
            .unwrap();

        let reply = dispatcher.dispatch(&raw).await;
        assert_eq!(reply.properties().unwrap().performative, Performative::Failure);
    }

    #[tokio::test]
    async fn flight_search_returns_the_first_matching_route() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        let reply = dispatcher
            .dispatch(&flight_search(&client, "Paris", "Barcelona", "250"))
            .await;
        let ticket = offers::first_ticket(reply.graph()).unwrap();

        assert_eq!(ticket.id, "VY8013");
        assert_eq!(ticket.departure, "2026-09-14T08:25");
        assert_eq!(ticket.class, "economy");
    }

    #[tokio::test]
    async fn route_with_no_offers_is_an_empty_inform() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        // Amsterdam to Rome is not in the catalog.
        let reply = dispatcher
            .dispatch(&flight_search(&client, "Amsterdam", "Rome", "250"))
            .await;
        let props = reply.properties().unwrap();

        assert_eq!(props.performative, Performative::Inform);
        assert!(props.content.is_none());
        assert!(offers::first_ticket(reply.graph()).is_none());
    }

    #[tokio::test]
    async fn activities_fill_the_slot_triad_for_every_trip_day() {
        let dispatcher = info_agent();
        let client = identity("Manager");

        // Two trip days.
        let reply = dispatcher
            .dispatch(&activity_search(&client, "Barcelona", "2026-09-14", "2026-09-16"))
            .await;
        let schedule = offers::activities(reply.graph());

        assert_eq!(schedule.len(), 6);
        for day in 1..=2 {
            let slots: Vec<DaySlot> = schedule
                .iter()
                .filter(|a| a.day == day)
                .map(|a| a.slot)
                .collect();
            assert_eq!(slots, DaySlot::ALL.to_vec());
        }
        // The catalog's own ordering decides what lands where.
        assert_eq!(schedule[0].name, "Sagrada Família guided tour");
    }
}
