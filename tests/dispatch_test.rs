#[cfg(test)]
mod dispatch_tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use voyagent::acl::{ContentGraph, Envelope, EnvelopeProps, Performative, vocab};
    use voyagent::agent::{AgentIdentity, AgentRef};
    use voyagent::dispatch::{Action, ActionService, Dispatcher};
    use voyagent::error::Result;
    use voyagent::error::agent_error::AgentError;

    fn identity(name: &str) -> Arc<AgentIdentity> {
        Arc::new(AgentIdentity::new(AgentRef::new(
            name,
            format!("agn:{name}"),
            format!("http://{name}.test/comm"),
            format!("http://{name}.test/Stop"),
        )))
    }

    /// Serves SearchFlights, faults on SearchHotels, ignores the rest.
    struct ProbeService {
        identity: Arc<AgentIdentity>,
    }

    #[async_trait]
    impl ActionService for ProbeService {
        async fn handle_action(
            &self,
            action: Action,
            _request: &Envelope,
            props: &EnvelopeProps,
        ) -> Result<Option<Envelope>> {
            match action {
                Action::SearchFlights => Ok(Some(self.identity.message(
                    ContentGraph::new(),
                    Performative::Inform,
                    Some(&props.sender),
                    None,
                ))),
                Action::SearchHotels => {
                    Err(AgentError::ProviderError("backend unavailable".to_string()).into())
                }
                _ => Ok(None),
            }
        }
    }

    fn probe() -> Dispatcher<ProbeService> {
        let agent = identity("Probe");
        let service = Arc::new(ProbeService {
            identity: agent.clone(),
        });
        Dispatcher::new(agent, service)
    }

    fn request_with_action(client: &AgentIdentity, action_tag: &str) -> String {
        let mut graph = ContentGraph::new();
        graph.add("x", vocab::RDF_TYPE, action_tag);
        client
            .message(graph, Performative::Request, Some("agn:Probe"), Some("x"))
            .serialize()
            .unwrap()
    }

    #[tokio::test]
    async fn served_action_reaches_the_handler() {
        let dispatcher = probe();
        let client = identity("Client");

        let reply = dispatcher
            .dispatch(&request_with_action(&client, Action::SearchFlights.tag()))
            .await;
        let props = reply.properties().unwrap();

        assert_eq!(props.performative, Performative::Inform);
        assert_eq!(props.receiver.as_deref(), Some("agn:Client"));
    }

    #[tokio::test]
    async fn handler_fault_becomes_a_failure_reply() {
        let dispatcher = probe();
        let client = identity("Client");

        let reply = dispatcher
            .dispatch(&request_with_action(&client, Action::SearchHotels.tag()))
            .await;
        let props = reply.properties().unwrap();

        // The request was understood; the backing search failed.
        assert_eq!(props.performative, Performative::Failure);
        assert_eq!(props.receiver.as_deref(), Some("agn:Client"));
    }

    #[tokio::test]
    async fn recognized_but_unserved_action_is_not_understood() {
        let dispatcher = probe();
        let client = identity("Client");

        let reply = dispatcher
            .dispatch(&request_with_action(&client, Action::Register.tag()))
            .await;
        assert_eq!(
            reply.properties().unwrap().performative,
            Performative::NotUnderstood
        );
    }

    #[tokio::test]
    async fn request_without_an_action_is_not_understood() {
        let dispatcher = probe();
        let client = identity("Client");

        let raw = client
            .message(ContentGraph::new(), Performative::Request, Some("agn:Probe"), None)
            .serialize()
            .unwrap();
        let reply = dispatcher.dispatch(&raw).await;
        assert_eq!(
            reply.properties().unwrap().performative,
            Performative::NotUnderstood
        );
    }

    #[tokio::test]
    async fn every_branch_consumes_one_outbound_msg_id() {
        let dispatcher = probe();
        let client = identity("Client");

        dispatcher.dispatch("garbage").await;
        dispatcher
            .dispatch(&request_with_action(&client, Action::SearchFlights.tag()))
            .await;
        dispatcher
            .dispatch(&request_with_action(&client, Action::SearchHotels.tag()))
            .await;

        assert_eq!(dispatcher.identity().messages_sent(), 3);
    }
}
