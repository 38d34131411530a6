//! Lifecycle event choreography over the bus.
//!
//! Collaborators (UI, analytics) only ever see the engine through these
//! events; the tests pin down what they can rely on: one event per
//! decisive transition, topic filtering, and silence for duplicates.

#[cfg(test)]
mod tests {
    use accord_bus::{AgreementEvent, EventFilter, EventTopic};
    use accord_commit::PrepareVote;
    use accord_consensus::{SeededEntropy, Vote};
    use accord_engine::AgreementEngine;
    use accord_types::{GroupId, GroupParams, ParticipantId, UnitState};
    use futures::StreamExt;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio::time::timeout;
    use uuid::Uuid;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    fn engine() -> AgreementEngine {
        crate::init_tracing();
        AgreementEngine::with_entropy(Box::new(SeededEntropy::new(3)))
    }

    async fn finalize_one_block(eng: &AgreementEngine) {
        let net = GroupId::from("net");
        eng.create_group(net.clone(), GroupParams::consensus())
            .unwrap();
        eng.register_participant(&net, p("a"), 70).unwrap();
        eng.register_participant(&net, p("b"), 30).unwrap();
        let block = eng.propose_block(&net, vec![]).await.unwrap();
        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
    }

    #[tokio::test]
    async fn subscribers_receive_proposal_and_finalization_in_order() {
        let eng = engine();
        let mut sub = eng.events(EventFilter::all());

        finalize_one_block(&eng).await;

        let first = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(first, AgreementEvent::UnitProposed { .. }));

        let second = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        match second {
            AgreementEvent::UnitFinalized { unit, .. } => {
                assert_eq!(unit.state, UnitState::Finalized);
            }
            other => panic!("expected finalization, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn topic_filter_screens_out_other_protocols() {
        let eng = engine();
        let mut commit_sub = eng.events(EventFilter::topics(vec![EventTopic::Commit]));

        finalize_one_block(&eng).await;

        let cluster = GroupId::from("cluster");
        eng.create_group(cluster.clone(), GroupParams::commit())
            .unwrap();
        eng.register_participant(&cluster, p("p1"), 1).unwrap();
        let tx = eng
            .begin_transaction(&cluster, "acct".into(), 1, vec![], vec![p("p1")])
            .await
            .unwrap();
        eng.submit_prepare_vote(&tx.id, &p("p1"), PrepareVote::Yes)
            .await
            .unwrap();

        // The consensus events never reach this subscriber.
        let event = timeout(Duration::from_millis(100), commit_sub.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert!(matches!(event, AgreementEvent::UnitCommitted { .. }));
        assert!(commit_sub.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_submissions_produce_no_events() {
        let eng = engine();
        let net = GroupId::from("net");
        eng.create_group(net.clone(), GroupParams::consensus())
            .unwrap();
        eng.register_participant(&net, p("a"), 10).unwrap();
        eng.register_participant(&net, p("b"), 90).unwrap();
        let block = eng.propose_block(&net, vec![]).await.unwrap();

        let mut sub = eng.events(EventFilter::topics(vec![EventTopic::Consensus]));
        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();

        // Three submissions, zero decisive transitions, zero events.
        assert!(sub.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn correlation_ids_are_distinct_per_event() {
        let eng = engine();
        let mut sub = eng.events(EventFilter::all());

        finalize_one_block(&eng).await;

        let mut seen: HashSet<Uuid> = HashSet::new();
        while let Ok(Some(event)) = sub.try_recv() {
            let id = match event {
                AgreementEvent::UnitProposed { correlation_id, .. }
                | AgreementEvent::UnitFinalized { correlation_id, .. }
                | AgreementEvent::UnitRejected { correlation_id, .. }
                | AgreementEvent::UnitCommitted { correlation_id, .. }
                | AgreementEvent::UnitAborted { correlation_id, .. }
                | AgreementEvent::UnitExecuted { correlation_id, .. } => correlation_id,
            };
            assert!(seen.insert(id), "correlation id reused");
        }
        assert_eq!(seen.len(), 2);
    }

    #[tokio::test]
    async fn event_stream_supports_combinators() {
        let eng = engine();
        let stream = eng.event_stream(EventFilter::topics(vec![EventTopic::Consensus]));

        finalize_one_block(&eng).await;

        let events: Vec<AgreementEvent> = stream.take(2).collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], AgreementEvent::UnitFinalized { .. }));
    }

    #[tokio::test]
    async fn publish_count_tracks_decisive_transitions() {
        let eng = engine();
        assert_eq!(eng.events_published(), 0);

        finalize_one_block(&eng).await;

        // One proposal event plus one finalization event.
        assert_eq!(eng.events_published(), 2);
    }
}
