//! End-to-end protocol scenarios driven through the engine facade.
//!
//! Each test constructs its own engine; nothing is shared between tests
//! and nothing is global.

#[cfg(test)]
mod tests {
    use accord_commit::{AbortReason, Decision, PrepareOutcome, PrepareVote};
    use accord_consensus::{SeededEntropy, Vote, VoteOutcome};
    use accord_engine::{AgreementEngine, EngineError};
    use accord_multisig::SignOutcome;
    use accord_registry::RegistryError;
    use accord_types::{GroupId, GroupParams, ParticipantId, UnitKind, UnitState, Weight};

    fn engine() -> AgreementEngine {
        crate::init_tracing();
        AgreementEngine::with_entropy(Box::new(SeededEntropy::new(42)))
    }

    fn p(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    fn consensus_net(eng: &AgreementEngine, members: &[(&str, Weight)]) -> GroupId {
        let group = GroupId::from("net");
        eng.create_group(group.clone(), GroupParams::consensus())
            .unwrap();
        for (id, weight) in members {
            eng.register_participant(&group, p(id), *weight).unwrap();
        }
        group
    }

    // -------------------------------------------------------------------------
    // Consensus: weight-quorum finality
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn block_finalizes_when_yes_weight_reaches_two_thirds() {
        let eng = engine();
        let net = consensus_net(&eng, &[("a", 60), ("b", 25), ("c", 15)]);

        let block = eng.propose_block(&net, b"block-1".to_vec()).await.unwrap();
        assert_eq!(block.state, UnitState::Proposed);

        // 60 of 100: short of the 67 quorum.
        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        let (record, _) = eng.get_block(&block.id).await.unwrap();
        assert_eq!(record.state, UnitState::Proposed);

        // 85 of 100: quorum reached, finalized.
        let outcome = eng.cast_vote(&block.id, &p("b"), Vote::Yes).await.unwrap();
        assert!(matches!(outcome, VoteOutcome::Finalized { tally } if tally.yes == 85));
        let (record, ballots) = eng.get_block(&block.id).await.unwrap();
        assert_eq!(record.state, UnitState::Finalized);
        assert_eq!(ballots.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_vote_weight_counts_once() {
        let eng = engine();
        let net = consensus_net(&eng, &[("a", 60), ("b", 25), ("c", 15)]);
        let block = eng.propose_block(&net, vec![]).await.unwrap();

        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        let outcome = eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        assert_eq!(outcome, VoteOutcome::Duplicate);

        // 60, not 120: still short of quorum.
        let (record, ballots) = eng.get_block(&block.id).await.unwrap();
        assert_eq!(record.state, UnitState::Proposed);
        assert_eq!(ballots.len(), 1);
    }

    #[tokio::test]
    async fn finalized_block_never_reverts() {
        let eng = engine();
        let net = consensus_net(&eng, &[("a", 70), ("b", 30)]);
        let block = eng.propose_block(&net, vec![]).await.unwrap();

        eng.cast_vote(&block.id, &p("a"), Vote::Yes).await.unwrap();
        let outcome = eng.cast_vote(&block.id, &p("b"), Vote::No).await.unwrap();
        assert_eq!(
            outcome,
            VoteOutcome::AlreadyDecided {
                state: UnitState::Finalized
            }
        );
        assert_eq!(
            eng.get_block(&block.id).await.unwrap().0.state,
            UnitState::Finalized
        );
    }

    #[tokio::test]
    async fn seeded_engines_elect_the_same_proposer() {
        let proposer_for = |seed: u64| async move {
            let eng = AgreementEngine::with_entropy(Box::new(SeededEntropy::new(seed)));
            let net = consensus_net(&eng, &[("a", 60), ("b", 25), ("c", 15)]);
            let block = eng.propose_block(&net, vec![]).await.unwrap();
            match block.kind {
                UnitKind::Block { proposer, .. } => proposer,
                other => panic!("expected a block, got {other:?}"),
            }
        };

        assert_eq!(proposer_for(42).await, proposer_for(42).await);
    }

    // -------------------------------------------------------------------------
    // Commit: unanimity with bounded prepare wait
    // -------------------------------------------------------------------------

    fn commit_cluster(eng: &AgreementEngine, members: &[&str]) -> GroupId {
        let group = GroupId::from("cluster");
        eng.create_group(group.clone(), GroupParams::Commit { timeout_ms: 500 })
            .unwrap();
        for id in members {
            eng.register_participant(&group, p(id), 1).unwrap();
        }
        group
    }

    #[tokio::test]
    async fn unanimous_prepare_commits_transaction() {
        let eng = engine();
        let cluster = commit_cluster(&eng, &["p1", "p2", "p3"]);

        let tx = eng
            .begin_transaction(
                &cluster,
                "acct-1".into(),
                100,
                vec![],
                vec![p("p1"), p("p2"), p("p3")],
            )
            .await
            .unwrap();
        assert_eq!(tx.state, UnitState::Active);

        for id in ["p1", "p2"] {
            eng.submit_prepare_vote(&tx.id, &p(id), PrepareVote::Yes)
                .await
                .unwrap();
        }
        let outcome = eng
            .submit_prepare_vote(&tx.id, &p("p3"), PrepareVote::Yes)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            PrepareOutcome::Settled {
                decision: Decision::Commit
            }
        );
        assert_eq!(
            eng.get_transaction(&tx.id).await.unwrap().0.state,
            UnitState::Committed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn silent_participant_aborts_transaction_on_timeout() {
        let eng = engine();
        let cluster = commit_cluster(&eng, &["p1", "p2", "p3"]);

        let tx = eng
            .begin_transaction(
                &cluster,
                "acct-2".into(),
                100,
                vec![],
                vec![p("p1"), p("p2"), p("p3")],
            )
            .await
            .unwrap();

        eng.submit_prepare_vote(&tx.id, &p("p1"), PrepareVote::Yes)
            .await
            .unwrap();
        eng.submit_prepare_vote(&tx.id, &p("p2"), PrepareVote::Yes)
            .await
            .unwrap();

        // p3 never answers; the deadline converts its silence to a no.
        let decision = eng.run_prepare(&tx.id).await.unwrap();
        assert_eq!(
            decision,
            Decision::Abort {
                reason: AbortReason::Timeout {
                    missing: vec![p("p3")]
                }
            }
        );
        assert_eq!(
            eng.get_transaction(&tx.id).await.unwrap().0.state,
            UnitState::Aborted
        );
    }

    #[tokio::test]
    async fn one_decline_overrides_any_number_of_yes_votes() {
        let eng = engine();
        let cluster = commit_cluster(&eng, &["p1", "p2", "p3"]);

        let tx = eng
            .begin_transaction(
                &cluster,
                "acct-3".into(),
                100,
                vec![],
                vec![p("p1"), p("p2"), p("p3")],
            )
            .await
            .unwrap();

        eng.submit_prepare_vote(&tx.id, &p("p1"), PrepareVote::Yes)
            .await
            .unwrap();
        eng.submit_prepare_vote(&tx.id, &p("p2"), PrepareVote::Yes)
            .await
            .unwrap();
        let outcome = eng
            .submit_prepare_vote(&tx.id, &p("p3"), PrepareVote::No)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PrepareOutcome::Settled {
                decision: Decision::Abort { .. }
            }
        ));
        assert_eq!(
            eng.get_transaction(&tx.id).await.unwrap().0.state,
            UnitState::Aborted
        );
    }

    #[tokio::test]
    async fn cancellation_uses_the_abort_path() {
        let eng = engine();
        let cluster = commit_cluster(&eng, &["p1", "p2"]);

        let tx = eng
            .begin_transaction(&cluster, "acct-4".into(), 50, vec![], vec![p("p1"), p("p2")])
            .await
            .unwrap();
        eng.submit_prepare_vote(&tx.id, &p("p1"), PrepareVote::Yes)
            .await
            .unwrap();

        let decision = eng.cancel_transaction(&tx.id).await.unwrap();
        assert_eq!(
            decision,
            Decision::Abort {
                reason: AbortReason::Cancelled
            }
        );
        // A participant that already answered acknowledges the abort.
        let ack = eng
            .submit_prepare_vote(&tx.id, &p("p2"), PrepareVote::Yes)
            .await
            .unwrap();
        assert_eq!(
            ack,
            PrepareOutcome::AlreadyDecided {
                state: UnitState::Aborted
            }
        );
    }

    // -------------------------------------------------------------------------
    // Multisig: M-of-N threshold authorization
    // -------------------------------------------------------------------------

    fn wallet(eng: &AgreementEngine, owners: &[&str], threshold: usize) -> GroupId {
        let group = GroupId::from("vault");
        let members: Vec<_> = owners.iter().map(|o| (p(o), 1)).collect();
        eng.create_group_with_members(group.clone(), GroupParams::wallet(threshold), &members)
            .unwrap();
        group
    }

    #[tokio::test]
    async fn wallet_executes_on_threshold_and_keeps_audit_signatures() {
        let eng = engine();
        let vault = wallet(&eng, &["o1", "o2", "o3"], 2);

        let tx = eng
            .create_wallet_transaction(&vault, "acct-5".into(), 750, vec![])
            .await
            .unwrap();
        assert_eq!(tx.state, UnitState::Pending);

        let outcome = eng.sign(&tx.id, &p("o1"), b"s1".to_vec()).await.unwrap();
        assert!(matches!(outcome, SignOutcome::Recorded { progress } if progress.signatures == 1));
        assert_eq!(
            eng.get_wallet_transaction(&tx.id).await.unwrap().0.state,
            UnitState::Pending
        );

        let outcome = eng.sign(&tx.id, &p("o2"), b"s2".to_vec()).await.unwrap();
        assert!(matches!(outcome, SignOutcome::Executed { .. }));

        // O3's late signature is kept for audit, state unchanged.
        let outcome = eng.sign(&tx.id, &p("o3"), b"s3".to_vec()).await.unwrap();
        assert_eq!(
            outcome,
            SignOutcome::AlreadyExecuted {
                state: UnitState::Executed
            }
        );
        let (record, ballots) = eng.get_wallet_transaction(&tx.id).await.unwrap();
        assert_eq!(record.state, UnitState::Executed);
        assert_eq!(ballots.len(), 3);
    }

    #[tokio::test]
    async fn wallet_threshold_cannot_exceed_owner_count() {
        let eng = engine();
        let owners: Vec<_> = ["o1", "o2", "o3"].iter().map(|o| (p(o), 1)).collect();

        let err = eng
            .create_group_with_members(GroupId::from("vault"), GroupParams::wallet(4), &owners)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Registry(RegistryError::ThresholdExceedsMembership {
                threshold: 4,
                members: 3
            })
        );
        // No group, so no transactions either.
        assert!(eng.group_params(&GroupId::from("vault")).is_err());
    }

    // -------------------------------------------------------------------------
    // Protocol isolation
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn wallet_group_cannot_host_blocks() {
        let eng = engine();
        let vault = wallet(&eng, &["o1"], 1);

        let err = eng.propose_block(&vault, vec![]).await.unwrap_err();
        assert!(matches!(err, EngineError::Consensus(_)));
    }

    #[tokio::test]
    async fn consensus_group_cannot_host_transactions() {
        let eng = engine();
        let net = consensus_net(&eng, &[("a", 10)]);

        let err = eng
            .begin_transaction(&net, "acct".into(), 1, vec![], vec![p("a")])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Commit(_)));
    }
}
