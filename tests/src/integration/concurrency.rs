//! Racing voters, signers, and settlers.
//!
//! The ledger's compare-and-swap is the only serialization point; these
//! tests hammer it from many tasks and assert each decisive transition
//! is observed exactly once.

#[cfg(test)]
mod tests {
    use accord_commit::{Decision, PrepareOutcome, PrepareVote};
    use accord_consensus::{SeededEntropy, Vote, VoteOutcome};
    use accord_engine::AgreementEngine;
    use accord_multisig::SignOutcome;
    use accord_types::{GroupId, GroupParams, ParticipantId, UnitState, Weight};
    use std::sync::Arc;

    fn p(id: &str) -> ParticipantId {
        ParticipantId::from(id)
    }

    fn engine() -> Arc<AgreementEngine> {
        crate::init_tracing();
        Arc::new(AgreementEngine::with_entropy(Box::new(SeededEntropy::new(
            7,
        ))))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn racing_decisive_votes_finalize_once() {
        let eng = engine();
        let net = GroupId::from("net");
        eng.create_group(net.clone(), GroupParams::consensus())
            .unwrap();
        let voters: Vec<String> = (0..8).map(|i| format!("v{i}")).collect();
        for v in &voters {
            eng.register_participant(&net, p(v), 100 as Weight).unwrap();
        }
        let block = eng.propose_block(&net, vec![]).await.unwrap();

        // Ballots accumulate concurrently, so several voters may observe a
        // quorum-meeting tally at once; the swap lets exactly one finalize.
        let handles: Vec<_> = voters
            .iter()
            .map(|v| {
                let eng = Arc::clone(&eng);
                let id = block.id.clone();
                let voter = p(v);
                tokio::spawn(async move { eng.cast_vote(&id, &voter, Vote::Yes).await })
            })
            .collect();

        let mut finalized = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                VoteOutcome::Finalized { .. } => finalized += 1,
                VoteOutcome::Recorded { .. } | VoteOutcome::AlreadyDecided { .. } => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(finalized, 1);
        assert_eq!(
            eng.get_block(&block.id).await.unwrap().0.state,
            UnitState::Finalized
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn racing_threshold_signatures_execute_once() {
        let eng = engine();
        let vault = GroupId::from("vault");
        let owners: Vec<String> = (0..6).map(|i| format!("o{i}")).collect();
        let members: Vec<_> = owners.iter().map(|o| (p(o), 1 as Weight)).collect();
        eng.create_group_with_members(vault.clone(), GroupParams::wallet(1), &members)
            .unwrap();
        let tx = eng
            .create_wallet_transaction(&vault, "acct".into(), 9, vec![])
            .await
            .unwrap();

        // Threshold 1: every signature is potentially decisive.
        let handles: Vec<_> = owners
            .iter()
            .map(|o| {
                let eng = Arc::clone(&eng);
                let id = tx.id.clone();
                let owner = p(o);
                tokio::spawn(async move { eng.sign(&id, &owner, vec![0x5a]).await })
            })
            .collect();

        let mut executed = 0;
        for handle in handles {
            if matches!(handle.await.unwrap().unwrap(), SignOutcome::Executed { .. }) {
                executed += 1;
            }
        }
        assert_eq!(executed, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn racing_prepare_votes_settle_once() {
        let eng = engine();
        let cluster = GroupId::from("cluster");
        eng.create_group(cluster.clone(), GroupParams::commit())
            .unwrap();
        let members: Vec<String> = (0..5).map(|i| format!("p{i}")).collect();
        for m in &members {
            eng.register_participant(&cluster, p(m), 1).unwrap();
        }
        let tx = eng
            .begin_transaction(
                &cluster,
                "acct".into(),
                1,
                vec![],
                members.iter().map(|m| p(m)).collect(),
            )
            .await
            .unwrap();

        // All five vote yes concurrently; exactly one vote completes the
        // round and performs the commit transition.
        let handles: Vec<_> = members
            .iter()
            .map(|m| {
                let eng = Arc::clone(&eng);
                let id = tx.id.clone();
                let member = p(m);
                tokio::spawn(async move {
                    eng.submit_prepare_vote(&id, &member, PrepareVote::Yes).await
                })
            })
            .collect();

        let mut settled = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                PrepareOutcome::Settled { decision } => {
                    assert_eq!(decision, Decision::Commit);
                    settled += 1;
                }
                PrepareOutcome::Recorded | PrepareOutcome::AlreadyDecided { .. } => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(settled, 1);
        assert_eq!(
            eng.get_transaction(&tx.id).await.unwrap().0.state,
            UnitState::Committed
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_waiters_observe_the_same_decision() {
        let eng = engine();
        let cluster = GroupId::from("cluster");
        eng.create_group(cluster.clone(), GroupParams::commit())
            .unwrap();
        for m in ["p1", "p2"] {
            eng.register_participant(&cluster, p(m), 1).unwrap();
        }
        let tx = eng
            .begin_transaction(&cluster, "acct".into(), 1, vec![], vec![p("p1"), p("p2")])
            .await
            .unwrap();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let eng = Arc::clone(&eng);
                let id = tx.id.clone();
                tokio::spawn(async move { eng.run_prepare(&id).await })
            })
            .collect();

        eng.submit_prepare_vote(&tx.id, &p("p1"), PrepareVote::Yes)
            .await
            .unwrap();
        eng.submit_prepare_vote(&tx.id, &p("p2"), PrepareVote::Yes)
            .await
            .unwrap();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap().unwrap(), Decision::Commit);
        }
    }
}
