//! Property-based tests for the alert state
//!
//! These tests use proptest to check the ledger, blocklist and history
//! invariants over randomized event sequences.

use proptest::prelude::*;

use crate::alerts::blocklist::Blocklist;
use crate::alerts::history::{AlertHistory, AlertKind, HISTORY_CAPACITY};
use crate::alerts::ledger::{AttackLedger, CloseOutcome};
use crate::tests::fixtures::at;

proptest! {
    #[test]
    fn duration_matches_elapsed_time(t0 in 0i64..4_000_000_000_000, delta in 0i64..86_400_000) {
        let mut ledger = AttackLedger::new();
        ledger.open("198.51.100.7".into(), "lab".into(), at(t0));

        match ledger.close("198.51.100.7", at(t0 + delta)) {
            CloseOutcome::Closed(attack) => {
                prop_assert_eq!(attack.duration.minutes(), delta / 60_000);
                prop_assert_eq!(attack.duration.seconds(), (delta % 60_000) / 1_000);
            }
            other => prop_assert!(false, "expected Closed, got {:?}", other),
        }
        prop_assert!(ledger.get("198.51.100.7").is_none());
    }

    #[test]
    fn at_most_one_open_record_per_ip(
        starts in prop::collection::vec((0u8..5, 0i64..1_000_000), 0..60)
    ) {
        let mut ledger = AttackLedger::new();
        for (ip, t) in &starts {
            ledger.open(format!("10.0.0.{}", ip), "x".into(), at(*t));
        }

        let snapshot = ledger.snapshot();
        let mut ips: Vec<&str> = snapshot.iter().map(|r| r.ip.as_str()).collect();
        let total = ips.len();
        ips.sort_unstable();
        ips.dedup();
        prop_assert_eq!(ips.len(), total);

        // Only the most recent start per IP survives
        for record in &snapshot {
            let last = starts
                .iter()
                .rev()
                .find(|(ip, _)| format!("10.0.0.{}", ip) == record.ip)
                .map(|(_, t)| at(*t));
            prop_assert_eq!(Some(record.start_time), last);
        }
    }

    #[test]
    fn blocklist_keeps_first_occurrence_order(ips in prop::collection::vec(0u8..20, 0..100)) {
        let mut list = Blocklist::new();
        let mut expected: Vec<String> = Vec::new();
        for ip in &ips {
            let ip = format!("203.0.113.{}", ip);
            let added = list.block(ip.clone());
            prop_assert_eq!(added, !expected.contains(&ip));
            if added {
                expected.push(ip);
            }
        }
        prop_assert_eq!(list.snapshot(), expected);
    }

    #[test]
    fn history_retains_most_recent_in_order(count in 0usize..40) {
        let mut history = AlertHistory::new();
        for i in 0..count {
            history.record(AlertKind::IpBlocked, i.to_string(), at(i as i64));
        }

        let entries = history.snapshot();
        prop_assert!(entries.len() <= HISTORY_CAPACITY);
        let messages: Vec<String> = entries.into_iter().map(|e| e.message).collect();
        let expected: Vec<String> = (count.saturating_sub(HISTORY_CAPACITY)..count)
            .map(|i| i.to_string())
            .collect();
        prop_assert_eq!(messages, expected);
    }
}
