//! Property tests over random operation sequences

use proptest::prelude::*;

use wallet_ledger::LedgerError;

mod common;

const ACCOUNTS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Clone)]
enum Op {
    Mint { to: usize, amount: i64, key: Option<u8> },
    Transfer { from: usize, to: usize, amount: i64, key: Option<u8> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let key = proptest::option::of(0u8..6);
    prop_oneof![
        (0..ACCOUNTS.len(), -10i64..5_000, key.clone())
            .prop_map(|(to, amount, key)| Op::Mint { to, amount, key }),
        (0..ACCOUNTS.len(), 0..ACCOUNTS.len(), -10i64..5_000, key)
            .prop_map(|(from, to, amount, key)| Op::Transfer { from, to, amount, key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: whatever sequence of mints and transfers is attempted, the
    /// ledger stays balanced, replays its balances from history and never lets
    /// a regular account go negative.
    #[test]
    fn invariants_hold_for_any_operation_sequence(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let ledger = common::setup_ledger(&ACCOUNTS);

        for op in ops {
            let result = match &op {
                Op::Mint { to, amount, key } => {
                    let key = key.as_ref().map(|k| format!("key-{k}"));
                    ledger.add_money(ACCOUNTS[*to], *amount, "mint", key.as_deref())
                }
                Op::Transfer { from, to, amount, key } => {
                    let key = key.as_ref().map(|k| format!("key-{k}"));
                    ledger.transfer(ACCOUNTS[*from], ACCOUNTS[*to], *amount, "transfer", key.as_deref())
                }
            };

            if let Err(err) = result {
                prop_assert!(
                    err.is_client_error() || err.is_conflict_error(),
                    "unexpected defect {:?} for {:?}", err, op
                );
            }

            for account in ACCOUNTS {
                prop_assert!(ledger.get_balance(account).unwrap() >= 0);
            }
        }

        prop_assert_eq!(common::total_balance(&ledger), 0);

        let entries = ledger.all_transactions().unwrap();
        for account in ACCOUNTS {
            prop_assert_eq!(
                i128::from(ledger.get_balance(account).unwrap()),
                common::replayed_balance(&entries, account)
            );
        }
        prop_assert!(ledger.verify_invariants().is_ok());
    }

    /// Property: replaying any successful request with its key never changes
    /// state and returns the original id.
    #[test]
    fn replay_is_a_no_op(amounts in prop::collection::vec(1i64..10_000, 1..20)) {
        let ledger = common::setup_ledger(&ACCOUNTS);

        for (i, amount) in amounts.iter().enumerate() {
            let key = format!("mint-{i}");
            let first = ledger.add_money("A", *amount, "mint", Some(key.as_str())).unwrap();
            let balance = ledger.get_balance("A").unwrap();
            let count = ledger.transaction_count().unwrap();

            let again = ledger.add_money("A", *amount, "mint", Some(key.as_str())).unwrap();
            prop_assert_eq!(first, again);
            prop_assert_eq!(ledger.get_balance("A").unwrap(), balance);
            prop_assert_eq!(ledger.transaction_count().unwrap(), count);

            let conflict = ledger.add_money("A", *amount + 1, "mint", Some(key.as_str()));
            prop_assert!(
                matches!(conflict, Err(LedgerError::IdempotencyConflict { .. })),
                "expected conflict"
            );
        }
    }
}
