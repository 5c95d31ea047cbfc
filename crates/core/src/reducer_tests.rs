use super::*;
use crate::effect::LogLevel;
use crate::log::Entry;
use serde_json::{json, Value};
use yare::parameterized;

type State = OptimistState<Value, &'static str>;
type Env = Envelope<&'static str>;

/// Acknowledgements that leave inner state alone
const SIGNALS: [&str; 2] = ["ok", "failed"];

/// Appends every action name to `items`
fn push(state: &Value, action: &&'static str) -> Value {
    let mut items = state
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if SIGNALS.contains(action) {
        return json!({ "items": items });
    }
    items.push(json!(action));
    json!({ "items": items })
}

/// Like `push`, but returns null for "break"
fn fragile(state: &Value, action: &&'static str) -> Value {
    if *action == "break" {
        Value::Null
    } else {
        push(state, action)
    }
}

fn optimist() -> Optimist<fn(&Value, &&'static str) -> Value, Value, &'static str> {
    Optimist::new(push as fn(&Value, &&'static str) -> Value)
}

fn start() -> State {
    OptimistState::new(json!({ "items": [] }))
}

fn run(envelopes: Vec<Env>) -> (State, Vec<Diagnostic<TransactionId>>) {
    let optimist = optimist();
    let mut state = start();
    let mut diagnostics = vec![];
    for envelope in envelopes {
        let (next, mut found) = optimist.transition(Some(&state), envelope).unwrap();
        state = next;
        diagnostics.append(&mut found);
    }
    (state, diagnostics)
}

fn items(state: &State) -> Vec<&str> {
    state.inner["items"]
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn open_ids(state: &State) -> Vec<String> {
    state
        .log
        .open_transactions()
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

// =============================================================================
// Pass-through
// =============================================================================

#[test]
fn plain_action_with_empty_log_keeps_log_empty() {
    let (state, diagnostics) = run(vec![Env::plain("x")]);

    assert_eq!(items(&state), vec!["x"]);
    assert!(state.log.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn plain_action_while_open_appends_closed_entry() {
    let (state, _) = run(vec![Env::begin("A", "a"), Env::plain("x")]);

    assert_eq!(state.log.len(), 2);
    assert_eq!(
        state.log.entries()[1],
        Entry::Closed {
            action: Env::plain("x")
        }
    );
}

#[test]
fn initial_state_starts_from_default() {
    let optimist = optimist();
    let (state, _) = optimist.transition(None, Env::plain("x")).unwrap();

    assert_eq!(state.inner, json!({ "items": ["x"] }));
    assert!(state.log.is_empty());
}

#[test]
fn input_state_is_not_modified() {
    let (state, _) = run(vec![Env::begin("A", "a"), Env::plain("x")]);
    let before = state.clone();

    let optimist = optimist();
    let _ = optimist.transition(Some(&state), Env::revert("A", "failed")).unwrap();

    assert_eq!(state, before);
}

// =============================================================================
// Begin
// =============================================================================

#[test]
fn begin_snapshots_state_before_its_action() {
    let (state, _) = run(vec![Env::plain("x"), Env::begin("A", "a")]);

    assert_eq!(items(&state), vec!["x", "a"]);
    assert_eq!(
        state.log.entries(),
        &[Entry::Open {
            before_state: json!({ "items": ["x"] }),
            action: Env::begin("A", "a"),
        }]
    );
    assert_eq!(open_ids(&state), vec!["A"]);
}

#[test]
fn begin_records_the_action_once() {
    let (state, _) = run(vec![Env::begin("A", "a"), Env::begin("B", "b")]);

    assert_eq!(state.log.len(), 2);
    assert!(state.log.iter().all(Entry::is_open));
}

// =============================================================================
// Commit
// =============================================================================

#[test]
fn begin_then_commit_equals_plain_application() {
    let (state, diagnostics) = run(vec![
        Env::begin("A", "a"),
        Env::plain("x"),
        Env::plain("y"),
        Env::commit("A", "ok"),
    ]);

    let plain = run(vec![Env::plain("a"), Env::plain("x"), Env::plain("y")]).0;
    assert_eq!(state.inner, plain.inner);
    assert!(diagnostics.is_empty());
}

#[test]
fn committing_last_transaction_empties_log() {
    let (state, _) = run(vec![
        Env::begin("A", "a"),
        Env::plain("x"),
        Env::commit("A", "ok"),
    ]);

    assert!(state.log.is_empty());
}

#[test]
fn commit_flows_through_wrapped_reducer() {
    let (state, _) = run(vec![Env::begin("A", "a"), Env::commit("A", "saved")]);

    assert_eq!(items(&state), vec!["a", "saved"]);
}

#[test]
fn committed_transaction_can_no_longer_be_reverted() {
    let (state, diagnostics) = run(vec![
        Env::begin("A", "a"),
        Env::commit("A", "ok"),
        Env::revert("A", "failed"),
    ]);

    assert_eq!(items(&state), vec!["a"]);
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnknownTransaction {
            kind: TransactionKind::Revert,
            id: TransactionId::from("A"),
        }]
    );
}

// =============================================================================
// Revert
// =============================================================================

#[test]
fn revert_restores_snapshot() {
    let (state, diagnostics) = run(vec![
        Env::plain("x"),
        Env::begin("A", "a"),
        Env::revert("A", "failed"),
    ]);

    assert_eq!(items(&state), vec!["x"]);
    assert!(state.log.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn revert_replays_later_actions() {
    let (state, _) = run(vec![
        Env::begin("A", "a"),
        Env::plain("x"),
        Env::plain("y"),
        Env::revert("A", "failed"),
    ]);

    assert_eq!(items(&state), vec!["x", "y"]);
    assert!(state.log.is_empty());
}

#[test]
fn revert_action_flows_through_wrapped_reducer() {
    let (state, _) = run(vec![Env::begin("A", "a"), Env::revert("A", "undo")]);

    assert_eq!(items(&state), vec!["undo"]);
}

#[test]
fn reverting_inner_transaction_leaves_outer_open() {
    let (state, diagnostics) = run(vec![
        Env::begin("A", "a"),
        Env::begin("B", "b"),
        Env::plain("y"),
        Env::revert("B", "failed"),
    ]);

    assert_eq!(items(&state), vec!["a", "y"]);
    assert_eq!(open_ids(&state), vec!["A"]);
    assert!(diagnostics.is_empty());

    let optimist = optimist();
    let (state, diagnostics) = optimist
        .transition(Some(&state), Env::commit("A", "ok"))
        .unwrap();
    assert_eq!(items(&state), vec!["a", "y"]);
    assert!(diagnostics.is_empty());
    assert!(state.log.is_empty());
}

#[test]
fn reverting_outer_transaction_resnapshots_inner() {
    let (state, _) = run(vec![
        Env::begin("A", "a"),
        Env::begin("B", "b"),
        Env::plain("y"),
        Env::revert("A", "failed"),
    ]);

    assert_eq!(items(&state), vec!["b", "y"]);
    assert_eq!(open_ids(&state), vec!["B"]);
    assert_eq!(
        state.log.entries()[0].before_state(),
        Some(&json!({ "items": [] }))
    );

    let optimist = optimist();
    let (state, _) = optimist
        .transition(Some(&state), Env::revert("B", "failed"))
        .unwrap();
    assert_eq!(items(&state), vec!["y"]);
    assert!(state.log.is_empty());
}

#[test]
fn commit_then_revert_of_later_transaction() {
    let script = || {
        vec![
            Env::begin("A", "a"),
            Env::begin("B", "b"),
            Env::plain("y"),
        ]
    };

    let mut commit_first = script();
    commit_first.extend([Env::commit("A", "ok"), Env::revert("B", "failed")]);
    let mut revert_first = script();
    revert_first.extend([Env::revert("B", "failed"), Env::commit("A", "ok")]);

    let (a, _) = run(commit_first);
    let (b, _) = run(revert_first);

    assert_eq!(items(&a), vec!["a", "y"]);
    assert_eq!(a.inner, b.inner);
    assert!(a.log.is_empty());
    assert!(b.log.is_empty());
}

// =============================================================================
// Nested commits
// =============================================================================

// Committing the oldest open transaction drops everything up to the next open
// entry; committing a newer one only demotes its entry in place.

#[test]
fn commit_of_oldest_transaction_drops_its_prefix() {
    let (state, _) = run(vec![
        Env::begin("A", "a"),
        Env::plain("x"),
        Env::begin("B", "b"),
        Env::plain("y"),
        Env::commit("A", "ok"),
    ]);

    assert_eq!(
        state.log.entries(),
        &[
            Entry::Open {
                before_state: json!({ "items": ["a", "x"] }),
                action: Env::begin("B", "b"),
            },
            Entry::Closed {
                action: Env::plain("y")
            },
            Entry::Closed {
                action: Env::commit("A", "ok")
            },
        ]
    );
}

#[test]
fn commit_of_newer_transaction_demotes_in_place() {
    let (state, _) = run(vec![
        Env::begin("A", "a"),
        Env::begin("B", "b"),
        Env::plain("y"),
        Env::commit("B", "ok"),
    ]);

    assert_eq!(open_ids(&state), vec!["A"]);
    assert_eq!(
        state.log.entries()[1],
        Entry::Closed {
            action: Env::begin("B", "b")
        }
    );
    assert_eq!(state.log.len(), 4);

    // the committed action survives a later revert of the outer transaction
    let optimist = optimist();
    let (state, _) = optimist
        .transition(Some(&state), Env::revert("A", "failed"))
        .unwrap();
    assert_eq!(items(&state), vec!["b", "y"]);
    assert!(state.log.is_empty());
}

#[test]
fn three_open_transactions_resolve_out_of_order() {
    let (state, diagnostics) = run(vec![
        Env::begin("A", "a"),
        Env::begin("B", "b"),
        Env::begin("C", "c"),
        Env::plain("x"),
        Env::commit("B", "ok"),
        Env::revert("A", "failed"),
        Env::plain("y"),
        Env::revert("C", "failed"),
    ]);

    assert_eq!(items(&state), vec!["b", "x", "y"]);
    assert!(state.log.is_empty());
    assert!(diagnostics.is_empty());
}

// =============================================================================
// Unknown transactions
// =============================================================================

#[parameterized(
    commit = { Env::commit("ghost", "z"), TransactionKind::Commit },
    revert = { Env::revert("ghost", "z"), TransactionKind::Revert },
)]
fn unknown_id_is_reported_not_fatal(envelope: Env, kind: TransactionKind) {
    let (state, diagnostics) = run(vec![Env::plain("x"), envelope]);

    assert_eq!(items(&state), vec!["x", "z"]);
    assert!(state.log.is_empty());
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnknownTransaction {
            kind,
            id: TransactionId::from("ghost"),
        }]
    );
}

#[test]
fn unknown_revert_keeps_other_transactions() {
    let (state, diagnostics) = run(vec![
        Env::begin("A", "a"),
        Env::plain("x"),
        Env::revert("ghost", "failed"),
    ]);

    assert_eq!(items(&state), vec!["a", "x"]);
    assert_eq!(open_ids(&state), vec!["A"]);
    assert_eq!(state.log.len(), 3);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn reduce_logs_instead_of_failing() {
    let optimist = Optimist::with_config(
        push as fn(&Value, &&'static str) -> Value,
        OptimistConfig::default().with_unknown_transaction(LogLevel::Off),
    );

    let state = optimist
        .reduce(Some(&start()), Env::commit("ghost", "ok"))
        .unwrap();
    assert_eq!(items(&state), Vec::<&str>::new());
}

// =============================================================================
// Record invariant
// =============================================================================

fn fragile_optimist() -> Optimist<fn(&Value, &&'static str) -> Value, Value, &'static str> {
    Optimist::new(fragile as fn(&Value, &&'static str) -> Value)
}

#[parameterized(
    plain = { vec![], Env::plain("break") },
    begin = { vec![], Env::begin("A", "break") },
    commit = { vec![Env::begin("A", "a")], Env::commit("A", "break") },
    revert = { vec![Env::begin("A", "a")], Env::revert("A", "break") },
)]
fn non_record_state_is_fatal(setup: Vec<Env>, envelope: Env) {
    let optimist = fragile_optimist();
    let mut state = start();
    for env in setup {
        state = optimist.transition(Some(&state), env).unwrap().0;
    }

    let err = optimist.transition(Some(&state), envelope).unwrap_err();
    assert!(matches!(err, OptimistError::NotARecord { ref action } if action == "break"));
}

#[test]
fn non_record_state_during_replay_is_fatal() {
    // "y" only breaks once "a" is gone
    fn needs_a(state: &Value, action: &&'static str) -> Value {
        let has_a = state["items"]
            .as_array()
            .is_some_and(|items| items.contains(&json!("a")));
        if *action == "y" && !has_a {
            Value::Null
        } else {
            push(state, action)
        }
    }

    let optimist: Optimist<_, Value, &'static str> = Optimist::new(needs_a);
    let mut state = start();
    for env in [Env::begin("A", "a"), Env::plain("y")] {
        state = optimist.transition(Some(&state), env).unwrap().0;
    }

    let err = optimist
        .transition(Some(&state), Env::revert("A", "failed"))
        .unwrap_err();
    assert!(matches!(err, OptimistError::NotARecord { ref action } if action == "y"));
}
