//! Property-based tests for the transition ledger.
//!
//! These tests use proptest to drive phones through random trigger
//! sequences and check the history invariants after every run.

use hsm_ledger::core::State;
use hsm_ledger::phone::{Phone, PhoneState, PhoneStates};
use hsm_ledger::{FireError, History};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Call {
    Dial(String),
    Connect,
    LeaveMessage,
    Hold,
    Resume,
    Hurl,
    Mute,
    Unmute,
    Volume(i64),
}

fn arbitrary_call() -> impl Strategy<Value = Call> {
    prop_oneof![
        "[A-Z][a-z]{1,6}".prop_map(Call::Dial),
        Just(Call::Connect),
        Just(Call::LeaveMessage),
        Just(Call::Hold),
        Just(Call::Resume),
        Just(Call::Hurl),
        Just(Call::Mute),
        Just(Call::Unmute),
        (0i64..20).prop_map(Call::Volume),
    ]
}

prop_compose! {
    fn arbitrary_state()(variant in 0..5u8) -> PhoneState {
        match variant {
            0 => PhoneState::OffHook,
            1 => PhoneState::Ringing,
            2 => PhoneState::Connected,
            3 => PhoneState::OnHold,
            _ => PhoneState::PhoneDestroyed,
        }
    }
}

async fn place(phones: &PhoneStates, phone: &Phone, call: &Call) -> Result<(), FireError> {
    match call {
        Call::Dial(callee) => phones.trigger_call_dialed(phone, callee).await,
        Call::Connect => phones.trigger_call_connected(phone).await,
        Call::LeaveMessage => phones.trigger_left_message(phone).await,
        Call::Hold => phones.trigger_placed_on_hold(phone).await,
        Call::Resume => phones.trigger_taken_off_hold(phone).await,
        Call::Hurl => phones.trigger_phone_hurled_against_wall(phone).await,
        Call::Mute => phones.trigger_mute_microphone(phone).await,
        Call::Unmute => phones.trigger_unmute_microphone(phone).await,
        Call::Volume(level) => phones.trigger_set_volume(phone, *level).await,
    }
}

/// Outcome of replaying a call sequence against a fresh phone.
struct Replay {
    history: History<u32>,
    state_changes: usize,
    rejected_without_record: bool,
}

fn replay(calls: &[Call]) -> Replay {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    rt.block_on(async {
        let phones = PhoneStates::new().unwrap();
        let phone = Phone::new(1);
        let mut state_changes = 0;
        let mut rejected_without_record = true;

        for call in calls {
            let before = phones.get_history(&phone).unwrap().len();
            let state = phones.state(&phone).unwrap();
            let result = place(&phones, &phone, call).await;
            let after = phones.get_history(&phone).unwrap().len();

            match result {
                Ok(()) if phones.state(&phone).unwrap() != state => state_changes += 1,
                Ok(()) => {}
                Err(err) => {
                    assert!(err.is_invalid_transition(), "unexpected error: {err}");
                    rejected_without_record &= before == after;
                }
            }
        }

        Replay {
            history: phones.get_history(&phone).unwrap(),
            state_changes,
            rejected_without_record,
        }
    })
}

proptest! {
    #[test]
    fn history_forms_an_unbroken_chain(calls in prop::collection::vec(arbitrary_call(), 0..40)) {
        let replay = replay(&calls);
        let records = replay.history.records();

        prop_assert!(records[0].is_initial());
        prop_assert_eq!(records[0].to_state.as_str(), "OffHook");
        for pair in records.windows(2) {
            prop_assert_eq!(Some(pair[0].to_state.as_str()), pair[1].from_state.as_deref());
            prop_assert_ne!(pair[1].from_state.as_deref(), Some(pair[1].to_state.as_str()));
        }
    }

    #[test]
    fn sequence_ids_are_gapless(calls in prop::collection::vec(arbitrary_call(), 0..40)) {
        let replay = replay(&calls);

        let ids: Vec<u64> = replay.history.iter().map(|r| r.sequence_id).collect();
        let expected: Vec<u64> = (1..=ids.len() as u64).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn only_state_changes_are_recorded(calls in prop::collection::vec(arbitrary_call(), 0..40)) {
        let replay = replay(&calls);

        prop_assert_eq!(replay.history.len(), replay.state_changes + 1);
        prop_assert!(replay.rejected_without_record);
    }

    #[test]
    fn recorded_states_always_decode(calls in prop::collection::vec(arbitrary_call(), 0..40)) {
        let replay = replay(&calls);

        for state in replay.history.path() {
            prop_assert!(PhoneState::from_name(state).is_some());
        }
    }

    #[test]
    fn state_name_round_trips(state in arbitrary_state()) {
        prop_assert_eq!(PhoneState::from_name(state.name()), Some(state));
    }

    #[test]
    fn history_roundtrip_serialization(calls in prop::collection::vec(arbitrary_call(), 0..20)) {
        let history = replay(&calls).history;

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: History<u32> = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(history, deserialized);
    }
}
