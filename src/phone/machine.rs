//! Phone states, triggers and the entity-facing API.

use crate::builder::{BuildError, StateMachineBuilder};
use crate::core::{FireContext, ParamShape};
use crate::engine::{act, FireError, FiringMode, StateMachine, Transition};
use crate::history::{History, InMemoryTransitionLog, TransitionLog};
use crate::phone::handset::Handset;
use crate::{state_enum, trigger_enum};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a phone in the transition log.
pub type PhoneId = u32;

state_enum! {
    /// Lifecycle of a phone.
    pub enum PhoneState {
        OffHook,
        Ringing,
        Connected,
        /// Substate of `Connected`; every `Connected` trigger works here too.
        OnHold,
        PhoneDestroyed,
    }
    final: [PhoneDestroyed]
}

trigger_enum! {
    /// Everything that can happen to a phone.
    pub enum PhoneTrigger {
        /// Takes the callee's name as text
        CallDialed,
        CallConnected,
        LeftMessage,
        PlacedOnHold,
        TakenOffHold,
        PhoneHurledAgainstWall,
        MuteMicrophone,
        UnmuteMicrophone,
        /// Takes the new volume as an int
        SetVolume,
    }
}

/// A phone, identified by its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phone {
    pub id: PhoneId,
}

impl Phone {
    pub fn new(id: PhoneId) -> Self {
        Self { id }
    }

    fn context(&self) -> FireContext<PhoneId> {
        FireContext::for_entity(self.id)
    }
}

type PhoneTransition = Transition<PhoneId, PhoneState, PhoneTrigger>;

/// The machine behind [`PhoneStates`].
pub type PhoneMachine = StateMachine<PhoneId, PhoneState, PhoneTrigger, Handset>;

/// Phones driven through one shared state machine, with state kept in a
/// transition log.
pub struct PhoneStates {
    machine: PhoneMachine,
    log: Arc<dyn TransitionLog<PhoneId>>,
}

impl PhoneStates {
    /// Phones backed by an in-memory log, fired through one global queue.
    pub fn new() -> Result<Self, BuildError> {
        Self::with_firing_mode(FiringMode::Queued)
    }

    /// Phones backed by an in-memory log, fired in the given mode.
    pub fn with_firing_mode(mode: FiringMode) -> Result<Self, BuildError> {
        Self::with_log(Arc::new(InMemoryTransitionLog::new()), mode)
    }

    /// Phones backed by any transition log.
    pub fn with_log(log: Arc<dyn TransitionLog<PhoneId>>, mode: FiringMode) -> Result<Self, BuildError> {
        let machine = configure(mode)?.build_with_log(Arc::clone(&log), Handset::new())?;
        Ok(Self { machine, log })
    }

    pub async fn trigger_call_dialed(&self, phone: &Phone, callee: &str) -> Result<(), FireError> {
        self.machine
            .fire_with(&phone.context(), PhoneTrigger::CallDialed, callee)
            .await
    }

    pub async fn trigger_call_connected(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::CallConnected).await
    }

    pub async fn trigger_left_message(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::LeftMessage).await
    }

    pub async fn trigger_placed_on_hold(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::PlacedOnHold).await
    }

    pub async fn trigger_taken_off_hold(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::TakenOffHold).await
    }

    pub async fn trigger_phone_hurled_against_wall(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::PhoneHurledAgainstWall).await
    }

    pub async fn trigger_mute_microphone(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::MuteMicrophone).await
    }

    pub async fn trigger_unmute_microphone(&self, phone: &Phone) -> Result<(), FireError> {
        self.fire(phone, PhoneTrigger::UnmuteMicrophone).await
    }

    pub async fn trigger_set_volume(&self, phone: &Phone, volume: i64) -> Result<(), FireError> {
        self.machine
            .fire_with(&phone.context(), PhoneTrigger::SetVolume, volume)
            .await
    }

    /// The phone's transition log.
    ///
    /// A phone that was never touched gets its initial record here, so the
    /// history is never empty.
    pub fn get_history(&self, phone: &Phone) -> Result<History<PhoneId>, FireError> {
        self.machine.state(&phone.context())?;
        Ok(History::new(self.log.history(&phone.id)?))
    }

    pub fn state(&self, phone: &Phone) -> Result<PhoneState, FireError> {
        self.machine.state(&phone.context())
    }

    /// The handset hardware every phone action reports to.
    pub fn handset(&self) -> &Handset {
        self.machine.environment()
    }

    pub fn machine(&self) -> &PhoneMachine {
        &self.machine
    }

    async fn fire(&self, phone: &Phone, trigger: PhoneTrigger) -> Result<(), FireError> {
        self.machine.fire(&phone.context(), trigger).await
    }
}

fn configure(
    mode: FiringMode,
) -> Result<StateMachineBuilder<PhoneId, PhoneState, PhoneTrigger, Handset>, BuildError> {
    let mut builder = StateMachineBuilder::new()
        .initial(PhoneState::OffHook)
        .firing_mode(mode);

    builder
        .set_trigger_parameter_shape(PhoneTrigger::CallDialed, ParamShape::Text)
        .set_trigger_parameter_shape(PhoneTrigger::SetVolume, ParamShape::Int);

    builder
        .configure(PhoneState::OffHook)
        .permit(PhoneTrigger::CallDialed, PhoneState::Ringing);

    builder
        .configure(PhoneState::Ringing)
        .on_entry_from(PhoneTrigger::CallDialed, |t: &PhoneTransition| {
            let (phone, callee) = (t.entity, t.text().unwrap_or_default().to_string());
            act(move |handset: &Handset| {
                handset.dial(phone, &callee);
                Ok(())
            })
        })
        .permit(PhoneTrigger::CallConnected, PhoneState::Connected);

    builder
        .configure(PhoneState::Connected)
        .on_entry(|t: &PhoneTransition| {
            let phone = t.entity;
            act(move |handset: &Handset| {
                handset.start_timer(phone);
                Ok(())
            })
        })
        .on_exit(|t: &PhoneTransition| {
            let phone = t.entity;
            act(move |handset: &Handset| {
                handset.stop_timer(phone);
                Ok(())
            })
        })
        .internal_transition(PhoneTrigger::MuteMicrophone, |t: &PhoneTransition| {
            let phone = t.entity;
            act(move |handset: &Handset| {
                handset.mute(phone);
                Ok(())
            })
        })
        .internal_transition(PhoneTrigger::UnmuteMicrophone, |t: &PhoneTransition| {
            let phone = t.entity;
            act(move |handset: &Handset| {
                handset.unmute(phone);
                Ok(())
            })
        })
        .internal_transition(PhoneTrigger::SetVolume, |t: &PhoneTransition| {
            let (phone, level) = (t.entity, t.int().unwrap_or_default());
            act(move |handset: &Handset| {
                handset.set_volume(phone, level);
                Ok(())
            })
        })
        .permit(PhoneTrigger::LeftMessage, PhoneState::OffHook)
        .permit(PhoneTrigger::PlacedOnHold, PhoneState::OnHold);

    builder
        .configure(PhoneState::OnHold)
        .substate_of(PhoneState::Connected)?
        .permit(PhoneTrigger::TakenOffHold, PhoneState::Connected)
        .permit(PhoneTrigger::PhoneHurledAgainstWall, PhoneState::PhoneDestroyed);

    builder
        .configure(PhoneState::PhoneDestroyed)
        .on_entry(|t: &PhoneTransition| {
            let phone = t.entity;
            act(move |handset: &Handset| {
                handset.wreck(phone);
                Ok(())
            })
        });

    Ok(builder)
}
