//! A worked instantiation: telephones sharing one hierarchical machine.
//!
//! `OnHold` is a substate of `Connected`, so muting, unmuting and setting
//! the volume work the same on hold. Each phone's state lives only in the
//! transition log, keyed by its id.
//!
//! # Example
//!
//! ```rust
//! use hsm_ledger::phone::{Phone, PhoneState, PhoneStates};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let phones = PhoneStates::new().unwrap();
//!     let phone = Phone::new(7);
//!
//!     phones.trigger_call_dialed(&phone, "Ann").await.unwrap();
//!     phones.trigger_call_connected(&phone).await.unwrap();
//!
//!     assert_eq!(phones.state(&phone).unwrap(), PhoneState::Connected);
//!     assert_eq!(phones.get_history(&phone).unwrap().len(), 3);
//! });
//! ```

mod handset;
mod machine;

pub use handset::{Handset, HandsetEvent};
pub use machine::{Phone, PhoneId, PhoneMachine, PhoneState, PhoneStates, PhoneTrigger};
