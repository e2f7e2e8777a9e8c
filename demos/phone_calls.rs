//! Three Phones, One Machine
//!
//! This example drives three phones through the same hierarchical state
//! machine and prints each phone's transition log at the end.
//!
//! Key concepts:
//! - One machine definition shared by every phone
//! - State kept only in the per-phone transition log
//! - Internal transitions (mute, volume) that write no history
//! - `OnHold` inheriting `Connected`'s triggers
//!
//! Run with: cargo run --example phone_calls
//! Set RUST_LOG=hsm_ledger=debug to see every fire request.

use hsm_ledger::phone::{Phone, PhoneStates};
use hsm_ledger::FireError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hsm_ledger=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Three Phones, One Machine ===\n");

    let phone_states = PhoneStates::new()?;
    let phones = [Phone::new(1), Phone::new(2), Phone::new(3)];
    let names = ["Stamp", "Ricka", "Marie"];

    for (phone, name) in phones.iter().zip(names) {
        phone_states.trigger_call_dialed(phone, name).await?;
    }
    for phone in &phones {
        phone_states.trigger_call_connected(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_set_volume(phone, 2).await?;
    }
    for phone in &phones {
        phone_states.trigger_placed_on_hold(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_mute_microphone(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_unmute_microphone(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_taken_off_hold(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_set_volume(phone, 11).await?;
    }
    for phone in &phones {
        phone_states.trigger_placed_on_hold(phone).await?;
    }
    for phone in &phones {
        phone_states.trigger_phone_hurled_against_wall(phone).await?;
    }

    // A wrecked phone accepts nothing.
    match phone_states.trigger_call_dialed(&phones[0], "Stamp").await {
        Err(FireError::InvalidTransition { state, trigger }) => {
            println!("Phone 1 refused {trigger} while {state}\n");
        }
        other => println!("Unexpected outcome: {other:?}\n"),
    }

    for phone in &phones {
        for record in &phone_states.get_history(phone)? {
            println!(
                "Phone: {}, Log: {}, Remarks: {}",
                record.entity_key, record.sequence_id, record.remarks
            );
        }
        println!();
    }

    println!("State graph (Graphviz DOT):\n");
    println!("{}", phone_states.machine().to_graph());

    println!("=== Example Complete ===");
    Ok(())
}
