//! Winner selection over the participant ledger.
//!
//! Both modes are pure functions of (ledger, total, random word): the same
//! inputs always select the same entry, so a settled round can be reproduced
//! off-chain from the emitted random word.
//!
//! - Ticket: `random_word mod len(ledger)`, one ticket per join.
//! - Weighted: `target = random_word mod total`, then the first entry whose
//!   cumulative contribution exceeds `target`. An entry of amount `a` covers
//!   exactly `a` of the `total` residues, so its odds are `a / total`.

use soroban_sdk::{Env, Vec, U256};

use crate::error::GameError;
use crate::types::{Entry, SelectionMode};

/// Index into `entries` of the winning entry.
pub fn winner_index(
    env: &Env,
    entries: &Vec<Entry>,
    total: i128,
    random_word: &U256,
    mode: SelectionMode,
) -> Result<u32, GameError> {
    let count = entries.len();
    if count == 0 {
        return Err(GameError::NoParticipants);
    }

    match mode {
        SelectionMode::Ticket => ticket_index(env, count, random_word),
        SelectionMode::Weighted => weighted_index(env, entries, total, random_word),
    }
}

fn ticket_index(env: &Env, count: u32, random_word: &U256) -> Result<u32, GameError> {
    let index = random_word.rem_euclid(&U256::from_u32(env, count));
    // index < count, so it always fits
    index
        .to_u128()
        .map(|i| i as u32)
        .ok_or(GameError::Overflow)
}

fn weighted_index(
    env: &Env,
    entries: &Vec<Entry>,
    total: i128,
    random_word: &U256,
) -> Result<u32, GameError> {
    if total <= 0 {
        return Err(GameError::StorageCorrupted);
    }

    let target = random_word
        .rem_euclid(&U256::from_u128(env, total as u128))
        .to_u128()
        .ok_or(GameError::Overflow)? as i128;

    let mut cumulative: i128 = 0;
    for (i, entry) in entries.iter().enumerate() {
        cumulative = cumulative
            .checked_add(entry.amount)
            .ok_or(GameError::Overflow)?;
        if target < cumulative {
            return Ok(i as u32);
        }
    }

    // Ledger sums to less than the tracked total
    Err(GameError::StorageCorrupted)
}
