use core::fmt::Debug;

use soroban_sdk::{contracttype, Env, IntoVal, TryFromVal, Val, Vec};

use crate::error::GameError;
use crate::types::{Entry, RoundResult};

/// Storage keys for the contract.
///
/// Configuration and the current round's scalars live in instance storage.
/// The participant ledger and round results are per-round persistent entries.
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    /// Deploying address, authority to start rounds
    Owner,
    /// Oracle coordinator contract (only caller allowed to fulfill)
    Coordinator,
    /// Token entries are paid in
    PoolToken,
    /// Minimum amount per entry
    EntryFee,
    /// SelectionMode for settlement
    Selection,
    /// GameVariant (oracle funding and draw trigger)
    Variant,
    /// Current GameStatus
    Status,
    /// Sum of all entries in the current round
    TotalBalance,
    /// Ledger timestamp of the last start_new_game
    StartedAt,
    /// Current round number (0 before the first start)
    Round,
    /// Outstanding randomness request id, absent when none is pending
    PendingRequest,
    /// Winner of the last settled round
    RecentWinner,
    /// Vec<Entry> for a round
    Entries(u32),
    /// RoundResult for a settled round
    RoundResult(u32),
}

/// Number of random words requested per draw.
pub const NUM_WORDS: u32 = 1;

/// Upper bound on ledger length. Bounds the settlement walk.
pub const MAX_ENTRIES_PER_ROUND: u32 = 200;

/// Bounds accepted for Raffle `request_confirmations`.
pub const MIN_REQUEST_CONFIRMATIONS: u32 = 3;
pub const MAX_REQUEST_CONFIRMATIONS: u32 = 200;

/// Persistent storage TTL in ledgers (~30 days at 5s/ledger).
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// Instance storage TTL in ledgers (~7 days), renewed once it drops below
/// the threshold.
pub const INSTANCE_BUMP_LEDGERS: u32 = 120_960;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_LEDGERS - 17_280;

pub fn has(env: &Env, key: &DataKey) -> bool {
    env.storage().instance().has(key)
}

/// Read a required instance value.
pub fn read<V>(env: &Env, key: &DataKey) -> Result<V, GameError>
where
    V: TryFromVal<Env, Val>,
    V::Error: Debug,
{
    env.storage()
        .instance()
        .get(key)
        .ok_or(GameError::StorageCorrupted)
}

pub fn write<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().instance().set(key, value);
}

/// Keep configuration and round state alive while the game is in use.
pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_LEDGERS);
}

pub fn read_pending_request(env: &Env) -> Option<u64> {
    env.storage().instance().get(&DataKey::PendingRequest)
}

pub fn clear_pending_request(env: &Env) {
    env.storage().instance().remove(&DataKey::PendingRequest);
}

pub fn read_entries(env: &Env, round: u32) -> Vec<Entry> {
    env.storage()
        .persistent()
        .get(&DataKey::Entries(round))
        .unwrap_or_else(|| Vec::new(env))
}

pub fn write_entries(env: &Env, round: u32, entries: &Vec<Entry>) {
    let key = DataKey::Entries(round);
    env.storage().persistent().set(&key, entries);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

pub fn remove_entries(env: &Env, round: u32) {
    env.storage().persistent().remove(&DataKey::Entries(round));
}

pub fn read_round_result(env: &Env, round: u32) -> Option<RoundResult> {
    env.storage().persistent().get(&DataKey::RoundResult(round))
}

pub fn write_round_result(env: &Env, round: u32, result: &RoundResult) {
    let key = DataKey::RoundResult(round);
    env.storage().persistent().set(&key, result);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}
