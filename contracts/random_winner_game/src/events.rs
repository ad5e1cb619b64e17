use soroban_sdk::{symbol_short, Address, Env, Symbol, U256};

const GAME: Symbol = symbol_short!("game");

/// ("game", "started"), (round, started_at)
pub fn game_started(env: &Env, round: u32, started_at: u64) {
    env.events()
        .publish((GAME, symbol_short!("started")), (round, started_at));
}

/// ("game", "entry", participant), (amount, total_balance)
pub fn entry_added(env: &Env, participant: &Address, amount: i128, total_balance: i128) {
    env.events().publish(
        (GAME, symbol_short!("entry"), participant.clone()),
        (amount, total_balance),
    );
}

/// ("game", "request"), (round, request_id)
pub fn randomness_requested(env: &Env, round: u32, request_id: u64) {
    env.events()
        .publish((GAME, symbol_short!("request")), (round, request_id));
}

/// ("game", "winner", winner), (round, payout, random_word)
pub fn winner_paid(env: &Env, round: u32, winner: &Address, payout: i128, random_word: &U256) {
    env.events().publish(
        (GAME, symbol_short!("winner"), winner.clone()),
        (round, payout, random_word.clone()),
    );
}
