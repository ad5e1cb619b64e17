use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GameError {
    /// Caller is not the owner (or not the coordinator for fulfillment)
    Unauthorized = 1,
    /// Entry or draw attempted while the game is not open
    GameNotStarted = 2,
    /// Start attempted while a round is open or awaiting randomness
    GameInProgress = 3,
    /// Attached amount is below the entry fee
    InsufficientValue = 4,
    /// Draw requested with an empty ledger
    NoParticipants = 5,
    /// Fulfillment does not match the outstanding request
    UnknownRequest = 6,
    /// Transfer of the pool to the winner failed
    PayoutFailed = 7,
    /// Contract already initialized
    AlreadyInitialized = 8,
    /// Contract not initialized
    NotInitialized = 9,
    /// Constructor arguments out of range
    InvalidConfig = 10,
    /// Raffle interval has not elapsed since the round started
    DrawTooEarly = 11,
    /// Game holds less fee token than the oracle fee
    InsufficientOracleFunds = 12,
    /// Fulfillment carried no random words
    InvalidRandomness = 13,
    /// Ledger reached MAX_ENTRIES_PER_ROUND
    RoundFull = 14,
    /// Arithmetic overflow
    Overflow = 15,
    /// Critical storage data missing (contract state corrupted)
    StorageCorrupted = 16,
}
