//! Room registry: creates, tracks, and routes operations to rooms.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use roomdraw_protocol::{Notification, Operation, Outcome, RoomId};

use crate::{BlockContext, FundsTransfer, Room, RoomConfig, RoomError};

/// What a committed operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub outcome: Outcome,
    /// Events for external consumers. Empty for queries and for an
    /// idempotent `CreateOrJoin` on an existing room.
    pub notifications: Vec<Notification>,
}

impl Receipt {
    fn quiet(outcome: Outcome) -> Self {
        Self {
            outcome,
            notifications: Vec::new(),
        }
    }
}

/// Owns every room, keyed by caller-chosen id.
///
/// This is the entry point for room operations from higher layers. Rooms
/// share no state with one another; an operation only ever touches the
/// room it is addressed to. Rooms are never removed.
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    config: RoomConfig,
}

impl RoomRegistry {
    /// Creates an empty registry. Every room it creates uses `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Returns the room with `id`, creating it in `Idle` if absent.
    ///
    /// The flag is `true` when this call created the room.
    pub fn resolve(&mut self, id: RoomId) -> (&Room, bool) {
        match self.rooms.entry(id) {
            Entry::Occupied(slot) => (&*slot.into_mut(), false),
            Entry::Vacant(slot) => {
                tracing::info!(room_id = %id, "room created");
                (&*slot.insert(Room::new(id, &self.config)), true)
            }
        }
    }

    /// Idempotent creation. Never fails.
    pub fn create_or_join(&mut self, id: RoomId) -> Receipt {
        let (_, created) = self.resolve(id);
        let outcome = Outcome::Joined { created };
        if created {
            Receipt {
                outcome,
                notifications: vec![Notification::RoomCreated { room_id: id }],
            }
        } else {
            Receipt::quiet(outcome)
        }
    }

    /// Applies one operation to the room addressed by `id`.
    ///
    /// `block` is the environment the operation executes in; only `End`
    /// reads it. `transfer` receives the payout of a draw.
    ///
    /// # Errors
    /// [`RoomError::RoomNotFound`] for any operation other than
    /// `CreateOrJoin` on an unknown id, otherwise whatever the room
    /// rejects the operation with.
    pub fn dispatch<T: FundsTransfer>(
        &mut self,
        id: RoomId,
        operation: Operation,
        block: &BlockContext,
        transfer: &mut T,
    ) -> Result<Receipt, RoomError> {
        if matches!(operation, Operation::CreateOrJoin) {
            return Ok(self.create_or_join(id));
        }

        let op_name = operation.name();
        let result = self.apply(id, operation, block, transfer);
        if let Err(e) = &result {
            tracing::debug!(room_id = %id, op = op_name, error = %e, "operation rejected");
        }
        result
    }

    fn apply<T: FundsTransfer>(
        &mut self,
        id: RoomId,
        operation: Operation,
        block: &BlockContext,
        transfer: &mut T,
    ) -> Result<Receipt, RoomError> {
        let room = self
            .rooms
            .get_mut(&id)
            .ok_or(RoomError::RoomNotFound(id))?;

        let receipt = match operation {
            Operation::CreateOrJoin => Receipt::quiet(Outcome::Joined { created: false }),

            Operation::Start => {
                let round = room.start()?;
                tracing::info!(room_id = %id, round, "round opened");
                Receipt {
                    outcome: Outcome::Opened { round },
                    notifications: vec![Notification::RoundOpened { room_id: id, round }],
                }
            }

            Operation::Enter { account, stake } => {
                let balance = room.enter(account, stake)?;
                tracing::info!(
                    room_id = %id,
                    %account,
                    %stake,
                    %balance,
                    players = room.players().len(),
                    "entrant joined"
                );
                Receipt {
                    outcome: Outcome::Entered { balance },
                    notifications: vec![Notification::EntrantJoined {
                        room_id: id,
                        account,
                        stake,
                        balance,
                    }],
                }
            }

            Operation::End => {
                let draw = room.end(block, transfer)?;
                tracing::info!(
                    room_id = %id,
                    round = draw.round,
                    winner = %draw.winner,
                    payout = %draw.payout,
                    block = block.number,
                    "winner drawn"
                );
                Receipt {
                    outcome: Outcome::Drawn {
                        round: draw.round,
                        winner: draw.winner,
                        payout: draw.payout,
                    },
                    notifications: vec![Notification::WinnerDrawn {
                        room_id: id,
                        round: draw.round,
                        winner: draw.winner,
                        payout: draw.payout,
                    }],
                }
            }

            Operation::Players => Receipt::quiet(Outcome::Players {
                entrants: room.players().to_vec(),
            }),
            Operation::Balance => Receipt::quiet(Outcome::Balance {
                balance: room.balance(),
            }),
            Operation::Winner => Receipt::quiet(Outcome::Winner {
                winner: room.winner(),
            }),
            Operation::History => Receipt::quiet(Outcome::History {
                winners: room.history().to_vec(),
            }),
        };

        Ok(receipt)
    }

    /// Read-only access to a room.
    pub fn get(&self, id: RoomId) -> Result<&Room, RoomError> {
        self.rooms.get(&id).ok_or(RoomError::RoomNotFound(id))
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// Returns the number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all room IDs, in no particular order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
