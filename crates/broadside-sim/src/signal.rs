//! Game-start / game-end broadcast bus.
//!
//! Subscribing returns a token; releasing the token removes the
//! registration. Every subscriber must release its token on every
//! destruction path, so a despawned entity can never be called back.

use hecs::Entity;

/// Process-wide game lifecycle signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSignal {
    GameStart,
    GameEnd,
}

/// Who is registered on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscriber {
    /// The ship spawn scheduler (lives as long as the engine).
    Spawner,
    /// An attacking ship entity.
    Ship(Entity),
}

/// Opaque handle returned by `subscribe`, consumed by `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalToken(u64);

/// Component attached to each ship: its registration on the game-end
/// signal. Both despawn paths (sink completion and game-end hard cancel)
/// release it.
#[derive(Debug, Clone, Copy)]
pub struct GameEndSubscription(pub SignalToken);

#[derive(Debug, Default)]
pub struct SignalBus {
    subscriptions: Vec<(SignalToken, GameSignal, Subscriber)>,
    next_token: u64,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, signal: GameSignal, subscriber: Subscriber) -> SignalToken {
        let token = SignalToken(self.next_token);
        self.next_token += 1;
        self.subscriptions.push((token, signal, subscriber));
        token
    }

    pub fn unsubscribe(&mut self, token: SignalToken) {
        self.subscriptions.retain(|(t, _, _)| *t != token);
    }

    /// Current subscribers of `signal`, in registration order.
    pub fn subscribers(&self, signal: GameSignal) -> Vec<Subscriber> {
        self.subscriptions
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .map(|(_, _, sub)| *sub)
            .collect()
    }

    /// Number of registrations on `signal`.
    pub fn subscriber_count(&self, signal: GameSignal) -> usize {
        self.subscriptions.iter().filter(|(_, s, _)| *s == signal).count()
    }
}
