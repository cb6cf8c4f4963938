//! Round selection: a random, bounded subset of the card collection.
use super::Card;
use crate::error::{Error, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Index;

/// Ordered cards for one round. Fixed until the round is replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Round {
    cards: Vec<Card>,
}

impl Round {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.cards.len().checked_sub(1)
    }
}

impl Index<usize> for Round {
    type Output = Card;

    fn index(&self, index: usize) -> &Card {
        &self.cards[index]
    }
}

/// Shuffles a copy of `all_cards` and keeps the first `round_size` of them.
///
/// A `round_size` of zero is treated as one; the result is never empty.
pub fn select_round<R: Rng + ?Sized>(
    all_cards: &[Card],
    round_size: usize,
    rng: &mut R,
) -> Result<Round> {
    if all_cards.is_empty() {
        return Err(Error::EmptySource);
    }

    let mut cards = all_cards.to_vec();
    cards.shuffle(rng);
    cards.truncate(round_size.max(1));

    tracing::debug!(
        selected = cards.len(),
        available = all_cards.len(),
        "selected new round"
    );
    Ok(Round { cards })
}
