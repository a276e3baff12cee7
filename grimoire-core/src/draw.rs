//! The card draw table: a fanned, shuffled deck the seeker picks three cards from.

use crate::catalog::ArcanaId;
use crate::deck::Reading;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

/// How many copies of each arcana lie on the table.
pub const COPIES_PER_CARD: usize = 4;

/// Cards in a completed reading.
pub const CARDS_PER_READING: usize = 3;

/// Errors from draw table operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("Slot {slot} is out of range (table has {len} slots)")]
    OutOfRange { slot: usize, len: usize },

    #[error("Slot {0} has already been drawn")]
    AlreadyDrawn(usize),

    #[error("The reading is already complete")]
    Complete,
}

/// Visual phase of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    /// Fanned out, accepting cursor movement and picks.
    Browsing,
    /// Three cards taken; the table is gathering itself up.
    Completing,
}

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A card was taken; more are needed.
    Drawn { slot: usize, arcana: ArcanaId },
    /// The third card was taken.
    Complete(Reading),
}

/// The draw table.
#[derive(Debug, Clone)]
pub struct DrawTable {
    deck: Vec<ArcanaId>,
    active: usize,
    hidden: BTreeSet<usize>,
    selected: Vec<ArcanaId>,
    phase: DrawPhase,
}

impl DrawTable {
    /// Lay out the catalog `COPIES_PER_CARD` times and shuffle.
    pub fn shuffled<R: Rng + ?Sized>(catalog: &[ArcanaId], rng: &mut R) -> Self {
        let mut deck: Vec<ArcanaId> = catalog
            .iter()
            .copied()
            .cycle()
            .take(catalog.len() * COPIES_PER_CARD)
            .collect();
        deck.shuffle(rng);
        Self::with_deck(deck)
    }

    /// Use a fixed deck order.
    pub fn with_deck(deck: Vec<ArcanaId>) -> Self {
        Self {
            deck,
            active: 0,
            hidden: BTreeSet::new(),
            selected: Vec::with_capacity(CARDS_PER_READING),
            phase: DrawPhase::Browsing,
        }
    }

    /// Every slot on the table, in fan order.
    pub fn deck(&self) -> &[ArcanaId] {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// The focused slot.
    pub fn active(&self) -> usize {
        self.active
    }

    /// The card under the cursor.
    pub fn active_card(&self) -> Option<ArcanaId> {
        self.deck.get(self.active).copied()
    }

    /// Whether a slot has been drawn and removed from the fan.
    pub fn is_hidden(&self, slot: usize) -> bool {
        self.hidden.contains(&slot)
    }

    /// Cards drawn so far, in draw order.
    pub fn selected(&self) -> &[ArcanaId] {
        &self.selected
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// Move the cursor `delta` visible slots, skipping drawn ones.
    ///
    /// The cursor never leaves the table; a step with no visible slot left
    /// in that direction is ignored.
    pub fn move_cursor(&mut self, delta: isize) -> usize {
        if self.phase != DrawPhase::Browsing {
            return self.active;
        }

        let forward = delta > 0;
        for _ in 0..delta.unsigned_abs() {
            match self.next_visible_in_direction(self.active, forward) {
                Some(slot) => self.active = slot,
                None => break,
            }
        }

        debug!(active = self.active, delta, "draw cursor moved");
        self.active
    }

    /// Put the cursor straight on a slot, as a tap would.
    pub fn focus(&mut self, slot: usize) -> Result<(), DrawError> {
        if self.phase != DrawPhase::Browsing {
            return Err(DrawError::Complete);
        }
        self.check_slot(slot)?;
        self.active = slot;
        Ok(())
    }

    /// Draw the card under the cursor.
    pub fn select(&mut self) -> Result<DrawOutcome, DrawError> {
        if self.phase != DrawPhase::Browsing || self.selected.len() >= CARDS_PER_READING {
            return Err(DrawError::Complete);
        }

        let slot = self.active;
        self.check_slot(slot)?;

        let arcana = self.deck[slot];
        self.selected.push(arcana);
        self.hidden.insert(slot);
        debug!(slot, %arcana, drawn = self.selected.len(), "card drawn");

        if let Some(next) = self.next_visible_wrapping(slot) {
            self.active = next;
        }

        if self.selected.len() == CARDS_PER_READING {
            self.phase = DrawPhase::Completing;
            let reading = [self.selected[0], self.selected[1], self.selected[2]];
            return Ok(DrawOutcome::Complete(reading));
        }

        Ok(DrawOutcome::Drawn { slot, arcana })
    }

    fn check_slot(&self, slot: usize) -> Result<(), DrawError> {
        if slot >= self.deck.len() {
            return Err(DrawError::OutOfRange {
                slot,
                len: self.deck.len(),
            });
        }
        if self.hidden.contains(&slot) {
            return Err(DrawError::AlreadyDrawn(slot));
        }
        Ok(())
    }

    fn next_visible_in_direction(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            (from + 1..self.deck.len()).find(|slot| !self.hidden.contains(slot))
        } else {
            (0..from).rev().find(|slot| !self.hidden.contains(slot))
        }
    }

    /// First visible slot after `from`, wrapping to the start of the fan.
    fn next_visible_wrapping(&self, from: usize) -> Option<usize> {
        (from + 1..self.deck.len())
            .chain(0..from)
            .find(|slot| !self.hidden.contains(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_table() -> DrawTable {
        let deck = ArcanaId::ALL
            .iter()
            .copied()
            .cycle()
            .take(ArcanaId::ALL.len() * COPIES_PER_CARD)
            .collect();
        DrawTable::with_deck(deck)
    }

    #[test]
    fn test_shuffled_table_has_four_copies() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = DrawTable::shuffled(&ArcanaId::ALL, &mut rng);

        assert_eq!(table.len(), 32);
        for id in ArcanaId::ALL {
            let copies = table.deck().iter().filter(|&&c| c == id).count();
            assert_eq!(copies, COPIES_PER_CARD);
        }
    }

    #[test]
    fn test_select_slots_in_order() {
        let mut table = fixed_table();
        let expected = [table.deck()[5], table.deck()[17], table.deck()[2]];

        table.focus(5).unwrap();
        assert!(matches!(table.select(), Ok(DrawOutcome::Drawn { slot: 5, .. })));
        table.focus(17).unwrap();
        assert!(matches!(table.select(), Ok(DrawOutcome::Drawn { slot: 17, .. })));
        table.focus(2).unwrap();
        assert_eq!(table.select(), Ok(DrawOutcome::Complete(expected)));

        assert_eq!(table.phase(), DrawPhase::Completing);
        for slot in [5, 17, 2] {
            assert!(table.is_hidden(slot));
        }
        assert_eq!(table.select(), Err(DrawError::Complete));
    }

    #[test]
    fn test_drawn_slot_cannot_be_focused_again() {
        let mut table = fixed_table();
        table.focus(5).unwrap();
        table.select().unwrap();

        assert_eq!(table.focus(5), Err(DrawError::AlreadyDrawn(5)));
        assert_eq!(
            table.focus(99),
            Err(DrawError::OutOfRange { slot: 99, len: 32 })
        );
    }

    #[test]
    fn test_cursor_advances_after_draw() {
        let mut table = fixed_table();
        table.focus(3).unwrap();
        table.select().unwrap();
        assert_eq!(table.active(), 4);
    }

    #[test]
    fn test_cursor_wraps_after_drawing_last_slot() {
        let mut table = fixed_table();
        table.focus(0).unwrap();
        table.select().unwrap();
        table.focus(31).unwrap();
        table.select().unwrap();

        // Slot 0 is drawn, so the wrap lands on 1.
        assert_eq!(table.active(), 1);
    }

    #[test]
    fn test_cursor_skips_drawn_slots() {
        let mut table = fixed_table();
        table.focus(4).unwrap();
        table.select().unwrap();
        table.focus(3).unwrap();

        assert_eq!(table.move_cursor(1), 5);
        assert_eq!(table.move_cursor(-1), 3);
        assert_eq!(table.move_cursor(-2), 1);
    }

    #[test]
    fn test_cursor_clamps_at_edges() {
        let mut table = fixed_table();
        assert_eq!(table.move_cursor(-3), 0);
        assert_eq!(table.move_cursor(100), 31);

        table.select().unwrap();
        // 31 is drawn; the cursor wrapped to 0.
        assert_eq!(table.active(), 0);
        assert_eq!(table.move_cursor(40), 30);
    }

    #[test]
    fn test_duplicate_arcana_are_independent() {
        let mut table = fixed_table();
        // Slots 0, 8 and 16 all hold The Fool.
        for slot in [0, 8, 16] {
            table.focus(slot).unwrap();
            table.select().unwrap();
        }
        assert_eq!(table.selected(), &[ArcanaId::Fool; 3]);
    }
}
