use crate::error::ParseRulesError;
use crate::ring::{INSERT_OFFSET, REMOVE_OFFSET};
use crate::{Error, Ring};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// The default number $N$ such that every $N$th marble is kept by the player
/// instead of being placed in the circle.
pub const DEFAULT_CADENCE: u64 = 23;

/// The largest number of marbles for which [`Game::new`] reserves room up
/// front; longer games grow their circle on demand.
const MAX_RESERVED_MARBLES: usize = 1 << 23;

/// The parameters of a marble game.
///
/// A game has $P>0$ players who take turns placing the marbles numbered
/// $1,2,\dots,L$ into a [`Ring`] that initially holds the marble numbered 0.
/// Player $(i-1)\bmod P$ handles marble $i$. If $i$ is a multiple of the
/// _cadence_ $N$, the player keeps marble $i$, removes a marble from the
/// circle, and scores the sum of both numbers; otherwise marble $i$ is
/// inserted into the circle.
///
/// Rules are validated on construction, so a [`Game`] never starts with a
/// configuration it cannot play.
///
/// # Examples
///
/// ```
/// use marble_ring::Rules;
///
/// let rules: Rules = "9 players; last marble is worth 25 points".parse()?;
/// assert_eq!(rules.players(), 9);
/// assert_eq!(rules.last_marble(), 25);
/// assert_eq!(rules.scaled(100)?.last_marble(), 2500);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rules {
    /// The number $P$ of players.
    players: usize,
    /// The number $L$ of the last marble played.
    last_marble: u64,
    /// The number $N$ such that every $N$th marble triggers a removal.
    cadence: u64,
    /// See [`Ring::insert_with_offset`].
    insert_offset: usize,
    /// See [`Ring::remove_with_offset`].
    remove_offset: usize,
}

impl Rules {
    /// Creates the rules for a game of `players` players that ends after
    /// marble `last_marble` has been played, with the default cadence and
    /// offsets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPlayers`] if `players` is zero, and
    /// [`Error::NoMarbles`] if `last_marble` is zero.
    pub fn new(players: usize, last_marble: u64) -> Result<Self, Error> {
        if players == 0 {
            return Err(Error::NoPlayers);
        }
        if last_marble == 0 {
            return Err(Error::NoMarbles);
        }
        Ok(Self {
            players,
            last_marble,
            cadence: DEFAULT_CADENCE,
            insert_offset: INSERT_OFFSET,
            remove_offset: REMOVE_OFFSET,
        })
    }

    /// Replaces the removal cadence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCadence`] if `cadence` is zero.
    pub fn with_cadence(self, cadence: u64) -> Result<Self, Error> {
        if cadence == 0 {
            return Err(Error::ZeroCadence);
        }
        Ok(Self { cadence, ..self })
    }

    /// Replaces the number of clockwise steps taken before an insertion and
    /// the number of counterclockwise steps taken before a removal.
    #[must_use]
    pub fn with_offsets(self, insert_offset: usize, remove_offset: usize) -> Self {
        Self {
            insert_offset,
            remove_offset,
            ..self
        }
    }

    /// Returns the same rules with the value of the last marble multiplied
    /// by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMarbles`] if `factor` is zero, and
    /// [`Error::Overflow`] if the product does not fit in a `u64`.
    pub fn scaled(&self, factor: u64) -> Result<Self, Error> {
        if factor == 0 {
            return Err(Error::NoMarbles);
        }
        let last_marble = self
            .last_marble
            .checked_mul(factor)
            .ok_or(Error::Overflow { factor })?;
        Ok(Self {
            last_marble,
            ..*self
        })
    }

    /// Returns the number of players.
    #[must_use]
    pub fn players(&self) -> usize {
        self.players
    }

    /// Returns the number of the last marble.
    #[must_use]
    pub fn last_marble(&self) -> u64 {
        self.last_marble
    }

    /// Returns the removal cadence.
    #[must_use]
    pub fn cadence(&self) -> u64 {
        self.cadence
    }

    /// Returns the `(insert, remove)` offsets.
    #[must_use]
    pub fn offsets(&self) -> (usize, usize) {
        (self.insert_offset, self.remove_offset)
    }

    /// Returns the largest number of marbles the circle holds during the
    /// game. Every scoring turn shrinks the circle by one marble after it
    /// has grown on the turns before, so the peak is the final size, plus
    /// one when the last marble itself is a scoring turn.
    fn peak_circle_len(&self) -> usize {
        let removals = self.last_marble / self.cadence;
        let kept = self.last_marble.saturating_sub(removals.saturating_mul(2));
        let peak = kept
            .saturating_add(1)
            .saturating_add(u64::from(self.last_marble % self.cadence == 0));
        usize::try_from(peak).unwrap_or(usize::MAX)
    }
}

/// Parses a puzzle description such as
/// `"10 players; last marble is worth 1618 points"`.
impl FromStr for Rules {
    type Err = ParseRulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let malformed = || ParseRulesError::Malformed(text.to_owned());
        let (players, rest) = text
            .split_once(" players; last marble is worth ")
            .ok_or_else(malformed)?;
        let points = rest.strip_suffix(" points").ok_or_else(malformed)?;
        let players = players
            .parse()
            .map_err(|_| ParseRulesError::InvalidNumber {
                what: "number of players",
                text: players.to_owned(),
            })?;
        let last_marble = points
            .parse()
            .map_err(|_| ParseRulesError::InvalidNumber {
                what: "last marble",
                text: points.to_owned(),
            })?;
        Ok(Self::new(players, last_marble)?)
    }
}

/// The effect of playing a single marble.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Turn {
    /// The number of the marble played.
    pub marble: u64,
    /// The player who played it, counting from zero.
    pub player: usize,
    /// The marble taken out of the circle, if this was a scoring turn.
    pub removed: Option<u64>,
    /// The points earned on this turn; zero unless a marble was removed.
    pub points: u64,
}

/// A marble game in progress.
///
/// Use [`Game::turn`] to play one marble at a time, or [`Game::finish`] to
/// play the remaining marbles and collect the [`Outcome`].
///
/// # Examples
///
/// ```
/// use marble_ring::{Game, Rules};
///
/// let mut game = Game::new(Rules::new(9, 25)?);
/// for _ in 0..22 {
///     game.turn()?;
/// }
/// let turn = game.turn()?.expect("marble 23 should be played");
/// assert_eq!((turn.marble, turn.player, turn.removed), (23, 4, Some(9)));
/// assert_eq!(turn.points, 32);
/// assert_eq!(game.ring().to_string(),
///            "0 16 8 17 4 18 (19) 2 20 10 21 5 22 11 1 12 6 13 3 14 7 15");
///
/// let outcome = game.finish()?;
/// assert_eq!(outcome.high_score(), 32);
/// assert_eq!(outcome.to_string(), "9 32");
/// # Ok::<(), marble_ring::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    ring: Ring<u64>,
    /// The running score of each player.
    scores: Vec<u64>,
    /// The number of the last marble played, or 0 before the first turn.
    marble: u64,
    /// The player who plays the next marble.
    next_player: usize,
    last_removed: Option<u64>,
}

impl Game {
    /// Sets up a game with a circle that holds the marble numbered 0.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self {
            ring: Ring::with_capacity(0, rules.peak_circle_len().min(MAX_RESERVED_MARBLES)),
            scores: vec![0; rules.players],
            marble: 0,
            next_player: 0,
            last_removed: None,
            rules,
        }
    }

    /// Plays the next marble. Returns `Ok(None)` once the last marble has
    /// been played.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] if the turn requires removing a marble
    /// from a circle that holds a single one, which can only happen with a
    /// cadence of 1. The game is left as it was before the call.
    pub fn turn(&mut self) -> Result<Option<Turn>, Error> {
        if self.marble >= self.rules.last_marble {
            return Ok(None);
        }
        let marble = self.marble + 1;
        let player = self.next_player;
        let turn = if marble % self.rules.cadence == 0 {
            let removed = self.ring.remove_with_offset(self.rules.remove_offset)?;
            let points = marble + removed;
            self.scores[player] += points;
            self.last_removed = Some(removed);
            trace!(marble, player, removed, points, "marble removed");
            Turn {
                marble,
                player,
                removed: Some(removed),
                points,
            }
        } else {
            self.ring.insert_with_offset(self.rules.insert_offset, marble);
            Turn {
                marble,
                player,
                removed: None,
                points: 0,
            }
        };
        self.marble = marble;
        self.next_player = (player + 1) % self.rules.players;
        Ok(Some(turn))
    }

    /// Plays all remaining marbles.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by [`Self::turn`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(players = self.rules.players, last_marble = self.rules.last_marble)
    )]
    pub fn finish(mut self) -> Result<Outcome, Error> {
        while self.turn()?.is_some() {}
        let outcome = Outcome {
            last_removed: self.last_removed,
            scores: self.scores,
        };
        debug!(
            high_score = outcome.high_score(),
            last_removed = ?outcome.last_removed,
            "game over"
        );
        Ok(outcome)
    }

    /// Returns the rules of this game.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the circle of marbles.
    #[must_use]
    pub fn ring(&self) -> &Ring<u64> {
        &self.ring
    }

    /// Returns the running score of each player.
    #[must_use]
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// Returns the number of the last marble played, or 0 if the game has
    /// not started.
    #[must_use]
    pub fn marble(&self) -> u64 {
        self.marble
    }
}

/// Plays a whole game under the given rules.
///
/// # Errors
///
/// See [`Game::turn`].
pub fn play(rules: Rules) -> Result<Outcome, Error> {
    Game::new(rules).finish()
}

/// The final state of a finished [`Game`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Outcome {
    last_removed: Option<u64>,
    scores: Vec<u64>,
}

impl Outcome {
    /// Returns the marble taken out of the circle on the last scoring turn,
    /// or [`None`] if no marble was ever removed.
    #[must_use]
    pub fn last_removed(&self) -> Option<u64> {
        self.last_removed
    }

    /// Returns the final score of each player.
    #[must_use]
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// Returns the highest final score.
    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.scores.iter().copied().max().unwrap_or(0)
    }
}

/// Writes the last removed marble and the high score separated by a space,
/// with `-1` standing for a game where no marble was removed.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_removed {
            Some(removed) => write!(f, "{removed} {}", self.high_score()),
            None => write!(f, "-1 {}", self.high_score()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn high_score(players: usize, last_marble: u64) -> u64 {
        play(Rules::new(players, last_marble).unwrap())
            .unwrap()
            .high_score()
    }

    #[test]
    fn short_game() {
        let outcome = play(Rules::new(9, 25).unwrap()).unwrap();
        assert_eq!(outcome.high_score(), 32);
        assert_eq!(outcome.last_removed(), Some(9));
        // Marble 23 is played by the fifth player.
        assert_eq!(outcome.scores()[4], 32);
        assert_eq!(outcome.scores().iter().sum::<u64>(), 32);
    }

    #[test]
    fn known_high_scores() {
        assert_eq!(high_score(10, 1618), 8317);
        assert_eq!(high_score(13, 7999), 146373);
        assert_eq!(high_score(17, 1104), 2764);
        assert_eq!(high_score(21, 6111), 54718);
        assert_eq!(high_score(30, 5807), 37305);
    }

    #[test]
    fn game_without_removals() {
        let outcome = play(Rules::new(3, 22).unwrap()).unwrap();
        assert_eq!(outcome.last_removed(), None);
        assert_eq!(outcome.high_score(), 0);
        assert_eq!(outcome.to_string(), "-1 0");
    }

    #[test]
    fn turns_rotate_through_players() {
        let mut game = Game::new(Rules::new(4, 10).unwrap());
        let players: Vec<_> = std::iter::from_fn(|| game.turn().unwrap())
            .map(|turn| turn.player)
            .collect();
        assert_eq!(players, [0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
        assert_eq!(game.marble(), 10);
        assert_eq!(game.ring().len(), 11);
        assert_eq!(game.turn(), Ok(None));
    }

    #[test]
    fn scores_accumulate_per_player() {
        // With a single player every removal goes to the same score.
        let rules = Rules::new(1, 100).unwrap();
        let mut game = Game::new(rules);
        let mut points = 0;
        while let Some(turn) = game.turn().unwrap() {
            assert_eq!(turn.player, 0);
            assert_eq!(turn.removed.is_some(), turn.marble % 23 == 0);
            points += turn.points;
        }
        assert_eq!(game.scores(), [points]);
        assert_eq!(play(rules).unwrap().high_score(), points);
    }

    #[test]
    fn cadence_of_one_underflows() {
        let rules = Rules::new(2, 5).unwrap().with_cadence(1).unwrap();
        let mut game = Game::new(rules);
        assert_eq!(game.turn(), Err(Error::Underflow { len: 1 }));
        // The failed turn leaves the game untouched.
        assert_eq!(game.marble(), 0);
        assert_eq!(game.ring().len(), 1);
        assert_eq!(play(rules), Err(Error::Underflow { len: 1 }));
    }

    #[test]
    fn custom_cadence_and_offsets() {
        let default = Rules::new(5, 100).unwrap();
        let explicit = default
            .with_offsets(INSERT_OFFSET, REMOVE_OFFSET)
            .with_cadence(DEFAULT_CADENCE)
            .unwrap();
        assert_eq!(default, explicit);
        assert_eq!(play(default), play(explicit));

        // Removing every third marble right before the cursor.
        let rules = Rules::new(2, 6)
            .unwrap()
            .with_cadence(3)
            .unwrap()
            .with_offsets(1, 1);
        let mut game = Game::new(rules);
        let turns: Vec<_> = std::iter::from_fn(|| game.turn().unwrap()).collect();
        // Marbles 1 and 2 make the circle 0 1 (2), so marble 3 removes 1.
        assert_eq!(turns[2].removed, Some(1));
        assert_eq!(turns[2].points, 4);
        assert_eq!(turns[5].player, 1);
        assert_eq!(turns[5].removed, Some(4));
        assert_eq!(game.ring().to_string(), "0 (5) 2");
    }

    #[test]
    fn rejects_invalid_rules() {
        assert_eq!(Rules::new(0, 25), Err(Error::NoPlayers));
        assert_eq!(Rules::new(9, 0), Err(Error::NoMarbles));
        assert_eq!(Rules::new(0, 0), Err(Error::NoPlayers));
        let rules = Rules::new(9, 25).unwrap();
        assert_eq!(rules.with_cadence(0), Err(Error::ZeroCadence));
        assert_eq!(rules.scaled(0), Err(Error::NoMarbles));
        assert_eq!(
            rules.scaled(u64::MAX),
            Err(Error::Overflow { factor: u64::MAX })
        );
    }

    #[test]
    fn scaled_rules_keep_everything_else() {
        let rules = Rules::new(9, 25).unwrap().with_cadence(5).unwrap();
        let scaled = rules.scaled(100).unwrap();
        assert_eq!(scaled.last_marble(), 2500);
        assert_eq!(scaled.players(), 9);
        assert_eq!(scaled.cadence(), 5);
        assert_eq!(scaled.offsets(), (INSERT_OFFSET, REMOVE_OFFSET));
    }

    #[test]
    fn parse_puzzle_description() {
        let rules: Rules = "10 players; last marble is worth 1618 points\n"
            .parse()
            .unwrap();
        assert_eq!(rules, Rules::new(10, 1618).unwrap());
        assert_eq!(rules.cadence(), DEFAULT_CADENCE);
    }

    #[test]
    fn parse_rejects_bad_descriptions() {
        assert_eq!(
            "10 players, 1618 points".parse::<Rules>(),
            Err(ParseRulesError::Malformed("10 players, 1618 points".into()))
        );
        assert_eq!(
            "10 players; last marble is worth 1618".parse::<Rules>(),
            Err(ParseRulesError::Malformed(
                "10 players; last marble is worth 1618".into()
            ))
        );
        assert_eq!(
            "ten players; last marble is worth 1618 points".parse::<Rules>(),
            Err(ParseRulesError::InvalidNumber {
                what: "number of players",
                text: "ten".into(),
            })
        );
        assert_eq!(
            "10 players; last marble is worth -5 points".parse::<Rules>(),
            Err(ParseRulesError::InvalidNumber {
                what: "last marble",
                text: "-5".into(),
            })
        );
        assert_eq!(
            "0 players; last marble is worth 1618 points".parse::<Rules>(),
            Err(ParseRulesError::Invalid(Error::NoPlayers))
        );
    }

    #[test]
    fn reserves_room_for_largest_circle() {
        let rules = Rules::new(9, 25).unwrap();
        // 25 marbles, one removal: 0..=25 minus 23 and 9.
        assert_eq!(rules.peak_circle_len(), 24);

        // Marbles 0..=22 are all in the circle right before marble 23
        // removes one of them.
        let rules = Rules::new(9, 23).unwrap();
        assert_eq!(rules.peak_circle_len(), 23);
        let mut game = Game::new(rules);
        let capacity = game.ring().capacity();
        assert!(capacity >= 23);
        let mut peak = game.ring().len();
        while game.turn().unwrap().is_some() {
            peak = peak.max(game.ring().len());
        }
        assert_eq!(peak, 23);
        assert_eq!(game.ring().len(), 22);
        // The circle never outgrew its initial reservation.
        assert_eq!(game.ring().capacity(), capacity);
    }

    #[test]
    fn huge_games_start_without_reserving_everything() {
        let rules = Rules::new(471, 72026)
            .unwrap()
            .scaled(10_000_000_000_000)
            .unwrap();
        let game = Game::new(rules);
        assert_eq!(game.ring().len(), 1);
        assert!(game.ring().capacity() <= MAX_RESERVED_MARBLES);
        assert_eq!(game.marble(), 0);
    }
}
