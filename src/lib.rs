// The following doc comment is kept in sync with the README.md file. Please
// run the `cargo sync-readme` command after modifying the comment contents.
//! This crate provides a circular sequence with a movable cursor, whose
//! insertions and removals happen at fixed distances from the cursor in
//! constant time, together with the marble game that motivated it.
//!
//! The game goes as follows. [Marbles numbered $0,1,2,\dots$][aoc] are
//! arranged in a circle that initially holds only the marble 0, which is
//! also the _current_ marble. $P$ players take turns placing the marbles
//! $1,2,\dots,L$ in order: marble $i$ normally goes between the marbles one
//! and two positions clockwise of the current marble, and becomes current.
//! But if $i$ is a multiple of 23, the player keeps it instead, takes away
//! the marble seven positions counterclockwise of the current one, and adds
//! both numbers to their score; the marble clockwise of the removed one
//! becomes current. The winner is the player with the highest score after
//! marble $L$ has been played.
//!
//! Storing the circle in a vector makes every turn cost $\Theta(n)$ time,
//! where $n$ is the number of marbles in the circle, because insertions and
//! removals shift the elements that follow them. A doubly linked list does
//! better: D. E. Knuth's "dancing links" show how cheap it is to delete and
//! restore nodes whose neighbors know each other [[_The Art of Computer
//! Programming_ **4B** (2022)][taocp4b], Part 2, 65–70]. Here the nodes live
//! in an arena and refer to each other by index, so the whole ring is owned
//! by a single vector and no reference cycles arise.
//!
//! The following structures are the most important pieces of this crate:
//! - [`Ring`] is the circular sequence. It supports [stepping](`Ring::step_clockwise`)
//!   the cursor in both directions, [inserting](`Ring::insert`) and
//!   [removing](`Ring::remove`) values relative to the cursor, and iterating
//!   over the values.
//! - [`Rules`] validates the parameters of a game, including the removal
//!   cadence and the insertion and removal offsets, which default to 23,
//!   2 and 7 respectively.
//! - [`Game`] plays a game turn by turn and produces an [`Outcome`].
//!
//! Also, the `demos` directory contains the `marble_mania` program, which
//! solves both parts of the puzzle for a given description.
//!
//! [aoc]: https://adventofcode.com/2018/day/9
//! [taocp4b]: https://www-cs-faculty.stanford.edu/~knuth/taocp.html#vol4
//!
//! # Examples
//!
//! ```
//! use marble_ring::{play, Rules};
//!
//! let rules = Rules::new(10, 1618)?;
//! let outcome = play(rules)?;
//! assert_eq!(outcome.high_score(), 8317);
//! # Ok::<(), marble_ring::Error>(())
//! ```

mod error;
mod game;
mod indices;
mod ring;

pub use error::{Error, ParseRulesError};
pub use game::{play, Game, Outcome, Rules, Turn, DEFAULT_CADENCE};
pub use indices::NodeIndex;
pub use ring::{Iter, Ring, INSERT_OFFSET, REMOVE_OFFSET};
