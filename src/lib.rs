use std::{
    collections::HashSet,
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

#[derive(Debug)]
pub enum Error {
    InconsistentRow(usize, usize),
    MultipleGuards(Guard, Guard),
    InvalidChar(char),
    NoGuard,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InconsistentRow(expect_col_n, real_col_n) => write!(
                f,
                "Expect {} columns in this row, given {}.",
                expect_col_n, real_col_n
            ),
            Error::MultipleGuards(guard0, guard1) => write!(
                f,
                "Found multiple guards({}, {}) in given laboratory, expect one only.",
                guard0, guard1
            ),
            Error::InvalidChar(c) => {
                write!(f, "Invalid character({}) in text of laboratory layout.", c)
            }
            Error::NoGuard => write!(f, "There's no guard in given laboratory, but expect one."),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "^"),
            Direction::Right => write!(f, ">"),
            Direction::Down => write!(f, "v"),
            Direction::Left => write!(f, "<"),
        }
    }
}

impl Direction {
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn turn_right(&self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    r: usize,
    c: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

impl Position {
    pub fn new(r: usize, c: usize) -> Self {
        Self { r, c }
    }

    pub fn row(&self) -> usize {
        self.r
    }

    pub fn col(&self) -> usize {
        self.c
    }

    /// Neighbor one step along `dir`, `None` if it would underflow the top or left edge.
    pub fn along(&self, dir: Direction) -> Option<Position> {
        match dir {
            Direction::Up if self.r > 0 => Some(Self::new(self.r - 1, self.c)),
            Direction::Right => Some(Self::new(self.r, self.c + 1)),
            Direction::Down => Some(Self::new(self.r + 1, self.c)),
            Direction::Left if self.c > 0 => Some(Self::new(self.r, self.c - 1)),
            _ => None,
        }
    }
}

/// Position and facing of the guard, the key of loop detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guard {
    pos: Position,
    dir: Direction,
}

impl Display for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.dir, self.pos())
    }
}

impl Guard {
    pub fn new(pos: &Position, dir: Direction) -> Self {
        Self { pos: *pos, dir }
    }

    pub fn pos(&self) -> &Position {
        &self.pos
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn ahead_pos(&self) -> Option<Position> {
        self.pos.along(self.dir)
    }

    pub fn move_to(&mut self, pos: Position) {
        self.pos = pos;
    }

    pub fn turn_right(&mut self) {
        self.dir = self.dir.turn_right();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Obstruction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exited,
    Looping,
}

/// What the guard finds one step ahead.
enum Ahead {
    Outside,
    Blocked,
    Free(Position),
}

/// Result of one simulated patrol.
#[derive(Debug, Clone)]
pub struct Patrol {
    outcome: Outcome,
    states: HashSet<Guard>,
}

impl Patrol {
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_loop(&self) -> bool {
        self.outcome == Outcome::Looping
    }

    /// Every distinct (position, direction) the guard has been in, the start included.
    pub fn states(&self) -> &HashSet<Guard> {
        &self.states
    }

    pub fn positions(&self) -> HashSet<Position> {
        self.states.iter().map(|guard| *guard.pos()).collect()
    }
}

#[derive(Debug)]
pub struct Laboratory {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: usize,
    guard: Guard,
}

impl FromStr for Laboratory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = LaboratoryBuilder::new();
        for line in s.lines() {
            builder.add_row(line)?;
        }

        builder.build()
    }
}

impl Laboratory {
    pub fn row_n(&self) -> usize {
        self.row_n
    }

    pub fn col_n(&self) -> usize {
        self.col_n
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn tile(&self, pos: &Position) -> Option<Tile> {
        if self.is_inside(pos) {
            self.tiles.get(pos.r * self.col_n + pos.c).copied()
        } else {
            None
        }
    }

    /// Simulate the guard until it leaves the laboratory or repeats a state.
    /// `extra_obstruction` is treated as blocked for this run only.
    pub fn patrol(&self, extra_obstruction: Option<&Position>) -> Patrol {
        let mut cur_guard = self.guard;
        let mut states = HashSet::from([cur_guard]);
        let outcome = loop {
            match self.ahead(&cur_guard, extra_obstruction) {
                Ahead::Outside => break Outcome::Exited,
                Ahead::Blocked => cur_guard.turn_right(),
                Ahead::Free(next_pos) => cur_guard.move_to(next_pos),
            }

            if !states.insert(cur_guard) {
                break Outcome::Looping;
            }
        };

        Patrol { outcome, states }
    }

    pub fn patrol_positions(&self) -> HashSet<Position> {
        self.patrol(None).positions()
    }

    /// Floor positions where a new obstruction may be placed, the guard's start excluded.
    pub fn candidate_positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.row_n)
            .flat_map(move |r| (0..self.col_n).map(move |c| Position::new(r, c)))
            .filter(move |pos| self.tile(pos) == Some(Tile::Floor) && pos != self.guard.pos())
    }

    pub fn is_loop_with_obstruction(&self, pos: &Position) -> bool {
        self.patrol(Some(pos)).is_loop()
    }

    /// Count candidate positions which trap the guard in a loop once obstructed.
    pub fn loop_obstruction_count(&self) -> usize {
        let candidates = self.candidate_positions().collect::<Vec<_>>();
        candidates
            .into_par_iter()
            .filter(|pos| self.is_loop_with_obstruction(pos))
            .count()
    }

    fn ahead(&self, guard: &Guard, extra_obstruction: Option<&Position>) -> Ahead {
        let Some(next_pos) = guard.ahead_pos() else {
            return Ahead::Outside;
        };

        match self.tile(&next_pos) {
            None => Ahead::Outside,
            Some(Tile::Obstruction) => Ahead::Blocked,
            Some(Tile::Floor) if extra_obstruction == Some(&next_pos) => Ahead::Blocked,
            Some(Tile::Floor) => Ahead::Free(next_pos),
        }
    }

    fn is_inside(&self, pos: &Position) -> bool {
        pos.r < self.row_n && pos.c < self.col_n
    }
}

struct LaboratoryBuilder {
    tiles: Vec<Tile>,
    row_n: usize,
    col_n: Option<usize>,
    guard: Option<Guard>,
}

impl LaboratoryBuilder {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            row_n: 0,
            col_n: None,
            guard: None,
        }
    }

    pub fn add_row(&mut self, row_text: &str) -> Result<(), Error> {
        let row_text = row_text.trim_end();
        // Blank lines carry no tiles.
        if row_text.is_empty() {
            return Ok(());
        }

        let this_col_n = row_text.chars().count();
        let expect_col_n = *self.col_n.get_or_insert(this_col_n);
        if expect_col_n != this_col_n {
            return Err(Error::InconsistentRow(expect_col_n, this_col_n));
        }

        for (ind, c) in row_text.chars().enumerate() {
            match c {
                '.' => self.tiles.push(Tile::Floor),
                '#' => self.tiles.push(Tile::Obstruction),
                other => {
                    let dir = Direction::from_glyph(other).ok_or(Error::InvalidChar(other))?;
                    let guard = Guard::new(&Position::new(self.row_n, ind), dir);
                    if let Some(last_guard) = self.guard.take() {
                        return Err(Error::MultipleGuards(last_guard, guard));
                    }

                    self.guard = Some(guard);
                    self.tiles.push(Tile::Floor);
                }
            }
        }
        self.row_n += 1;

        Ok(())
    }

    pub fn build(self) -> Result<Laboratory, Error> {
        let guard = self.guard.ok_or(Error::NoGuard)?;

        Ok(Laboratory {
            tiles: self.tiles,
            row_n: self.row_n,
            col_n: self.col_n.unwrap_or(0),
            guard,
        })
    }
}

pub fn read_lab<P: AsRef<Path>>(path: P) -> Result<Laboratory> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open given file({}).", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let mut builder = LaboratoryBuilder::new();
    for (ind, line) in reader.lines().enumerate() {
        let line = line.with_context(|| {
            format!(
                "Failed to read line {} from given file({}).",
                ind + 1,
                path.as_ref().display()
            )
        })?;
        builder
            .add_row(line.as_str())
            .with_context(|| format!("Failed to parse line {}.", ind + 1))?;
    }

    Ok(builder.build()?)
}
