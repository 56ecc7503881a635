use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::{MapCell, Pos, MAX_SIZE};
use crate::level::Level;
use crate::map::GoalMap;
use crate::state::State;
use crate::vec2d::Vec2d;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErr {
    Pos(usize, usize),
    TooLarge,
    NoPlayer,
    MultiplePlayers,
    IncompleteBorder,
    UnreachableBoxes,
    UnreachableGoals,
    BoxesGoals,
}

impl Display for ParserErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ParserErr::Pos(r, c) => write!(f, "Invalid cell at pos: [{}, {}]", r, c),
            ParserErr::TooLarge => write!(f, "Map larger than 255 rows/columns"),
            ParserErr::NoPlayer => write!(f, "No player"),
            ParserErr::MultiplePlayers => write!(f, "More than one player"),
            ParserErr::IncompleteBorder => write!(f, "Incomplete border"),
            ParserErr::UnreachableBoxes => write!(
                f,
                "Unreachable boxes - some boxes are not on goal but can't be reached"
            ),
            ParserErr::UnreachableGoals => write!(
                f,
                "Unreachable goals - some goals don't have a box but can't be reached"
            ),
            ParserErr::BoxesGoals => write!(f, "Different number of reachable boxes and goals"),
        }
    }
}

impl Error for ParserErr {}

impl FromStr for Level {
    type Err = ParserErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn parse(level: &str) -> Result<Level, ParserErr> {
    // trim so we can specify levels using raw strings more easily
    let level = level.trim_matches('\n').trim_end();

    let (grid, goals, boxes, player_pos) = parse_xsb(level)?;
    let player_pos = player_pos.ok_or(ParserErr::NoPlayer)?;
    let grid = Vec2d::new(&grid, MapCell::Empty);

    let visited = check_border(&grid, player_pos)?;
    let (goals, boxes) = keep_reachable(&visited, goals, boxes)?;
    if boxes.len() != goals.len() {
        return Err(ParserErr::BoxesGoals);
    }

    Ok(Level::new(
        GoalMap::new(grid, goals),
        State::new(player_pos, boxes),
    ))
}

/// Parses (a subset of) the format described [here](http://www.sokobano.de/wiki/index.php?title=Level_format)
fn parse_xsb(
    level: &str,
) -> Result<(Vec<Vec<MapCell>>, Vec<Pos>, Vec<Pos>, Option<Pos>), ParserErr> {
    let mut grid = Vec::new();
    let mut goals = Vec::new();
    let mut boxes = Vec::new();
    let mut player_pos = None;

    for (r, line) in level.lines().enumerate() {
        if r > MAX_SIZE {
            return Err(ParserErr::TooLarge);
        }
        let mut line_tiles = Vec::new();
        for (c, cur_char) in line.chars().enumerate() {
            if c > MAX_SIZE {
                return Err(ParserErr::TooLarge);
            }
            let pos = Pos::new(r as u8, c as u8);

            let tile = match cur_char {
                '#' => MapCell::Wall,
                'p' | '@' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    MapCell::Empty
                }
                'P' | '+' => {
                    if player_pos.is_some() {
                        return Err(ParserErr::MultiplePlayers);
                    }
                    player_pos = Some(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                'b' | '$' => {
                    boxes.push(pos);
                    MapCell::Empty
                }
                'B' | '*' => {
                    boxes.push(pos);
                    goals.push(pos);
                    MapCell::Goal
                }
                '.' => {
                    goals.push(pos);
                    MapCell::Goal
                }
                ' ' | '-' | '_' => MapCell::Empty,
                _ => return Err(ParserErr::Pos(r, c)),
            };
            line_tiles.push(tile);
        }
        grid.push(line_tiles)
    }

    Ok((grid, goals, boxes, player_pos))
}

/// Makes sure the player's area is closed off by walls and returns which
/// cells belong to it. Everything downstream indexes the grid without bounds
/// checks and relies on this.
fn check_border(grid: &Vec2d<MapCell>, player_pos: Pos) -> Result<Vec2d<bool>, ParserErr> {
    let mut visited = grid.create_scratchpad(false);
    visited[player_pos] = true;
    let mut to_visit = vec![player_pos];

    while let Some(cur) = to_visit.pop() {
        let (r, c) = (i32::from(cur.r), i32::from(cur.c));
        let neighbors = [(r + 1, c), (r - 1, c), (r, c + 1), (r, c - 1)];
        for &(nr, nc) in &neighbors {
            // this is the only place we need to check bounds (using signed types)
            // everything after that will be surrounded by walls
            if nr < 0 || nc < 0 || nr >= i32::from(grid.rows()) || nc >= i32::from(grid.cols()) {
                // we got out of bounds without hitting a wall
                return Err(ParserErr::IncompleteBorder);
            }

            let new_pos = Pos::new(nr as u8, nc as u8);
            if !visited[new_pos] && grid[new_pos] != MapCell::Wall {
                visited[new_pos] = true;
                to_visit.push(new_pos);
            }
        }
    }

    Ok(visited)
}

/// Unreachable boxes sitting on unreachable goals are decorations - drop the
/// pair and solve the rest. A lone unreachable box or goal makes the level
/// unsolvable so it's an error instead.
fn keep_reachable(
    visited: &Vec2d<bool>,
    goals: Vec<Pos>,
    boxes: Vec<Pos>,
) -> Result<(Vec<Pos>, Vec<Pos>), ParserErr> {
    let mut reachable_goals = Vec::new();
    let mut reachable_boxes = Vec::new();
    for &pos in &boxes {
        if visited[pos] {
            reachable_boxes.push(pos);
        } else if !goals.contains(&pos) {
            return Err(ParserErr::UnreachableBoxes);
        }
    }
    for &pos in &goals {
        if visited[pos] {
            reachable_goals.push(pos);
        } else if !boxes.contains(&pos) {
            return Err(ParserErr::UnreachableGoals);
        }
    }
    Ok((reachable_goals, reachable_boxes))
}
