// Opt in to warnings about new 2018 idioms
#![warn(rust_2018_idioms)]
// Additional warnings that are allow by default (`rustc -W help`)
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

pub mod config;
pub mod level;
pub mod map_formatter;
pub mod moves;
pub mod solution_formatter;
pub mod solver;

mod data;
mod deadlock;
mod heuristic;
mod map;
mod parser;
mod state;
mod vec2d;

pub use crate::data::{Dir, Pos};
pub use crate::map::GoalMap;
pub use crate::parser::ParserErr;
pub use crate::state::State;

use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::Method;
use crate::level::Level;
use crate::solver::{SearchObserver, SearchResult};

pub trait LoadLevel {
    fn load_level(&self) -> Result<Level, Box<dyn Error>>;
}

impl<P: AsRef<Path>> LoadLevel for P {
    fn load_level(&self) -> Result<Level, Box<dyn Error>> {
        let text = fs::read_to_string(self)?;
        Ok(text.parse()?)
    }
}

pub trait Solve {
    fn solve(&self, method: Method, observer: &mut dyn SearchObserver) -> SearchResult;
}
