use crate::data::{Dir, MapCell, Pos};
use crate::map::GoalMap;
use crate::moves::Move;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    pub(crate) player_pos: Pos,
    pub(crate) boxes: Vec<Pos>,
}

impl State {
    pub(crate) fn new(player_pos: Pos, mut boxes: Vec<Pos>) -> State {
        // sort to detect equal states when we reorder boxes
        boxes.sort_unstable();
        State { player_pos, boxes }
    }

    pub fn player_pos(&self) -> Pos {
        self.player_pos
    }

    pub fn boxes(&self) -> &[Pos] {
        &self.boxes
    }

    pub(crate) fn has_box(&self, pos: Pos) -> bool {
        self.boxes.binary_search(&pos).is_ok()
    }

    /// One step of the game: walk into a free cell or push a single box.
    /// Returns the successor state or `None` when blocked by a wall,
    /// a box backed by a wall or a box backed by another box. Pure - the
    /// input state is never touched.
    pub fn try_move(&self, map: &GoalMap, dir: Dir) -> Option<(State, Move)> {
        let new_player_pos = self.player_pos + dir;
        if map.grid[new_player_pos] == MapCell::Wall {
            return None;
        }

        match self.boxes.binary_search(&new_player_pos) {
            Ok(i) => {
                let new_box_pos = new_player_pos + dir;
                if map.grid[new_box_pos] == MapCell::Wall || self.has_box(new_box_pos) {
                    return None;
                }
                let mut boxes = self.boxes.clone();
                boxes[i] = new_box_pos;
                Some((State::new(new_player_pos, boxes), Move::new(dir, true)))
            }
            Err(_) => {
                let moved = State {
                    player_pos: new_player_pos,
                    boxes: self.boxes.clone(),
                };
                Some((moved, Move::new(dir, false)))
            }
        }
    }
}
