use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Search driver selection. The informed drivers carry the heuristic they
/// rank successors with, the uninformed drivers carry the pruning switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    AStar(HeuristicKind),
    Greedy(HeuristicKind),
    Bfs { prune: bool },
    Dfs { prune: bool },
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Method::AStar(h) => write!(f, "a-star ({})", h),
            Method::Greedy(h) => write!(f, "greedy ({})", h),
            Method::Bfs { prune: false } => write!(f, "bfs"),
            Method::Bfs { prune: true } => write!(f, "bfs (pruned)"),
            Method::Dfs { prune: false } => write!(f, "dfs"),
            Method::Dfs { prune: true } => write!(f, "dfs (pruned)"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeuristicKind {
    Manhattan,
    ManhattanImproved,
    PlayerDistance,
    Combined,
    ManhattanDeadlock,
    CombinedDeadlock,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 6] = [
        HeuristicKind::Manhattan,
        HeuristicKind::ManhattanImproved,
        HeuristicKind::PlayerDistance,
        HeuristicKind::Combined,
        HeuristicKind::ManhattanDeadlock,
        HeuristicKind::CombinedDeadlock,
    ];
}

impl Display for HeuristicKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            HeuristicKind::Manhattan => write!(f, "manhattan"),
            HeuristicKind::ManhattanImproved => write!(f, "manhattan-improved"),
            HeuristicKind::PlayerDistance => write!(f, "player-distance"),
            HeuristicKind::Combined => write!(f, "combined"),
            HeuristicKind::ManhattanDeadlock => write!(f, "manhattan-deadlock"),
            HeuristicKind::CombinedDeadlock => write!(f, "combined-deadlock"),
        }
    }
}

impl FromStr for HeuristicKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(HeuristicKind::Manhattan),
            "manhattan-improved" => Ok(HeuristicKind::ManhattanImproved),
            "player-distance" => Ok(HeuristicKind::PlayerDistance),
            "combined" => Ok(HeuristicKind::Combined),
            "manhattan-deadlock" => Ok(HeuristicKind::ManhattanDeadlock),
            "combined-deadlock" => Ok(HeuristicKind::CombinedDeadlock),
            _ => Err(format!("unknown heuristic: {}", s)),
        }
    }
}
