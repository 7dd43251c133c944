/// Tile alphabet and the descriptor table that scores it.
/// Tile semantics are queried via methods so they stay centralized here;
/// score values and lesson messages live in `TileTable` (authored content).

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Tile {
    Wall,
    Empty,    // already collected
    Point,    // street dot, +1
    Transit,  // metro station icon
    Crossing, // footbridge icon
    Health,   // hospital icon
    Lodging,  // hotel icon
    Mall,     // objective marker (intermediate phase)
    Campus,   // objective marker (final phase)
}

pub const PLAYER_SPAWN: char = 'P';
pub const ADVERSARY_SPAWN: char = 'G';

impl Tile {
    pub const ALL: [Tile; 9] = [
        Tile::Wall,
        Tile::Empty,
        Tile::Point,
        Tile::Transit,
        Tile::Crossing,
        Tile::Health,
        Tile::Lodging,
        Tile::Mall,
        Tile::Campus,
    ];

    pub fn from_symbol(ch: char) -> Option<Tile> {
        match ch {
            '#' => Some(Tile::Wall),
            ' ' => Some(Tile::Empty),
            '.' => Some(Tile::Point),
            'M' => Some(Tile::Transit),
            '=' => Some(Tile::Crossing),
            'H' => Some(Tile::Health),
            'O' => Some(Tile::Lodging),
            'S' => Some(Tile::Mall),
            'U' => Some(Tile::Campus),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Empty => ' ',
            Tile::Point => '.',
            Tile::Transit => 'M',
            Tile::Crossing => '=',
            Tile::Health => 'H',
            Tile::Lodging => 'O',
            Tile::Mall => 'S',
            Tile::Campus => 'U',
        }
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Named icon collectibles, objectives included.
    pub fn is_icon(self) -> bool {
        matches!(
            self,
            Tile::Transit | Tile::Crossing | Tile::Health | Tile::Lodging | Tile::Mall | Tile::Campus
        )
    }

    /// Objective markers are never consumed.
    pub fn is_objective(self) -> bool {
        matches!(self, Tile::Mall | Tile::Campus)
    }

    /// Does arriving here have any scoring effect at all?
    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Point) || self.is_icon()
    }
}

/// What arriving on a collectible tile does.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRule {
    pub score: u32,
    pub consumable: bool,
    pub message: Option<String>,
}

impl TileRule {
    fn new(score: u32, consumable: bool, message: Option<&str>) -> Self {
        TileRule { score, consumable, message: message.map(str::to_string) }
    }
}

/// Fixed tile → descriptor mapping. One entry per collectible tile.
#[derive(Clone, Debug)]
pub struct TileTable {
    rules: Vec<(Tile, TileRule)>,
}

impl TileTable {
    pub fn empty() -> Self {
        TileTable { rules: Vec::new() }
    }

    pub fn get(&self, tile: Tile) -> Option<&TileRule> {
        self.rules.iter().find(|(t, _)| *t == tile).map(|(_, r)| r)
    }

    /// Insert or replace the descriptor for `tile`.
    pub fn set(&mut self, tile: Tile, rule: TileRule) {
        match self.rules.iter_mut().find(|(t, _)| *t == tile) {
            Some(slot) => slot.1 = rule,
            None => self.rules.push((tile, rule)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tile, &TileRule)> {
        self.rules.iter().map(|(t, r)| (*t, r))
    }
}

impl Default for TileTable {
    fn default() -> Self {
        let mut table = TileTable::empty();
        table.set(Tile::Point, TileRule::new(1, true, None));
        table.set(Tile::Transit, TileRule::new(10, true,
            Some("Transit: it connects, but it has to be legible and safe.")));
        table.set(Tile::Crossing, TileRule::new(8, true,
            Some("Footbridge: it connects, but it does not always welcome.")));
        table.set(Tile::Health, TileRule::new(6, true,
            Some("Health care nearby. Is the walk here comfortable?")));
        table.set(Tile::Lodging, TileRule::new(5, true,
            Some("Hotels and services: the market city around you.")));
        table.set(Tile::Mall, TileRule::new(15, false, None));
        table.set(Tile::Campus, TileRule::new(25, false, None));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip_for_every_tile() {
        for tile in Tile::ALL {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol(PLAYER_SPAWN), None);
        assert_eq!(Tile::from_symbol(ADVERSARY_SPAWN), None);
    }

    #[test]
    fn objectives_are_icons_but_not_walls() {
        assert!(Tile::Mall.is_objective() && Tile::Mall.is_icon());
        assert!(Tile::Campus.is_objective());
        assert!(!Tile::Transit.is_objective());
        assert!(!Tile::Empty.is_collectible());
        assert!(!Tile::Wall.is_collectible());
    }

    #[test]
    fn default_table_scores() {
        let t = TileTable::default();
        let score = |tile| t.get(tile).map(|r| r.score);
        assert_eq!(score(Tile::Point), Some(1));
        assert_eq!(score(Tile::Transit), Some(10));
        assert_eq!(score(Tile::Crossing), Some(8));
        assert_eq!(score(Tile::Health), Some(6));
        assert_eq!(score(Tile::Lodging), Some(5));
        assert_eq!(score(Tile::Mall), Some(15));
        assert_eq!(score(Tile::Campus), Some(25));
        assert!(!t.get(Tile::Mall).unwrap().consumable);
        assert!(t.get(Tile::Point).unwrap().message.is_none());
        assert!(t.get(Tile::Wall).is_none());
    }

    #[test]
    fn set_replaces_existing_rule() {
        let mut t = TileTable::default();
        t.set(Tile::Point, TileRule::new(3, true, Some("dot")));
        assert_eq!(t.get(Tile::Point).unwrap().score, 3);
        assert_eq!(t.iter().filter(|(tile, _)| *tile == Tile::Point).count(), 1);
    }
}
