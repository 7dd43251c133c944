/// Grid instance: the mutable tile layer of the active phase.
///
/// Queries are total. Anything outside `[0, width) x [0, height)` reads as
/// `Tile::Wall`, so movement and AI code never bounds-check on their own.
/// Dimensions never change after construction.

use super::tile::Tile;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Build from rectangular rows. Short rows are padded with walls.
    pub fn new(mut tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut tiles {
            row.resize(width, Tile::Wall);
        }
        Grid { tiles, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some((x, y))
    }

    /// Current tile at (x, y); `Wall` when out of bounds.
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        match self.index(x, y) {
            Some((x, y)) => self.tiles[y][x],
            None => Tile::Wall,
        }
    }

    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_wall()
    }

    /// Remove a collectible. Objective markers stay put.
    pub fn consume(&mut self, x: i32, y: i32) {
        if let Some((x, y)) = self.index(x, y) {
            let tile = self.tiles[y][x];
            if tile.is_collectible() && !tile.is_objective() {
                self.tiles[y][x] = Tile::Empty;
            }
        }
    }

    /// Row-major view for renderers.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.iter().map(Vec::as_slice)
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().flatten().filter(|t| **t == tile).count()
    }
}

#[cfg(test)]
pub(crate) fn grid_from(rows: &[&str]) -> Grid {
    Grid::new(
        rows.iter()
            .map(|r| r.chars().map(|c| Tile::from_symbol(c).unwrap_or(Tile::Point)).collect())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tiles_in_bounds() {
        let g = grid_from(&[
            "#####",
            "#.MS#",
            "#####",
        ]);
        assert_eq!(g.width(), 5);
        assert_eq!(g.height(), 3);
        assert_eq!(g.tile_at(1, 1), Tile::Point);
        assert_eq!(g.tile_at(2, 1), Tile::Transit);
        assert!(g.is_wall(0, 0));
        assert!(!g.is_wall(3, 1));
    }

    #[test]
    fn consume_point_and_icon() {
        let mut g = grid_from(&["#.M#"]);
        g.consume(1, 0);
        g.consume(2, 0);
        assert_eq!(g.tile_at(1, 0), Tile::Empty);
        assert_eq!(g.tile_at(2, 0), Tile::Empty);
    }

    #[test]
    fn consume_never_removes_objectives() {
        let mut g = grid_from(&["#SU#"]);
        for _ in 0..3 {
            g.consume(1, 0);
            g.consume(2, 0);
        }
        assert_eq!(g.tile_at(1, 0), Tile::Mall);
        assert_eq!(g.tile_at(2, 0), Tile::Campus);
    }

    #[test]
    fn consume_ignores_walls_and_out_of_bounds() {
        let mut g = grid_from(&["#. #"]);
        let before = g.clone();
        g.consume(0, 0);
        g.consume(2, 0);
        g.consume(-1, 0);
        g.consume(9, 9);
        assert_eq!(g, before);
    }

    #[test]
    fn ragged_rows_are_padded_with_walls() {
        let g = Grid::new(vec![
            vec![Tile::Point, Tile::Point, Tile::Point],
            vec![Tile::Point],
        ]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.tile_at(2, 1), Tile::Wall);
        assert_eq!(g.count(Tile::Wall), 2);
    }
}
