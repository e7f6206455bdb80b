use ambition::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terrain {
    Floor,
    Wall,
    Water,
}

impl Terrain {
    pub(crate) fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Terrain::Floor),
            '#' => Some(Terrain::Wall),
            '~' => Some(Terrain::Water),
            _ => None,
        }
    }

    pub(crate) fn glyph(self) -> char {
        match self {
            Terrain::Floor => '.',
            Terrain::Wall => '#',
            Terrain::Water => '~',
        }
    }
}

impl Tile for Terrain {
    fn is_pathable(&self) -> bool {
        matches!(self, Terrain::Floor)
    }
}
