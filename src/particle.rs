use serde::{Deserialize, Serialize};

pub const PLANT_LIFESPAN: i32 = 150;
pub const FLOWER_LIFESPAN: i32 = 75;
pub const FIRE_LIFESPAN: i32 = 10;

/// Decay value of particles that never expire.
pub const IMMORTAL: i32 = -1;

/// The kind of matter occupying a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Empty,
    Barrier,
    Sand,
    Water,
    Plant,
    Fire,
    Fountain,
    Flower,
}

impl Flavor {
    pub const ALL: [Flavor; 8] = [
        Flavor::Empty,
        Flavor::Barrier,
        Flavor::Sand,
        Flavor::Water,
        Flavor::Plant,
        Flavor::Fire,
        Flavor::Fountain,
        Flavor::Flower,
    ];

    /// Decay counter a freshly created particle of this flavor starts with.
    pub fn initial_decay(self) -> i32 {
        match self {
            Flavor::Fire => FIRE_LIFESPAN,
            Flavor::Flower => FLOWER_LIFESPAN,
            Flavor::Plant => PLANT_LIFESPAN,
            Flavor::Empty | Flavor::Barrier | Flavor::Sand | Flavor::Water | Flavor::Fountain => {
                IMMORTAL
            }
        }
    }

    #[inline]
    pub fn is_flammable(self) -> bool {
        matches!(self, Flavor::Plant | Flavor::Flower)
    }

    /// Board-text symbol.
    pub fn symbol(self) -> char {
        match self {
            Flavor::Empty => '.',
            Flavor::Barrier => 'b',
            Flavor::Sand => 's',
            Flavor::Water => 'w',
            Flavor::Plant => 'p',
            Flavor::Fire => 'f',
            Flavor::Fountain => 'n',
            Flavor::Flower => 'z',
        }
    }

    pub fn from_symbol(c: char) -> Option<Flavor> {
        Flavor::ALL.into_iter().find(|f| f.symbol() == c)
    }

    /// Base display color (RGBA).
    pub fn color(self) -> [u8; 4] {
        match self {
            Flavor::Empty => [0, 0, 0, 255],
            Flavor::Barrier => [128, 128, 128, 255],
            Flavor::Sand => [255, 255, 0, 255],
            Flavor::Water => [0, 0, 255, 255],
            Flavor::Plant => [0, 255, 0, 255],
            Flavor::Fire => [255, 0, 0, 255],
            Flavor::Fountain => [0, 255, 255, 255],
            Flavor::Flower => [255, 141, 161, 255],
        }
    }
}

/// Per-position state. `decay == -1` marks an immortal particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub flavor: Flavor,
    pub decay: i32,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        flavor: Flavor::Empty,
        decay: IMMORTAL,
    };

    /// What off-grid neighbor lookups see.
    pub const BOUNDARY: Cell = Cell {
        flavor: Flavor::Barrier,
        decay: IMMORTAL,
    };

    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            decay: flavor.initial_decay(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flavor == Flavor::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_decay_matches_lifespans() {
        assert_eq!(Cell::new(Flavor::Fire).decay, FIRE_LIFESPAN);
        assert_eq!(Cell::new(Flavor::Plant).decay, PLANT_LIFESPAN);
        assert_eq!(Cell::new(Flavor::Flower).decay, FLOWER_LIFESPAN);
        for f in [
            Flavor::Empty,
            Flavor::Barrier,
            Flavor::Sand,
            Flavor::Water,
            Flavor::Fountain,
        ] {
            assert_eq!(Cell::new(f).decay, IMMORTAL, "{f:?} should be immortal");
        }
    }

    #[test]
    fn symbols_are_unique_and_invertible() {
        for f in Flavor::ALL {
            assert_eq!(Flavor::from_symbol(f.symbol()), Some(f));
        }
        assert_eq!(Flavor::from_symbol('x'), None);
    }

    #[test]
    fn palette() {
        assert_eq!(Flavor::Empty.color(), [0, 0, 0, 255]);
        assert_eq!(Flavor::Sand.color(), [255, 255, 0, 255]);
        assert_eq!(Flavor::Flower.color(), [255, 141, 161, 255]);
    }

    #[test]
    fn only_plants_and_flowers_burn() {
        let flammable: Vec<_> = Flavor::ALL.into_iter().filter(|f| f.is_flammable()).collect();
        assert_eq!(flammable, vec![Flavor::Plant, Flavor::Flower]);
    }
}
