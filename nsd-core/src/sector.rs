use nsd_utils::units::kg_to_tonnes;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of compass sectors in a rose.
pub const SECTOR_COUNT: usize = 16;

/// Angular width of one sector, degrees.
pub const SECTOR_WIDTH: f64 = 360.0 / SECTOR_COUNT as f64;

/// One of the 16 compass directions, each spanning 22.5° centred on its bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sector {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl Sector {
    /// All sectors in clockwise order from North.
    pub const ALL: [Sector; SECTOR_COUNT] = [
        Sector::N,
        Sector::NNE,
        Sector::NE,
        Sector::ENE,
        Sector::E,
        Sector::ESE,
        Sector::SE,
        Sector::SSE,
        Sector::S,
        Sector::SSW,
        Sector::SW,
        Sector::WSW,
        Sector::W,
        Sector::WNW,
        Sector::NW,
        Sector::NNW,
    ];

    /// Sector index 0-15 of a compass bearing in degrees. Bearings outside
    /// 0-360 wrap around.
    pub fn index_of(bearing: f64) -> usize {
        let shifted = (bearing + SECTOR_WIDTH / 2.0).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        ((shifted / SECTOR_WIDTH).floor() as usize) % SECTOR_COUNT
    }

    pub fn from_bearing(bearing: f64) -> Sector {
        Sector::ALL[Sector::index_of(bearing)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Nominal bearing at the centre of the sector.
    pub fn bearing(self) -> f64 {
        self.index() as f64 * SECTOR_WIDTH
    }

    pub fn label(self) -> &'static str {
        match self {
            Sector::N => "N",
            Sector::NNE => "NNE",
            Sector::NE => "NE",
            Sector::ENE => "ENE",
            Sector::E => "E",
            Sector::ESE => "ESE",
            Sector::SE => "SE",
            Sector::SSE => "SSE",
            Sector::S => "S",
            Sector::SSW => "SSW",
            Sector::SW => "SW",
            Sector::WSW => "WSW",
            Sector::W => "W",
            Sector::WNW => "WNW",
            Sector::NW => "NW",
            Sector::NNW => "NNW",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A 16-sector histogram of snow transport (kg/m), in fixed order N..NNW.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectorRose(pub [f64; SECTOR_COUNT]);

impl SectorRose {
    pub fn zero() -> Self {
        SectorRose([0.0; SECTOR_COUNT])
    }

    pub fn add(&mut self, sector: Sector, value: f64) {
        self.0[sector.index()] += value;
    }

    pub fn get(&self, sector: Sector) -> f64 {
        self.0[sector.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sector, f64)> + '_ {
        Sector::ALL.iter().map(move |sector| (*sector, self.get(*sector)))
    }

    /// Element-wise mean. An empty slice gives an all-zero rose.
    pub fn mean(roses: &[SectorRose]) -> SectorRose {
        let mut mean = SectorRose::zero();
        if roses.is_empty() {
            return mean;
        }
        for rose in roses {
            for (slot, value) in mean.0.iter_mut().zip(rose.0.iter()) {
                *slot += value;
            }
        }
        let n = roses.len() as f64;
        for slot in mean.0.iter_mut() {
            *slot /= n;
        }
        mean
    }

    pub fn in_tonnes(&self) -> SectorRose {
        SectorRose(self.0.map(kg_to_tonnes))
    }

    /// The sector carrying the most transport, `None` for a rose with nothing in it.
    pub fn dominant(&self) -> Option<Sector> {
        self.iter()
            .filter(|(_, value)| *value > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(sector, _)| sector)
    }
}

#[derive(Serialize)]
struct SectorValue {
    sector: &'static str,
    bearing: f64,
    value: f64,
}

impl Serialize for SectorRose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(SECTOR_COUNT))?;
        for (sector, value) in self.iter() {
            seq.serialize_element(&SectorValue {
                sector: sector.label(),
                bearing: sector.bearing(),
                value,
            })?;
        }
        seq.end()
    }
}
