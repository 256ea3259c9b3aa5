/// Identifier of one of the procedural colour schemes.
///
/// Stored and shared as a small integer; any id outside the known range
/// decodes to [`PaletteId::Rainbow`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub enum PaletteId {
    #[default]
    MidnightFire,
    ElectricBlue,
    Radioactive,
    CottonCandy,
    Matrix,
    Rainbow,
}

impl PaletteId {
    pub const ALL: [PaletteId; 6] = [
        Self::MidnightFire,
        Self::ElectricBlue,
        Self::Radioactive,
        Self::CottonCandy,
        Self::Matrix,
        Self::Rainbow,
    ];

    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Self::MidnightFire,
            1 => Self::ElectricBlue,
            2 => Self::Radioactive,
            3 => Self::CottonCandy,
            4 => Self::Matrix,
            _ => Self::Rainbow,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::MidnightFire => 0,
            Self::ElectricBlue => 1,
            Self::Radioactive => 2,
            Self::CottonCandy => 3,
            Self::Matrix => 4,
            Self::Rainbow => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MidnightFire => "Midnight Fire",
            Self::ElectricBlue => "Electric Blue",
            Self::Radioactive => "Radioactive",
            Self::CottonCandy => "Cotton Candy",
            Self::Matrix => "Matrix",
            Self::Rainbow => "Rainbow",
        }
    }

    /// The next palette in [`ALL`](Self::ALL), wrapping around.
    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len() as u32)
    }
}

impl From<u32> for PaletteId {
    fn from(index: u32) -> Self {
        Self::from_index(index)
    }
}

impl From<PaletteId> for u32 {
    fn from(id: PaletteId) -> Self {
        id.index()
    }
}

impl std::fmt::Display for PaletteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for id in PaletteId::ALL {
            assert_eq!(PaletteId::from_index(id.index()), id);
        }
    }

    #[test]
    fn unknown_index_is_rainbow() {
        assert_eq!(PaletteId::from_index(6), PaletteId::Rainbow);
        assert_eq!(PaletteId::from_index(u32::MAX), PaletteId::Rainbow);
    }

    #[test]
    fn next_wraps() {
        assert_eq!(PaletteId::Rainbow.next(), PaletteId::MidnightFire);
        assert_eq!(PaletteId::MidnightFire.next(), PaletteId::ElectricBlue);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&PaletteId::Matrix).unwrap(), "4");
        let id: PaletteId = serde_json::from_str("42").unwrap();
        assert_eq!(id, PaletteId::Rainbow);
    }
}
