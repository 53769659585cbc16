/// Model format version from the file header.
///
/// Known versions:
/// - 3: original format (16-bit polygon indices, no material extras)
/// - 4: adds the material auxiliary table (transparency, self-illumination)
/// - 6: widens polygon vertex indices to 32 bits
///
/// The layout predicates below are the single source of truth for
/// version-conditional record layout. Both the reader and the writer consult
/// them, so the two cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion(pub u32);

impl FormatVersion {
    pub const V3: Self = Self(3);
    pub const V4: Self = Self(4);
    pub const V6: Self = Self(6);

    /// Whether this is a version the codec knows how to round-trip.
    pub fn is_supported(self) -> bool {
        matches!(self.0, 3 | 4 | 6)
    }

    /// Whether the header carries a material-extras table directory entry and
    /// materials have transparency / self-illumination scalars (v4+).
    pub fn has_material_extras(self) -> bool {
        self.0 >= 4
    }

    /// Whether polygon vertex-index triples are stored as u32 (v6+).
    /// Earlier versions store them as u16.
    pub fn wide_indices(self) -> bool {
        self.0 >= 6
    }

    /// Byte width of a single polygon vertex index.
    pub fn index_width(self) -> usize {
        if self.wide_indices() {
            4
        } else {
            2
        }
    }

    /// Number of (offset, count) pairs in the header's table directory.
    pub fn table_count(self) -> usize {
        if self.has_material_extras() {
            9
        } else {
            8
        }
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
