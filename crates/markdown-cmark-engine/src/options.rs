use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Parse and render options, combinable with `|`.
///
/// The numeric values are stable: `DEFAULT = 0`, `SOURCEPOS = 1`,
/// `HARDBREAKS = 2`, `NORMALIZE = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Options(u32);

impl Options {
    pub const DEFAULT: Options = Options(0);
    /// Emit source positions in HTML and XML output.
    pub const SOURCEPOS: Options = Options(1);
    /// Render soft breaks as hard breaks.
    pub const HARDBREAKS: Options = Options(2);
    /// Merge adjacent text nodes, both after parsing and while rendering.
    pub const NORMALIZE: Options = Options(4);

    const ALL: u32 = 1 | 2 | 4;

    /// Builds options from raw bits; unknown bits are dropped.
    pub const fn from_bits(bits: u32) -> Self {
        Options(bits & Self::ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Options) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Options) {
        self.0 &= !other.0;
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_stable() {
        assert_eq!(Options::DEFAULT.bits(), 0);
        assert_eq!(Options::SOURCEPOS.bits(), 1);
        assert_eq!(Options::HARDBREAKS.bits(), 2);
        assert_eq!(Options::NORMALIZE.bits(), 4);
    }

    #[test]
    fn combine_and_query() {
        let opts = Options::SOURCEPOS | Options::NORMALIZE;
        assert!(opts.contains(Options::SOURCEPOS));
        assert!(opts.contains(Options::NORMALIZE));
        assert!(!opts.contains(Options::HARDBREAKS));
        assert!(opts.contains(Options::DEFAULT));
        assert_eq!(opts.bits(), 5);
    }

    #[test]
    fn from_bits_drops_unknown_bits() {
        assert_eq!(Options::from_bits(0xff).bits(), 7);
    }

    #[test]
    fn insert_and_remove() {
        let mut opts = Options::DEFAULT;
        opts.insert(Options::HARDBREAKS);
        opts |= Options::SOURCEPOS;
        assert_eq!(opts.bits(), 3);
        opts.remove(Options::HARDBREAKS);
        assert_eq!(opts, Options::SOURCEPOS);
    }
}
